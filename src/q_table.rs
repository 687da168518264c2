use ndarray::{Array1, ArrayView1, ArrayViewMut1};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use bincode::{deserialize, serialize};
use std::collections::HashMap;
use std::fs;
use std::hash::Hash;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{McError, Result};
use crate::policy::greedy_action;
use crate::types::State;

/// Tabular action-value function.
///
/// One row of `num_actions` estimates is stored per visited state. Reading a
/// pair that was never written returns exactly `0.0`; rows only appear once an
/// update touches the state, which is how "visited" is defined for
/// epsilon-greedy action selection and policy extraction.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize + Eq + Hash",
    deserialize = "S: Deserialize<'de> + Eq + Hash"
))]
pub struct QTable<S> {
    values: HashMap<S, Array1<f64>>,
    num_actions: usize,
}

impl<S: Eq + Hash> PartialEq for QTable<S> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values && self.num_actions == other.num_actions
    }
}

impl<S: State> QTable<S> {
    pub fn new(num_actions: usize) -> Result<Self> {
        if num_actions == 0 {
            return Err(McError::invalid_parameter("num_actions", "must be at least 1"));
        }
        Ok(QTable {
            values: HashMap::new(),
            num_actions,
        })
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Q(s, a), zero for any pair never written
    pub fn get(&self, state: &S, action: usize) -> f64 {
        self.values
            .get(state)
            .and_then(|row| row.get(action))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, state: &S, action: usize, value: f64) -> Result<()> {
        if action >= self.num_actions {
            return Err(McError::InvalidAction {
                action,
                max_actions: self.num_actions,
            });
        }
        self.row_mut(state)[action] = value;
        Ok(())
    }

    /// Row for a visited state
    pub fn row(&self, state: &S) -> Option<ArrayView1<'_, f64>> {
        self.values.get(state).map(|row| row.view())
    }

    /// Row for any state, zeros when unvisited
    pub fn row_or_zeros(&self, state: &S) -> Array1<f64> {
        self.values
            .get(state)
            .cloned()
            .unwrap_or_else(|| Array1::zeros(self.num_actions))
    }

    /// Mutable row, created as zeros on first access
    pub fn row_mut(&mut self, state: &S) -> ArrayViewMut1<'_, f64> {
        let num_actions = self.num_actions;
        self.values
            .entry(state.clone())
            .or_insert_with(|| Array1::zeros(num_actions))
            .view_mut()
    }

    pub fn contains_state(&self, state: &S) -> bool {
        self.values.contains_key(state)
    }

    pub fn num_states(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.values.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, ArrayView1<'_, f64>)> {
        self.values.iter().map(|(state, row)| (state, row.view()))
    }

    /// Best known action, lowest index on ties; `None` for unvisited states
    pub fn greedy_action(&self, state: &S) -> Option<usize> {
        self.values.get(state).map(|row| greedy_action(row.view()))
    }

    /// max_a Q(s, a), zero for unvisited states
    pub fn state_value(&self, state: &S) -> f64 {
        match self.values.get(state) {
            Some(row) => row.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            None => 0.0,
        }
    }

    /// Deterministic greedy policy over every visited state
    pub fn policy(&self) -> Policy<S> {
        let actions = self
            .values
            .iter()
            .map(|(state, row)| (state.clone(), greedy_action(row.view())))
            .collect();
        Policy { actions }
    }
}

impl<S: State + Serialize + DeserializeOwned> QTable<S> {
    /// Save the table to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serialize(self)?;
        let mut file = fs::File::create(path)?;
        file.write_all(&serialized)?;
        Ok(())
    }

    /// Load a table previously written with [`QTable::save`]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = fs::File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        let table: Self = deserialize(&buffer)?;
        if table.num_actions == 0 || table.values.values().any(|row| row.len() != table.num_actions) {
            return Err(McError::SerializationError(
                "row length does not match num_actions".to_string(),
            ));
        }
        Ok(table)
    }
}

/// Snapshot mapping each visited state to a single action
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize + Eq + Hash",
    deserialize = "S: Deserialize<'de> + Eq + Hash"
))]
pub struct Policy<S> {
    actions: HashMap<S, usize>,
}

impl<S: Eq + Hash> PartialEq for Policy<S> {
    fn eq(&self, other: &Self) -> bool {
        self.actions == other.actions
    }
}

impl<S: State> Policy<S> {
    pub fn action(&self, state: &S) -> Option<usize> {
        self.actions.get(state).copied()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, usize)> {
        self.actions.iter().map(|(state, &action)| (state, action))
    }
}

impl<S: State + Serialize + DeserializeOwned> Policy<S> {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serialize(self)?;
        fs::write(path, serialized)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let buffer = fs::read(path)?;
        Ok(deserialize(&buffer)?)
    }
}
