use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait alias for observable states of a finite decision process.
///
/// States are compared by value and used as hash keys, so any cheap
/// immutable descriptor (tuples, small structs, integers) works.
pub trait State: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> State for T {}

/// One simulator step as recorded in an episode
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition<S> {
    pub state: S,
    pub action: usize,
    pub reward: f64,
}

impl<S> Transition<S> {
    pub fn new(state: S, action: usize, reward: f64) -> Self {
        Transition { state, action, reward }
    }
}

/// A complete trajectory from the initial state to termination.
///
/// Episodes are always finite: the generator stops only when the simulator
/// reports `done`, so a simulator that never terminates stalls the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Episode<S> {
    transitions: Vec<Transition<S>>,
}

impl<S> Episode<S> {
    pub fn new() -> Self {
        Episode { transitions: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Episode { transitions: Vec::with_capacity(capacity) }
    }

    pub fn push(&mut self, transition: Transition<S>) {
        self.transitions.push(transition);
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn transitions(&self) -> &[Transition<S>] {
        &self.transitions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transition<S>> {
        self.transitions.iter()
    }

    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.transitions.iter().map(|t| &t.state)
    }

    pub fn actions(&self) -> impl Iterator<Item = usize> + '_ {
        self.transitions.iter().map(|t| t.action)
    }

    /// Reward sequence r_0 .. r_{T-1}
    pub fn rewards(&self) -> Vec<f64> {
        self.transitions.iter().map(|t| t.reward).collect()
    }

    /// Undiscounted sum of rewards
    pub fn total_reward(&self) -> f64 {
        self.transitions.iter().map(|t| t.reward).sum()
    }
}

impl<S> Default for Episode<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> From<Vec<Transition<S>>> for Episode<S> {
    fn from(transitions: Vec<Transition<S>>) -> Self {
        Episode { transitions }
    }
}

impl<S> FromIterator<Transition<S>> for Episode<S> {
    fn from_iter<I: IntoIterator<Item = Transition<S>>>(iter: I) -> Self {
        Episode { transitions: iter.into_iter().collect() }
    }
}

impl<'a, S> IntoIterator for &'a Episode<S> {
    type Item = &'a Transition<S>;
    type IntoIter = std::slice::Iter<'a, Transition<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.transitions.iter()
    }
}
