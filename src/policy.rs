//! # Behavior Policies
//!
//! A behavior policy turns a state into an [`ActionChoice`]: either an explicit
//! probability vector over the action set, or a request for the simulator's own
//! uniform sampler (used for states the learner has never seen).
//!
//! Sampling is a single pure operation, [`ActionDistribution::sample`], that
//! takes the random generator as an argument so callers control determinism.

use ndarray::{Array1, ArrayView1};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::{McError, Result};
use crate::q_table::QTable;
use crate::types::State;

const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Validated probability vector over `[0, n)`
#[derive(Clone, Debug)]
pub struct ActionDistribution {
    probs: Array1<f64>,
    index: WeightedIndex<f64>,
}

impl ActionDistribution {
    pub fn new(probs: Array1<f64>) -> Result<Self> {
        if probs.is_empty() {
            return Err(McError::InvalidDistribution("no actions".to_string()));
        }
        if probs.iter().any(|&p| !p.is_finite() || p < 0.0) {
            return Err(McError::InvalidDistribution(format!(
                "probabilities must be finite and non-negative: {}",
                probs
            )));
        }
        let total = probs.sum();
        if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(McError::InvalidDistribution(format!(
                "probabilities sum to {} instead of 1",
                total
            )));
        }
        let index = WeightedIndex::new(probs.iter().copied())
            .map_err(|e| McError::InvalidDistribution(e.to_string()))?;

        Ok(ActionDistribution { probs, index })
    }

    pub fn uniform(num_actions: usize) -> Result<Self> {
        if num_actions == 0 {
            return Err(McError::InvalidDistribution("no actions".to_string()));
        }
        Self::new(Array1::from_elem(num_actions, 1.0 / num_actions as f64))
    }

    pub fn probabilities(&self) -> ArrayView1<'_, f64> {
        self.probs.view()
    }

    pub fn probability(&self, action: usize) -> f64 {
        self.probs.get(action).copied().unwrap_or(0.0)
    }

    pub fn num_actions(&self) -> usize {
        self.probs.len()
    }

    /// Draw one action index
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.index.sample(rng)
    }
}

/// Index of the largest value; the lowest index wins ties.
///
/// NaN entries never win. An empty slice yields action 0.
pub fn greedy_action(values: ArrayView1<f64>) -> usize {
    let mut best_action = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (action, &value) in values.iter().enumerate() {
        if value > best_value {
            best_value = value;
            best_action = action;
        }
    }
    best_action
}

/// Epsilon-greedy probabilities for one row of action values.
///
/// Every action receives `ε/nA`; the greedy action additionally receives `1 − ε`.
pub fn epsilon_greedy_probs(q_row: ArrayView1<f64>, epsilon: f64) -> Array1<f64> {
    let num_actions = q_row.len();
    if num_actions == 0 {
        return Array1::zeros(0);
    }
    let mut probs = Array1::from_elem(num_actions, epsilon / num_actions as f64);
    probs[greedy_action(q_row)] += 1.0 - epsilon;
    probs
}

/// What the episode generator should do in a given state
#[derive(Clone, Debug)]
pub enum ActionChoice {
    /// Sample from an explicit distribution
    Sample(ActionDistribution),
    /// Defer to the simulator's uniform sampler
    Uniform,
}

/// Maps states to action choices during episode generation
pub trait BehaviorPolicy<S> {
    fn action_choice(&self, state: &S, num_actions: usize) -> Result<ActionChoice>;
}

/// Uniformly random actions everywhere
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformRandom;

impl<S> BehaviorPolicy<S> for UniformRandom {
    fn action_choice(&self, _state: &S, _num_actions: usize) -> Result<ActionChoice> {
        Ok(ActionChoice::Uniform)
    }
}

/// Hand-written stochastic rule for prediction runs.
///
/// While `condition(state)` holds the safe action is taken with probability
/// `safe_probability` (0.8 by default) and the risk action with the rest; when
/// it does not hold the two probabilities swap. For Blackjack this is "stick
/// with 0.8 once the player total exceeds 18, otherwise hit with 0.8".
#[derive(Clone)]
pub struct ThresholdPolicy<F> {
    safe_action: usize,
    risk_action: usize,
    safe_probability: f64,
    condition: F,
}

impl<F> ThresholdPolicy<F> {
    pub fn new(safe_action: usize, risk_action: usize, condition: F) -> Result<Self> {
        if safe_action == risk_action {
            return Err(McError::invalid_parameter(
                "risk_action",
                "must differ from safe_action",
            ));
        }
        Ok(ThresholdPolicy {
            safe_action,
            risk_action,
            safe_probability: 0.8,
            condition,
        })
    }

    pub fn with_safe_probability(mut self, probability: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(McError::invalid_parameter("safe_probability", "must be in [0, 1]"));
        }
        self.safe_probability = probability;
        Ok(self)
    }

    pub fn safe_action(&self) -> usize {
        self.safe_action
    }

    pub fn risk_action(&self) -> usize {
        self.risk_action
    }
}

impl<S, F: Fn(&S) -> bool> BehaviorPolicy<S> for ThresholdPolicy<F> {
    fn action_choice(&self, state: &S, num_actions: usize) -> Result<ActionChoice> {
        for action in [self.safe_action, self.risk_action] {
            if action >= num_actions {
                return Err(McError::InvalidAction { action, max_actions: num_actions });
            }
        }

        let (safe, risk) = if (self.condition)(state) {
            (self.safe_probability, 1.0 - self.safe_probability)
        } else {
            (1.0 - self.safe_probability, self.safe_probability)
        };
        let mut probs = Array1::zeros(num_actions);
        probs[self.safe_action] = safe;
        probs[self.risk_action] = risk;

        Ok(ActionChoice::Sample(ActionDistribution::new(probs)?))
    }
}

/// Epsilon-greedy behavior over the current action-value table
pub struct EpsilonGreedy<'q, S> {
    q: &'q QTable<S>,
    epsilon: f64,
}

impl<'q, S: State> EpsilonGreedy<'q, S> {
    pub fn new(q: &'q QTable<S>, epsilon: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(McError::invalid_parameter("epsilon", "must be in [0, 1]"));
        }
        Ok(EpsilonGreedy { q, epsilon })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl<'q, S: State> BehaviorPolicy<S> for EpsilonGreedy<'q, S> {
    fn action_choice(&self, state: &S, num_actions: usize) -> Result<ActionChoice> {
        if num_actions != self.q.num_actions() {
            return Err(McError::invalid_parameter(
                "num_actions".to_string(),
                format!(
                    "simulator has {} actions but the table has {}",
                    num_actions,
                    self.q.num_actions()
                ),
            ));
        }
        match self.q.row(state) {
            Some(row) => {
                let probs = epsilon_greedy_probs(row, self.epsilon);
                Ok(ActionChoice::Sample(ActionDistribution::new(probs)?))
            }
            None => Ok(ActionChoice::Uniform),
        }
    }
}
