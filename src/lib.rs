//! # montecarlo-rl - Tabular Monte Carlo Prediction and Control
//!
//! Model-free estimation of action values for finite, episodic decision
//! processes from sampled experience alone. Two algorithms are provided:
//!
//! - **Prediction**: every-visit Monte Carlo estimation of `Q` for a fixed
//!   behavior policy, using exact running means of sampled returns
//! - **Control**: generalized policy iteration with an epsilon-greedy behavior
//!   policy, decaying exploration and a constant step size
//!
//! The simulator is supplied by the caller through the [`env::Environment`]
//! trait. A Blackjack simulator is included in [`envs`] for experimentation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use montecarlo_rl::config::ControlConfig;
//! use montecarlo_rl::control::mc_control;
//! use montecarlo_rl::envs::Blackjack;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut env = Blackjack::new(0);
//! let mut rng = StdRng::seed_from_u64(0);
//! let config = ControlConfig {
//!     num_episodes: 500_000,
//!     alpha: 0.02,
//!     ..ControlConfig::default()
//! };
//!
//! let outcome = mc_control(&mut env, config, &mut rng).unwrap();
//! for (state, action) in outcome.policy.iter().take(5) {
//!     println!("{:?} -> {}", state, action);
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`builders`] - Builder patterns for estimators
//! - [`config`] - Serializable hyper-parameters and validation
//! - [`control`] - Constant-alpha Monte Carlo control (GPI loop)
//! - [`env`] - Simulator interface and contract guard
//! - [`envs`] - Reference simulators
//! - [`episode`] - Episode generation
//! - [`error`] - Error types and result handling
//! - [`metrics`] - Per-episode training metrics
//! - [`parallel`] - Parallel rollouts for prediction
//! - [`policy`] - Behavior policies and action distributions
//! - [`prediction`] - Every-visit Monte Carlo prediction
//! - [`q_table`] - Tabular action values and greedy policies
//! - [`returns`] - Discounted return computation
//! - [`schedule`] - Exploration rate schedule
//! - [`types`] - Transitions and episodes

pub mod builders;
pub mod config;
pub mod control;
pub mod env;
pub mod envs;
pub mod episode;
pub mod error;
pub mod metrics;
pub mod parallel;
pub mod policy;
pub mod prediction;
pub mod q_table;
pub mod returns;
pub mod schedule;
pub mod types;

pub use config::{ControlConfig, PredictionConfig, VisitMode};
pub use control::{mc_control, update_q, ControlOutcome, McControl};
pub use env::{ActionSpace, Environment, Step};
pub use error::{McError, Result};
pub use prediction::{mc_prediction, McPrediction};
pub use q_table::{Policy, QTable};

#[cfg(test)]
mod tests;
