//! # Monte Carlo Prediction
//!
//! Estimates the action-value function of a fixed behavior policy by averaging
//! sampled returns. Every (state, action) occurrence contributes its return
//! (every-visit by default), and the estimate is the exact running mean
//!
//! ```text
//! N[s,a]           += 1
//! returns_sum[s,a] += G
//! Q[s,a]            = returns_sum[s,a] / N[s,a]
//! ```
//!
//! There is no convergence test; the caller chooses the episode budget.

use ndarray::Array1;
use rand::Rng;
use std::collections::HashMap;

use crate::config::{validate_episodes, validate_log_interval, PredictionConfig, VisitMode};
use crate::env::Environment;
use crate::episode::{check_actions, generate_episode, visit_mask};
use crate::error::Result;
use crate::policy::BehaviorPolicy;
use crate::q_table::QTable;
use crate::returns::{discounts, returns_with_discounts};
use crate::types::{Episode, State};

/// Counted-average action-value estimator
#[derive(Clone, Debug)]
pub struct McPrediction<S> {
    q: QTable<S>,
    counts: HashMap<S, Array1<u64>>,
    returns_sum: HashMap<S, Array1<f64>>,
    gamma: f64,
    visit_mode: VisitMode,
    episodes_seen: usize,
}

impl<S: State> McPrediction<S> {
    pub fn new(num_actions: usize, gamma: f64, visit_mode: VisitMode) -> Result<Self> {
        let config = PredictionConfig {
            gamma,
            visit_mode,
            ..PredictionConfig::default()
        };
        config.validate()?;
        Ok(McPrediction {
            q: QTable::new(num_actions)?,
            counts: HashMap::new(),
            returns_sum: HashMap::new(),
            gamma,
            visit_mode,
            episodes_seen: 0,
        })
    }

    pub fn from_config(num_actions: usize, config: &PredictionConfig) -> Result<Self> {
        config.validate()?;
        Self::new(num_actions, config.gamma, config.visit_mode)
    }

    /// Fold one complete episode into the averages.
    ///
    /// The episode is checked before anything is written, so a rejected
    /// episode leaves the estimator untouched.
    pub fn update(&mut self, episode: &Episode<S>) -> Result<()> {
        let num_actions = self.q.num_actions();
        check_actions(episode, num_actions)?;

        let rewards = Array1::from(episode.rewards());
        let discounts = discounts(self.gamma, rewards.len());
        let returns = returns_with_discounts(rewards.view(), discounts.view());
        let mask = visit_mask(episode, self.visit_mode);

        for ((transition, g), counted) in episode.iter().zip(returns).zip(mask) {
            if !counted {
                continue;
            }
            let (s, a) = (&transition.state, transition.action);

            let n = {
                let row = self
                    .counts
                    .entry(s.clone())
                    .or_insert_with(|| Array1::zeros(num_actions));
                row[a] += 1;
                row[a]
            };
            let total = {
                let row = self
                    .returns_sum
                    .entry(s.clone())
                    .or_insert_with(|| Array1::zeros(num_actions));
                row[a] += g;
                row[a]
            };
            self.q.row_mut(s)[a] = total / n as f64;
        }

        self.episodes_seen += 1;
        Ok(())
    }

    /// Generate and apply `num_episodes` episodes under `policy`.
    ///
    /// Both `num_episodes` and `log_interval` must be positive.
    pub fn run<E, P, R>(
        &mut self,
        env: &mut E,
        policy: &P,
        num_episodes: usize,
        log_interval: usize,
        rng: &mut R,
    ) -> Result<()>
    where
        E: Environment<State = S>,
        P: BehaviorPolicy<S> + ?Sized,
        R: Rng,
    {
        validate_episodes(num_episodes)?;
        validate_log_interval(log_interval)?;
        tracing::info!(
            num_episodes,
            gamma = self.gamma,
            visit_mode = ?self.visit_mode,
            "starting Monte Carlo prediction"
        );

        for i_episode in 1..=num_episodes {
            if i_episode % log_interval == 0 {
                tracing::debug!(episode = i_episode, num_episodes, "prediction progress");
            }
            let episode = generate_episode(env, policy, rng)?;
            self.update(&episode)?;
        }

        tracing::info!(
            episodes = self.episodes_seen,
            states = self.q.num_states(),
            "Monte Carlo prediction finished"
        );
        Ok(())
    }

    pub fn q(&self) -> &QTable<S> {
        &self.q
    }

    pub fn into_q(self) -> QTable<S> {
        self.q
    }

    /// N[s, a], zero when never observed
    pub fn visit_count(&self, state: &S, action: usize) -> u64 {
        self.counts
            .get(state)
            .and_then(|row| row.get(action))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of observed returns for (s, a), zero when never observed
    pub fn returns_sum(&self, state: &S, action: usize) -> f64 {
        self.returns_sum
            .get(state)
            .and_then(|row| row.get(action))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn episodes_seen(&self) -> usize {
        self.episodes_seen
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn visit_mode(&self) -> VisitMode {
        self.visit_mode
    }
}

/// Estimate Q for a fixed `policy` over `config.num_episodes` episodes
pub fn mc_prediction<E, P, R>(
    env: &mut E,
    policy: &P,
    config: &PredictionConfig,
    rng: &mut R,
) -> Result<McPrediction<E::State>>
where
    E: Environment,
    P: BehaviorPolicy<E::State> + ?Sized,
    R: Rng,
{
    let mut prediction = McPrediction::from_config(env.num_actions(), config)?;
    prediction.run(env, policy, config.num_episodes, config.log_interval, rng)?;
    Ok(prediction)
}
