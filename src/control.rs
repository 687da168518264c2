//! # Monte Carlo Control
//!
//! Generalized policy iteration with an epsilon-greedy behavior policy and a
//! constant step size. Each iteration decays epsilon, rolls out one episode
//! against the current table and moves every visited estimate toward its
//! sampled return:
//!
//! ```text
//! Q[s,a] ← Q[s,a] + α (G − Q[s,a])
//! ```
//!
//! The constant step size weights recent returns more heavily, which suits
//! the non-stationary target produced by a behavior policy that keeps
//! changing. After the episode budget the greedy policy is read off the table.

use ndarray::Array1;
use rand::Rng;

use crate::config::{ControlConfig, VisitMode};
use crate::env::Environment;
use crate::episode::{check_actions, generate_episode, visit_mask};
use crate::error::{McError, Result};
use crate::metrics::{EpisodeRecord, MetricsTracker, TrainingMetrics};
use crate::policy::EpsilonGreedy;
use crate::q_table::{Policy, QTable};
use crate::returns::{discounts, returns_with_discounts};
use crate::schedule::EpsilonSchedule;
use crate::types::{Episode, State};

/// Constant-alpha update of `q` from one complete episode
pub fn update_q<S: State>(
    q: &mut QTable<S>,
    episode: &Episode<S>,
    alpha: f64,
    gamma: f64,
    visit_mode: VisitMode,
) -> Result<()> {
    if !(alpha > 0.0 && alpha <= 1.0) {
        return Err(McError::invalid_parameter("alpha", "must be in (0, 1]"));
    }
    if !(0.0..=1.0).contains(&gamma) {
        return Err(McError::invalid_parameter("gamma", "must be in [0, 1]"));
    }
    check_actions(episode, q.num_actions())?;

    let rewards = Array1::from(episode.rewards());
    let discounts = discounts(gamma, rewards.len());
    let returns = returns_with_discounts(rewards.view(), discounts.view());
    let mask = visit_mask(episode, visit_mode);

    for ((transition, g), counted) in episode.iter().zip(returns).zip(mask) {
        if !counted {
            continue;
        }
        let mut row = q.row_mut(&transition.state);
        let old_q = row[transition.action];
        row[transition.action] = old_q + alpha * (g - old_q);
    }
    Ok(())
}

/// Result of a finished control run
#[derive(Clone, Debug)]
pub struct ControlOutcome<S> {
    pub policy: Policy<S>,
    pub q: QTable<S>,
    pub metrics: TrainingMetrics,
    /// Exploration rate after the final decay
    pub epsilon: f64,
}

/// Epsilon-greedy Monte Carlo control over a tabular Q
#[derive(Clone, Debug)]
pub struct McControl<S> {
    config: ControlConfig,
    q: QTable<S>,
    schedule: EpsilonSchedule,
    tracker: MetricsTracker,
    episodes_done: usize,
}

impl<S: State> McControl<S> {
    /// Validates every hyper-parameter before any episode runs
    pub fn new(num_actions: usize, config: ControlConfig) -> Result<Self> {
        config.validate()?;
        let schedule = EpsilonSchedule::new(config.eps_start, config.eps_decay, config.eps_min)?;
        Ok(McControl {
            q: QTable::new(num_actions)?,
            schedule,
            tracker: MetricsTracker::default(),
            episodes_done: 0,
            config,
        })
    }

    /// Keep `history_size` episodes of per-episode metrics
    pub fn with_history_size(mut self, history_size: usize) -> Self {
        self.tracker = MetricsTracker::new(history_size);
        self
    }

    /// One GPI iteration: decay epsilon, generate an episode, update Q.
    ///
    /// The decayed epsilon is only committed once the episode has been
    /// applied, so a failed episode leaves the controller unchanged.
    pub fn run_episode<E, R>(&mut self, env: &mut E, rng: &mut R) -> Result<EpisodeRecord>
    where
        E: Environment<State = S>,
        R: Rng,
    {
        let epsilon = self.schedule.next_value();
        let episode = {
            let behavior = EpsilonGreedy::new(&self.q, epsilon)?;
            generate_episode(env, &behavior, rng)?
        };
        update_q(
            &mut self.q,
            &episode,
            self.config.alpha,
            self.config.gamma,
            self.config.visit_mode,
        )?;

        self.schedule.decay();
        self.episodes_done += 1;
        let record = EpisodeRecord {
            episode: self.episodes_done,
            length: episode.len(),
            total_reward: episode.total_reward(),
            epsilon,
        };
        self.tracker.record_episode(&record);
        Ok(record)
    }

    /// Run the configured episode budget and extract the greedy policy
    pub fn train<E, R>(mut self, env: &mut E, rng: &mut R) -> Result<ControlOutcome<S>>
    where
        E: Environment<State = S>,
        R: Rng,
    {
        let num_episodes = self.config.num_episodes;
        let log_interval = self.config.log_interval;
        tracing::info!(
            num_episodes,
            alpha = self.config.alpha,
            gamma = self.config.gamma,
            eps_start = self.config.eps_start,
            eps_decay = self.config.eps_decay,
            eps_min = self.config.eps_min,
            "starting Monte Carlo control"
        );

        for _ in 0..num_episodes {
            let record = self.run_episode(env, rng)?;
            if record.episode % log_interval == 0 {
                tracing::debug!(
                    episode = record.episode,
                    num_episodes,
                    epsilon = record.epsilon,
                    avg_reward = ?self.tracker.avg_episode_reward(log_interval),
                    "control progress"
                );
            }
        }

        let policy = self.q.policy();
        let rewards = self.tracker.metrics().reward_stats.to_statistics();
        tracing::info!(
            episodes = self.episodes_done,
            states = policy.len(),
            epsilon = self.schedule.current(),
            reward_mean = rewards.mean,
            reward_std = rewards.std,
            "Monte Carlo control finished"
        );

        Ok(ControlOutcome {
            policy,
            epsilon: self.schedule.current(),
            q: self.q,
            metrics: self.tracker.into_metrics(),
        })
    }

    pub fn q(&self) -> &QTable<S> {
        &self.q
    }

    pub fn epsilon(&self) -> f64 {
        self.schedule.current()
    }

    pub fn episodes_done(&self) -> usize {
        self.episodes_done
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn metrics(&self) -> &TrainingMetrics {
        self.tracker.metrics()
    }

    /// Greedy policy for the table as it stands now
    pub fn policy(&self) -> Policy<S> {
        self.q.policy()
    }
}

/// Run Monte Carlo control on `env` and return the greedy policy with its table
pub fn mc_control<E, R>(env: &mut E, config: ControlConfig, rng: &mut R) -> Result<ControlOutcome<E::State>>
where
    E: Environment,
    R: Rng,
{
    McControl::new(env.num_actions(), config)?.train(env, rng)
}
