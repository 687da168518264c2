use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;

use super::statistics::RunningStats;

/// Outcome of one generated and applied episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// 1-based index within the run
    pub episode: usize,
    pub length: usize,
    /// Undiscounted sum of rewards
    pub total_reward: f64,
    /// Exploration rate the episode was generated with
    pub epsilon: f64,
}

/// Bounded per-episode history plus whole-run reward statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub episode_rewards: VecDeque<f64>,
    pub episode_lengths: VecDeque<usize>,
    pub epsilons: VecDeque<f64>,
    pub reward_stats: RunningStats,
    pub episodes: usize,
    pub total_steps: usize,
}

impl TrainingMetrics {
    pub fn new(history_size: usize) -> Self {
        TrainingMetrics {
            episode_rewards: VecDeque::with_capacity(history_size),
            episode_lengths: VecDeque::with_capacity(history_size),
            epsilons: VecDeque::with_capacity(history_size),
            reward_stats: RunningStats::new(),
            episodes: 0,
            total_steps: 0,
        }
    }
}

fn push_bounded<T>(history: &mut VecDeque<T>, value: T, history_size: usize) {
    if history.len() >= history_size {
        history.pop_front();
    }
    history.push_back(value);
}

/// Tracks metrics during training
#[derive(Debug, Clone)]
pub struct MetricsTracker {
    metrics: TrainingMetrics,
    history_size: usize,
}

impl MetricsTracker {
    pub fn new(history_size: usize) -> Self {
        let history_size = history_size.max(1);
        MetricsTracker {
            metrics: TrainingMetrics::new(history_size),
            history_size,
        }
    }

    pub fn record_episode(&mut self, record: &EpisodeRecord) {
        let size = self.history_size;
        push_bounded(&mut self.metrics.episode_rewards, record.total_reward, size);
        push_bounded(&mut self.metrics.episode_lengths, record.length, size);
        push_bounded(&mut self.metrics.epsilons, record.epsilon, size);
        self.metrics.reward_stats.update(record.total_reward);
        self.metrics.episodes += 1;
        self.metrics.total_steps += record.length;
    }

    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    pub fn into_metrics(self) -> TrainingMetrics {
        self.metrics
    }

    pub fn episode_count(&self) -> usize {
        self.metrics.episodes
    }

    /// Mean reward over the most recent `window` episodes
    pub fn avg_episode_reward(&self, window: usize) -> Option<f64> {
        if self.metrics.episode_rewards.is_empty() || window == 0 {
            return None;
        }

        let n = window.min(self.metrics.episode_rewards.len());
        let sum: f64 = self.metrics.episode_rewards.iter().rev().take(n).sum();
        Some(sum / n as f64)
    }

    /// Save metrics as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::error::Result<()> {
        let serialized = serde_json::to_string_pretty(&self.metrics)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new(1000)
    }
}
