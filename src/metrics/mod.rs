pub mod tracker;
pub mod statistics;

pub use tracker::{EpisodeRecord, MetricsTracker, TrainingMetrics};
pub use statistics::{RunningStats, Statistics};
