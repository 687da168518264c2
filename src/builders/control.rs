use crate::config::{ControlConfig, VisitMode};
use crate::control::McControl;
use crate::error::{McError, Result};
use crate::types::State;

/// Builder for [`McControl`]
///
/// ```rust
/// use montecarlo_rl::builders::McControlBuilder;
///
/// let control = McControlBuilder::new()
///     .num_actions(2)
///     .num_episodes(10_000)
///     .alpha(0.02)
///     .epsilon(1.0, 0.9999, 0.05)
///     .build::<(u8, u8, bool)>()
///     .unwrap();
/// assert_eq!(control.epsilon(), 1.0);
/// ```
pub struct McControlBuilder {
    num_actions: Option<usize>,
    config: ControlConfig,
    history_size: usize,
}

impl McControlBuilder {
    pub fn new() -> Self {
        McControlBuilder {
            num_actions: None,
            config: ControlConfig::default(),
            history_size: 1000,
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: ControlConfig) -> Self {
        McControlBuilder {
            config,
            ..Self::new()
        }
    }

    pub fn num_actions(mut self, num_actions: usize) -> Self {
        self.num_actions = Some(num_actions);
        self
    }

    pub fn num_episodes(mut self, num_episodes: usize) -> Self {
        self.config.num_episodes = num_episodes;
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.config.alpha = alpha;
        self
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.config.gamma = gamma;
        self
    }

    /// Exploration schedule: start value, per-episode decay rate and floor
    pub fn epsilon(mut self, start: f64, decay: f64, min: f64) -> Self {
        self.config.eps_start = start;
        self.config.eps_decay = decay;
        self.config.eps_min = min;
        self
    }

    pub fn visit_mode(mut self, visit_mode: VisitMode) -> Self {
        self.config.visit_mode = visit_mode;
        self
    }

    pub fn log_interval(mut self, log_interval: usize) -> Self {
        self.config.log_interval = log_interval;
        self
    }

    pub fn history_size(mut self, history_size: usize) -> Self {
        self.history_size = history_size;
        self
    }

    pub fn build<S: State>(self) -> Result<McControl<S>> {
        let num_actions = self.num_actions.ok_or_else(|| McError::InvalidParameter {
            name: "num_actions".to_string(),
            reason: "Number of actions not specified".to_string(),
        })?;

        if self.history_size == 0 {
            return Err(McError::InvalidParameter {
                name: "history_size".to_string(),
                reason: "History size must be greater than 0".to_string(),
            });
        }

        Ok(McControl::new(num_actions, self.config)?.with_history_size(self.history_size))
    }
}

impl Default for McControlBuilder {
    fn default() -> Self {
        Self::new()
    }
}
