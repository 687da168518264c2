use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{McError, Result};

/// Which occurrences of a (state, action) pair inside one episode contribute
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VisitMode {
    /// Every occurrence contributes its own return
    #[default]
    EveryVisit,
    /// Only the first occurrence in each episode contributes
    FirstVisit,
}

/// Hyper-parameters for Monte Carlo prediction of a fixed policy
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub num_episodes: usize,
    pub gamma: f64,
    pub visit_mode: VisitMode,
    /// Episodes between progress log lines
    pub log_interval: usize,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        PredictionConfig {
            num_episodes: 500_000,
            gamma: 1.0,
            visit_mode: VisitMode::EveryVisit,
            log_interval: 1000,
        }
    }
}

impl PredictionConfig {
    pub fn validate(&self) -> Result<()> {
        validate_episodes(self.num_episodes)?;
        validate_gamma(self.gamma)?;
        validate_log_interval(self.log_interval)
    }
}

/// Hyper-parameters for constant-alpha Monte Carlo control
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub num_episodes: usize,
    /// Constant step size
    pub alpha: f64,
    pub gamma: f64,
    pub eps_start: f64,
    pub eps_decay: f64,
    pub eps_min: f64,
    pub visit_mode: VisitMode,
    pub log_interval: usize,
}

impl Default for ControlConfig {
    fn default() -> Self {
        ControlConfig {
            num_episodes: 500_000,
            alpha: 0.02,
            gamma: 1.0,
            eps_start: 1.0,
            eps_decay: 0.999999,
            eps_min: 0.05,
            visit_mode: VisitMode::EveryVisit,
            log_interval: 1000,
        }
    }
}

impl ControlConfig {
    pub fn validate(&self) -> Result<()> {
        validate_episodes(self.num_episodes)?;
        validate_gamma(self.gamma)?;
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(McError::invalid_parameter("alpha", "must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.eps_start) {
            return Err(McError::invalid_parameter("eps_start", "must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.eps_min) {
            return Err(McError::invalid_parameter("eps_min", "must be in [0, 1]"));
        }
        if self.eps_min > self.eps_start {
            return Err(McError::invalid_parameter("eps_min", "must not exceed eps_start"));
        }
        if !(self.eps_decay > 0.0 && self.eps_decay <= 1.0) {
            return Err(McError::invalid_parameter("eps_decay", "must be in (0, 1]"));
        }
        validate_log_interval(self.log_interval)
    }
}

macro_rules! impl_json_io {
    ($config:ty) => {
        impl $config {
            pub fn from_json(json: &str) -> Result<Self> {
                let config: Self = serde_json::from_str(json)?;
                config.validate()?;
                Ok(config)
            }

            pub fn to_json(&self) -> Result<String> {
                Ok(serde_json::to_string_pretty(self)?)
            }

            pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
                Self::from_json(&fs::read_to_string(path)?)
            }

            pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
                fs::write(path, self.to_json()?)?;
                Ok(())
            }
        }
    };
}

impl_json_io!(PredictionConfig);
impl_json_io!(ControlConfig);

pub(crate) fn validate_episodes(num_episodes: usize) -> Result<()> {
    if num_episodes == 0 {
        return Err(McError::invalid_parameter("num_episodes", "must be positive"));
    }
    Ok(())
}

fn validate_gamma(gamma: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&gamma) {
        return Err(McError::invalid_parameter("gamma", "must be in [0, 1]"));
    }
    Ok(())
}

pub(crate) fn validate_log_interval(log_interval: usize) -> Result<()> {
    if log_interval == 0 {
        return Err(McError::invalid_parameter("log_interval", "must be positive"));
    }
    Ok(())
}
