use crate::config::{PredictionConfig, VisitMode};
use crate::error::{McError, Result};
use crate::prediction::McPrediction;
use crate::types::State;

/// Builder for [`McPrediction`]
pub struct McPredictionBuilder {
    num_actions: Option<usize>,
    gamma: f64,
    visit_mode: VisitMode,
}

impl McPredictionBuilder {
    pub fn new() -> Self {
        let defaults = PredictionConfig::default();
        McPredictionBuilder {
            num_actions: None,
            gamma: defaults.gamma,
            visit_mode: defaults.visit_mode,
        }
    }

    pub fn num_actions(mut self, num_actions: usize) -> Self {
        self.num_actions = Some(num_actions);
        self
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn first_visit(mut self) -> Self {
        self.visit_mode = VisitMode::FirstVisit;
        self
    }

    pub fn every_visit(mut self) -> Self {
        self.visit_mode = VisitMode::EveryVisit;
        self
    }

    pub fn build<S: State>(self) -> Result<McPrediction<S>> {
        let num_actions = self.num_actions.ok_or_else(|| McError::InvalidParameter {
            name: "num_actions".to_string(),
            reason: "Number of actions not specified".to_string(),
        })?;

        McPrediction::new(num_actions, self.gamma, self.visit_mode)
    }
}

impl Default for McPredictionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
