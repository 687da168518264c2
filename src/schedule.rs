use serde::{Deserialize, Serialize};

use crate::error::{McError, Result};

/// Multiplicative exploration decay with a floor.
///
/// Each call to [`EpsilonSchedule::decay`] applies `ε ← max(ε · decay_rate, ε_min)`,
/// so after `n` decays `ε = max(ε_start · decay_rate^n, ε_min)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    start: f64,
    decay_rate: f64,
    min: f64,
    current: f64,
    decays: u64,
}

impl EpsilonSchedule {
    pub fn new(start: f64, decay_rate: f64, min: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&start) {
            return Err(McError::invalid_parameter("eps_start", "must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&min) {
            return Err(McError::invalid_parameter("eps_min", "must be in [0, 1]"));
        }
        if min > start {
            return Err(McError::invalid_parameter("eps_min", "must not exceed eps_start"));
        }
        if !(decay_rate > 0.0 && decay_rate <= 1.0) {
            return Err(McError::invalid_parameter("eps_decay", "must be in (0, 1]"));
        }

        Ok(EpsilonSchedule {
            start,
            decay_rate,
            min,
            current: start,
            decays: 0,
        })
    }

    /// Schedule that never changes
    pub fn constant(epsilon: f64) -> Result<Self> {
        Self::new(epsilon, 1.0, epsilon)
    }

    /// Value the next [`EpsilonSchedule::decay`] will produce, without applying it
    pub fn next_value(&self) -> f64 {
        (self.current * self.decay_rate).max(self.min)
    }

    /// Apply one decay step and return the new value
    pub fn decay(&mut self) -> f64 {
        self.current = self.next_value();
        self.decays += 1;
        self.current
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn decays(&self) -> u64 {
        self.decays
    }

    pub fn floor(&self) -> f64 {
        self.min
    }

    pub fn is_at_floor(&self) -> bool {
        self.current <= self.min
    }

    /// Closed-form value after `n` decays from the start
    pub fn value_after(&self, n: u64) -> f64 {
        (self.start * self.decay_rate.powf(n as f64)).max(self.min)
    }

    pub fn reset(&mut self) {
        self.current = self.start;
        self.decays = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decay_sequence() {
        let mut schedule = EpsilonSchedule::new(1.0, 0.5, 0.1).unwrap();
        assert_eq!(schedule.decay(), 0.5);
        assert_eq!(schedule.decay(), 0.25);
        assert_eq!(schedule.decay(), 0.125);
        assert_eq!(schedule.decay(), 0.1);
        assert_eq!(schedule.decay(), 0.1);
        assert!(schedule.is_at_floor());
        assert_eq!(schedule.decays(), 5);
        assert_eq!(schedule.next_value(), 0.1);
    }

    #[test]
    fn test_constant_schedule() {
        let mut schedule = EpsilonSchedule::constant(0.3).unwrap();
        for _ in 0..10 {
            assert_eq!(schedule.decay(), 0.3);
        }
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(EpsilonSchedule::new(1.5, 0.9, 0.1).is_err());
        assert!(EpsilonSchedule::new(0.5, 0.9, 0.6).is_err());
        assert!(EpsilonSchedule::new(1.0, 0.0, 0.1).is_err());
        assert!(EpsilonSchedule::new(1.0, 1.1, 0.1).is_err());
        assert!(EpsilonSchedule::new(f64::NAN, 0.9, 0.1).is_err());
        assert!(EpsilonSchedule::new(1.0, f64::NAN, 0.1).is_err());
    }

    #[test]
    fn test_reset() {
        let mut schedule = EpsilonSchedule::new(1.0, 0.9, 0.0).unwrap();
        schedule.decay();
        schedule.reset();
        assert_eq!(schedule.current(), 1.0);
        assert_eq!(schedule.decays(), 0);
    }
}
