//! # Simulator Interface
//!
//! The decision process itself lives outside this crate. Anything that can be
//! reset to an initial state and stepped with a discrete action can drive the
//! estimators by implementing [`Environment`].
//!
//! Contract expected from every simulator:
//! - `reset` starts a fresh episode and never touches earlier ones
//! - `step` advances one time step and reports termination through `done`
//! - calling `step` after `done` without a `reset` is a contract violation
//! - every episode terminates; nothing in this crate bounds episode length

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{McError, Result};
use crate::types::State;

/// Discrete action set `[0, n)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpace {
    n: usize,
}

impl ActionSpace {
    /// Two actions, `0` and `1`
    pub const BINARY: ActionSpace = ActionSpace { n: 2 };

    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(McError::invalid_parameter("num_actions", "must be at least 1"));
        }
        Ok(ActionSpace { n })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn contains(&self, action: usize) -> bool {
        action < self.n
    }

    /// Uniformly random action
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(0..self.n)
    }
}

/// Outcome of a single simulator step
#[derive(Clone, Debug, PartialEq)]
pub struct Step<S, I = ()> {
    pub next_state: S,
    pub reward: f64,
    pub done: bool,
    pub info: I,
}

impl<S> Step<S, ()> {
    pub fn new(next_state: S, reward: f64, done: bool) -> Self {
        Step { next_state, reward, done, info: () }
    }
}

/// Episodic simulator with a finite discrete action set
pub trait Environment {
    type State: State;
    type Info;

    /// Begin a new episode and return its initial state
    fn reset(&mut self) -> Self::State;

    /// Advance one time step with `action`
    fn step(&mut self, action: usize) -> Result<Step<Self::State, Self::Info>>;

    fn action_space(&self) -> ActionSpace;

    fn num_actions(&self) -> usize {
        self.action_space().n()
    }

    /// Uniform fallback used for states the learner has never seen
    fn sample_action(&self, rng: &mut dyn rand::RngCore) -> usize {
        self.action_space().sample(rng)
    }
}

/// Enforces the reset/step contract around a borrowed simulator.
///
/// The guard refuses actions outside the action space and any step after the
/// episode has terminated. Both cases are defects of the caller or the
/// simulator and are surfaced as errors rather than retried.
pub struct EpisodeGuard<'e, E: Environment + ?Sized> {
    env: &'e mut E,
    space: ActionSpace,
    done: bool,
    steps: usize,
}

impl<'e, E: Environment + ?Sized> EpisodeGuard<'e, E> {
    /// Reset the simulator and return the guard with the initial state
    pub fn start(env: &'e mut E) -> (Self, E::State) {
        let space = env.action_space();
        let state = env.reset();
        let guard = EpisodeGuard { env, space, done: false, steps: 0 };
        (guard, state)
    }

    pub fn step(&mut self, action: usize) -> Result<Step<E::State, E::Info>> {
        if self.done {
            tracing::warn!(steps = self.steps, "step requested after episode termination");
            return Err(McError::simulator_contract(format!(
                "step called after termination at step {}",
                self.steps
            )));
        }
        if !self.space.contains(action) {
            return Err(McError::InvalidAction { action, max_actions: self.space.n() });
        }
        let step = self.env.step(action)?;
        self.steps += 1;
        self.done = step.done;
        Ok(step)
    }

    pub fn sample_action<R: Rng>(&self, rng: &mut R) -> usize {
        self.env.sample_action(rng)
    }

    pub fn action_space(&self) -> ActionSpace {
        self.space
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn steps(&self) -> usize {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Countdown {
        remaining: u32,
    }

    impl Environment for Countdown {
        type State = u32;
        type Info = ();

        fn reset(&mut self) -> u32 {
            self.remaining = 2;
            self.remaining
        }

        fn step(&mut self, _action: usize) -> Result<Step<u32>> {
            self.remaining -= 1;
            Ok(Step::new(self.remaining, 1.0, self.remaining == 0))
        }

        fn action_space(&self) -> ActionSpace {
            ActionSpace::BINARY
        }
    }

    #[test]
    fn test_action_space_rejects_empty() {
        assert!(ActionSpace::new(0).is_err());
        assert_eq!(ActionSpace::new(3).unwrap().n(), 3);
    }

    #[test]
    fn test_action_space_sample_in_range() {
        let space = ActionSpace::new(4).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(space.contains(space.sample(&mut rng)));
        }
    }

    #[test]
    fn test_guard_blocks_step_after_done() {
        let mut env = Countdown { remaining: 0 };
        let (mut guard, initial) = EpisodeGuard::start(&mut env);
        assert_eq!(initial, 2);
        assert!(!guard.step(0).unwrap().done);
        assert!(guard.step(1).unwrap().done);
        assert!(guard.is_done());
        assert!(matches!(guard.step(0), Err(McError::SimulatorContract(_))));
    }

    #[test]
    fn test_guard_rejects_out_of_range_action() {
        let mut env = Countdown { remaining: 0 };
        let (mut guard, _) = EpisodeGuard::start(&mut env);
        assert_eq!(
            guard.step(5),
            Err(McError::InvalidAction { action: 5, max_actions: 2 })
        );
        assert_eq!(guard.steps(), 0);
    }
}
