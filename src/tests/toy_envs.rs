use crate::env::{ActionSpace, Environment, Step};
use crate::error::{McError, Result};

/// One state, one action, one step with a constant reward
pub struct ConstantReward {
    pub reward: f64,
}

impl Environment for ConstantReward {
    type State = u8;
    type Info = ();

    fn reset(&mut self) -> u8 {
        0
    }

    fn step(&mut self, _action: usize) -> Result<Step<u8>> {
        Ok(Step::new(1, self.reward, true))
    }

    fn action_space(&self) -> ActionSpace {
        ActionSpace::new(1).unwrap()
    }
}

/// One state, action 0 pays +1, action 1 pays -1, then the episode ends
pub struct TwoArmed;

impl Environment for TwoArmed {
    type State = u8;
    type Info = ();

    fn reset(&mut self) -> u8 {
        0
    }

    fn step(&mut self, action: usize) -> Result<Step<u8>> {
        let reward = if action == 0 { 1.0 } else { -1.0 };
        Ok(Step::new(1, reward, true))
    }

    fn action_space(&self) -> ActionSpace {
        ActionSpace::BINARY
    }
}

/// Stays in state 0 for `length` steps, paying 1 per step
pub struct Loop {
    pub length: usize,
    pub taken: usize,
}

impl Loop {
    pub fn new(length: usize) -> Self {
        Loop { length, taken: 0 }
    }
}

impl Environment for Loop {
    type State = u8;
    type Info = ();

    fn reset(&mut self) -> u8 {
        self.taken = 0;
        0
    }

    fn step(&mut self, _action: usize) -> Result<Step<u8>> {
        self.taken += 1;
        Ok(Step::new(0, 1.0, self.taken == self.length))
    }

    fn action_space(&self) -> ActionSpace {
        ActionSpace::new(1).unwrap()
    }
}

/// Fails on every step
pub struct Faulty;

impl Environment for Faulty {
    type State = u8;
    type Info = ();

    fn reset(&mut self) -> u8 {
        0
    }

    fn step(&mut self, _action: usize) -> Result<Step<u8>> {
        Err(McError::simulator_contract("simulator offline"))
    }

    fn action_space(&self) -> ActionSpace {
        ActionSpace::BINARY
    }
}
