use std::fmt;

/// Result type for Monte Carlo operations
pub type Result<T> = std::result::Result<T, McError>;

/// Main error type for the crate
#[derive(Debug, Clone, PartialEq)]
pub enum McError {
    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Action outside the simulator's action set
    InvalidAction {
        action: usize,
        max_actions: usize,
    },

    /// Probability vector that cannot be sampled from
    InvalidDistribution(String),

    /// The simulator broke its reset/step contract
    SimulatorContract(String),

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),
}

impl fmt::Display for McError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            McError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            McError::InvalidAction { action, max_actions } => {
                write!(f, "Invalid action {}: must be less than {}", action, max_actions)
            }
            McError::InvalidDistribution(msg) => write!(f, "Invalid distribution: {}", msg),
            McError::SimulatorContract(msg) => write!(f, "Simulator contract violation: {}", msg),
            McError::IoError(msg) => write!(f, "IO error: {}", msg),
            McError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for McError {}

impl From<std::io::Error> for McError {
    fn from(err: std::io::Error) -> Self {
        McError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for McError {
    fn from(err: bincode::Error) -> Self {
        McError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for McError {
    fn from(err: serde_json::Error) -> Self {
        McError::SerializationError(err.to_string())
    }
}

impl McError {
    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        McError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn simulator_contract<S: Into<String>>(msg: S) -> Self {
        McError::SimulatorContract(msg.into())
    }
}
