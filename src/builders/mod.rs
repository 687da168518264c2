pub mod control;
pub mod prediction;

pub use control::McControlBuilder;
pub use prediction::McPredictionBuilder;
