//! Reference simulators implementing [`crate::env::Environment`].

pub mod blackjack;

pub use blackjack::{Blackjack, BlackjackState, HIT, STICK};
