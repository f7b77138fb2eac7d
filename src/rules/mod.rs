//! Forward model trait and game outcomes.
//!
//! Games implement `ForwardModel` to define:
//! - Initial setup of a state
//! - Legal actions for each game state
//! - Post-action bookkeeping: turn order, termination, results
//!
//! The search never interprets game-specific concepts directly.

pub mod engine;
pub mod result;

pub use engine::ForwardModel;
pub use result::{GameStatus, PlayerResult};
