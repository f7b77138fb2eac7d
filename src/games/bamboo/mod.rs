//! Bamboo: a hidden-information draw/resolve card game.
//!
//! - Each player holds number cards and operator cards (`+`, `-`), seen
//!   only by their owner
//! - One objective card is face up
//! - On your turn: play numbers and operators whose left-to-right value
//!   equals the objective (they and the objective go to your won pile), or
//!   pass and draw
//! - The game ends when the number or objective draw pile runs out; the
//!   largest won pile wins
//!
//! Opponents' hands pool with the matching draw pile during
//! redeterminization, so searches never see the real hidden cards.

mod actions;
mod game;
pub mod layout;
mod params;

pub use actions::{evaluate, BambooAction, Op, PassAction, ResolveAction};
pub use game::Bamboo;
pub use params::BambooParams;
