//! Reference game implementations.
//!
//! - `tictactoe`: two players, perfect information
//! - `bamboo`: 2-6 players, hidden hands and draw piles

pub mod bamboo;
pub mod tictactoe;
