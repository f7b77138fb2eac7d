//! TicTacToe: the perfect-information reference game.
//!
//! Nine cell components carry a `mark` property. Used to check search
//! strength and tree-reuse accounting where nothing is hidden.

mod game;

pub use game::{cell, Place, TicTacToe, BOARD, EMPTY, MARK};
