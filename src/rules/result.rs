//! Per-player outcomes and overall game status.

use serde::{Deserialize, Serialize};

/// Outcome of a game for one player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerResult {
    /// Game still running for this player.
    #[default]
    Undecided,
    Win,
    Lose,
    Draw,
}

impl PlayerResult {
    /// Reward in [0, 1]: win 1, draw and undecided 0.5, loss 0.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            PlayerResult::Win => 1.0,
            PlayerResult::Lose => 0.0,
            PlayerResult::Draw | PlayerResult::Undecided => 0.5,
        }
    }
}

/// Whether the game is still being played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    Ended,
}
