//! TicTacToe forward model.

use serde::{Deserialize, Serialize};

use crate::core::{Action, ComponentId, ContainerConfig, GameState, PlayerId};
use crate::rules::{ForwardModel, PlayerResult};

/// The board container.
pub const BOARD: ComponentId = ComponentId(0);

/// Cell property: seat index of the mark, or `EMPTY`.
pub const MARK: &str = "mark";
pub const EMPTY: i64 = -1;

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Cell component for board index `0..9` (row-major).
#[must_use]
pub fn cell(index: usize) -> ComponentId {
    ComponentId(1 + index as u32)
}

/// Mark a cell for the current player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Place(pub ComponentId);

impl Action for Place {
    fn execute(&self, state: &mut GameState) -> bool {
        if state.registry.prop(self.0, MARK) != Some(EMPTY) {
            return false;
        }
        let mark = state.current_player().index() as i64;
        state.registry.set_prop(self.0, MARK, mark)
    }

    fn describe(&self, state: &GameState) -> String {
        let index = (self.0 .0 - 1) as usize;
        format!("{} at ({}, {})", state.current_player(), index / 3, index % 3)
    }
}

/// Classic 3x3 TicTacToe for two players.
#[derive(Clone, Copy, Debug, Default)]
pub struct TicTacToe;

impl TicTacToe {
    pub fn new() -> Self {
        Self
    }

    /// A set-up two-player game.
    pub fn new_game(&self, seed: u64) -> GameState {
        let mut state = GameState::new(2, seed);
        self.setup(&mut state);
        state
    }

    /// Who marked cell `index`, if anyone.
    #[must_use]
    pub fn mark(state: &GameState, index: usize) -> Option<PlayerId> {
        match state.registry.prop(cell(index), MARK) {
            Some(mark) if mark >= 0 => Some(PlayerId::new(mark as u8)),
            _ => None,
        }
    }

    /// The player owning a complete line, if any.
    #[must_use]
    pub fn winner(state: &GameState) -> Option<PlayerId> {
        LINES.iter().find_map(|line| {
            let first = Self::mark(state, line[0])?;
            line[1..]
                .iter()
                .all(|&i| Self::mark(state, i) == Some(first))
                .then_some(first)
        })
    }

    /// Board as three rows of `X`, `O` and `.`.
    #[must_use]
    pub fn render(state: &GameState) -> String {
        let mut out = String::with_capacity(12);
        for row in 0..3 {
            for col in 0..3 {
                out.push(match Self::mark(state, row * 3 + col) {
                    Some(p) if p.index() == 0 => 'X',
                    Some(_) => 'O',
                    None => '.',
                });
            }
            out.push('\n');
        }
        out
    }
}

impl ForwardModel for TicTacToe {
    type Action = Place;

    fn setup(&self, state: &mut GameState) {
        assert_eq!(state.player_count(), 2, "TicTacToe is a two-player game");
        let board = state.registry.add_container(ContainerConfig::new("board").ordered());
        debug_assert_eq!(board, BOARD);

        for index in 0..9 {
            let id = state.registry.add_item(format!("cell {}", index), &[(MARK, EMPTY)], board);
            debug_assert_eq!(id, cell(index));
        }
    }

    fn compute_available_actions(&self, state: &GameState) -> Vec<Place> {
        if state.is_terminal() {
            return Vec::new();
        }
        (0..9)
            .filter(|&i| Self::mark(state, i).is_none())
            .map(|i| Place(cell(i)))
            .collect()
    }

    fn after_action(&self, state: &mut GameState, _action: &Place) {
        if let Some(winner) = Self::winner(state) {
            for p in PlayerId::all(2) {
                let result = if p == winner { PlayerResult::Win } else { PlayerResult::Lose };
                state.set_result(p, result);
            }
            state.end_game();
        } else if (0..9).all(|i| Self::mark(state, i).is_some()) {
            for p in PlayerId::all(2) {
                state.set_result(p, PlayerResult::Draw);
            }
            state.end_game();
        }
    }
}
