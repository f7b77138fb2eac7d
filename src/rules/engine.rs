//! Forward model trait for game implementations.
//!
//! Games implement `ForwardModel` to define their rules:
//! - How a fresh state is populated
//! - What actions are legal
//! - What bookkeeping follows every action (turn order, termination, results)
//!
//! Search code only ever talks to a game through this trait.

use crate::core::action::Action;
use crate::core::player::PlayerId;
use crate::core::state::GameState;

/// Forward model trait.
///
/// ## Implementation Notes
///
/// - `setup`: called exactly once per game instance
/// - `compute_available_actions`: pure; empty only when the game is over
/// - `after_action`: turn/phase advancement, termination and results
/// - `ends_turn`: return `false` for actions that keep the turn owner acting
///
/// The provided `next` ties these together and is the only transition the
/// engine uses.
pub trait ForwardModel {
    /// The game's action type.
    type Action: Action;

    /// Populate a fresh state: components, ownership, shuffles, initial deal.
    fn setup(&self, state: &mut GameState);

    /// Legal actions for `state.current_player()`.
    fn compute_available_actions(&self, state: &GameState) -> Vec<Self::Action>;

    /// Post-action bookkeeping common to all actions of this game.
    ///
    /// Runs after the action executed and after any resolved reaction was
    /// popped. Sets results and ends the game when a termination condition
    /// holds.
    fn after_action(&self, state: &mut GameState, action: &Self::Action);

    /// Does `action`, taken by the turn owner, pass the turn?
    fn ends_turn(&self, state: &GameState, action: &Self::Action) -> bool {
        let _ = (state, action);
        true
    }

    /// Apply `action` and all post-action bookkeeping.
    ///
    /// A reaction pops the reaction queue and does not rotate the turn.
    /// Otherwise the turn rotates round-robin unless the game ended or
    /// `ends_turn` says the turn owner keeps acting.
    fn next(&self, state: &mut GameState, action: &Self::Action) {
        let reacted = state.has_reactions();
        let passes_turn = !reacted && self.ends_turn(state, action);

        action.execute(state);
        if reacted {
            state.resolve_reaction();
        }

        self.after_action(state, action);

        if passes_turn && !state.is_terminal() {
            state.end_player_turn();
        }
    }

    /// Raw game score for `player` (e.g. points, won cards).
    fn game_score(&self, state: &GameState, player: PlayerId) -> f64 {
        state.result(player).value()
    }

    /// Progress estimate in [0, 1] for `player`.
    ///
    /// Terminal states report the result value; non-terminal states default
    /// to 0.5.
    fn heuristic_score(&self, state: &GameState, player: PlayerId) -> f64 {
        if state.is_terminal() {
            state.result(player).value()
        } else {
            0.5
        }
    }
}
