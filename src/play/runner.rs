//! Single-threaded game loop.
//!
//! The runner owns the live state's only writer. Agents are consulted only
//! when more than one action is legal; forced moves are applied directly.
//! Every committed move is reported to every agent so searchers can follow
//! it down their previous trees.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{Action, ActionRecord, GameState, PlayerMap};
use crate::mcts::{Result, SearchError};
use crate::rules::{ForwardModel, PlayerResult};

use super::agent::Agent;

/// Summary of a finished (or abandoned) game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Per-player results (all `Undecided` if the action limit was hit).
    pub results: PlayerMap<PlayerResult>,

    /// Per-player raw game scores.
    pub scores: PlayerMap<f64>,

    /// Actions committed.
    pub actions: usize,

    /// Actions taken without consulting an agent.
    pub forced: usize,

    /// Did the game reach a terminal state?
    pub completed: bool,
}

/// Plays games with a forward model and a set of agents.
pub struct GameRunner<M: ForwardModel> {
    model: M,
    history: Vec<ActionRecord<M::Action>>,
    max_actions: usize,
}

impl<M: ForwardModel> GameRunner<M> {
    /// Create a runner with the default action limit.
    pub fn new(model: M) -> Self {
        Self {
            model,
            history: Vec::new(),
            max_actions: 10_000,
        }
    }

    /// Set the maximum number of actions per game.
    pub fn with_max_actions(mut self, max: usize) -> Self {
        self.max_actions = max;
        self
    }

    /// A freshly set-up state.
    pub fn new_game(&self, player_count: usize, seed: u64) -> GameState {
        let mut state = GameState::new(player_count, seed);
        self.model.setup(&mut state);
        state
    }

    /// Play `state` to the end (or the action limit).
    ///
    /// `agents` is indexed by seat. Panics if its length differs from the
    /// state's player count.
    pub fn play(
        &mut self,
        state: &mut GameState,
        agents: &mut [Box<dyn Agent<M>>],
    ) -> Result<GameOutcome> {
        assert_eq!(
            agents.len(),
            state.player_count(),
            "one agent per seat required"
        );

        self.history.clear();
        let mut forced = 0;

        while !state.is_terminal() && self.history.len() < self.max_actions {
            if self.step(state, agents)? {
                forced += 1;
            }
        }

        let outcome = GameOutcome {
            results: state.results().clone(),
            scores: PlayerMap::new(state.player_count(), |p| self.model.game_score(state, p)),
            actions: self.history.len(),
            forced,
            completed: state.is_terminal(),
        };

        debug!(
            "game over after {} actions ({} forced): {:?}",
            outcome.actions, outcome.forced, outcome.results
        );

        Ok(outcome)
    }

    /// Commit one action. Returns `true` if it was forced.
    pub fn step(
        &mut self,
        state: &mut GameState,
        agents: &mut [Box<dyn Agent<M>>],
    ) -> Result<bool> {
        if state.is_terminal() {
            return Err(SearchError::TerminalState);
        }

        let player = state.current_player();
        let mut actions = self.model.compute_available_actions(state);

        let (action, forced) = match actions.len() {
            0 => return Err(SearchError::NoLegalActions),
            1 => (actions.swap_remove(0), true),
            _ => {
                let agent = &mut agents[player.index()];
                (agent.choose_action(&self.model, state, &actions)?, false)
            }
        };

        debug!(
            "turn {}: {} ({}) plays {}",
            state.turn,
            player,
            agents[player.index()].name(),
            action.describe(state)
        );

        let record = ActionRecord::new(player, action.clone(), state.turn, self.history.len() as u32);
        self.model.next(state, &action);

        for agent in agents.iter_mut() {
            agent.observe(player, &action);
        }
        self.history.push(record);

        Ok(forced)
    }

    /// Actions committed in the current (or last) game.
    #[must_use]
    pub fn history(&self) -> &[ActionRecord<M::Action>] {
        &self.history
    }

    /// Get the forward model.
    pub fn model(&self) -> &M {
        &self.model
    }
}
