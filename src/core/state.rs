//! Game state: component registry, progress fields, results and RNG streams.
//!
//! ## GameState
//!
//! - Component registry (every card, token, container)
//! - Turn owner plus a FIFO queue of players owed a reaction
//! - Turn, round and phase counters
//! - Game status and per-player result vector
//! - Gameplay and redeterminization random streams
//!
//! ## Copies
//!
//! `copy_for(observer)` is the only way to duplicate a state. The registry
//! is persistent (`im`), so the structural part of a copy is O(1). For a
//! seated observer the copy then has everything hidden from that observer
//! resampled, using the redeterminization stream and nothing else.

use im::Vector;

use super::player::{Observer, PlayerId, PlayerMap};
use super::config::PhaseId;
use super::rng::{GameRng, REDETERMINIZE_CONTEXT};
use crate::components::{redeterminize, ComponentRegistry};
use crate::rules::{GameStatus, PlayerResult};

/// Full game state, including hidden information.
#[derive(Debug)]
pub struct GameState {
    player_count: usize,

    /// Authoritative component store.
    pub registry: ComponentRegistry,

    /// Player whose turn it is.
    turn_owner: PlayerId,

    /// Players owed a reaction before rotation resumes, front first.
    reactive_players: Vector<PlayerId>,

    /// Number of completed player turns.
    pub turn: u32,

    /// Number of completed rotations around the table.
    pub round: u32,

    /// Current phase (game-specific, opaque to the engine).
    pub phase: PhaseId,

    status: GameStatus,

    results: PlayerMap<PlayerResult>,

    /// Gameplay stream, consumed by rule logic.
    pub rng: GameRng,

    /// Reserved for redeterminization; never read by rule logic.
    redeterminize_rng: GameRng,
}

impl GameState {
    /// Create an empty state. Forward models populate it in `setup`.
    #[must_use]
    pub fn new(player_count: usize, seed: u64) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let rng = GameRng::new(seed);
        let redeterminize_rng = rng.for_context(REDETERMINIZE_CONTEXT);

        Self {
            player_count,
            registry: ComponentRegistry::new(),
            turn_owner: PlayerId::new(0),
            reactive_players: Vector::new(),
            turn: 0,
            round: 0,
            phase: PhaseId::default(),
            status: GameStatus::InProgress,
            results: PlayerMap::with_default(player_count),
            rng,
            redeterminize_rng,
        }
    }

    /// Get player count.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Iterate over all player IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.player_count)
    }

    // === Turn Order ===

    /// The player who acts next: the front of the reaction queue if any,
    /// otherwise the turn owner.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.reactive_players
            .front()
            .copied()
            .unwrap_or(self.turn_owner)
    }

    /// Player whose turn it is, ignoring pending reactions.
    #[must_use]
    pub fn turn_owner(&self) -> PlayerId {
        self.turn_owner
    }

    /// Hand the turn to a specific player.
    pub fn set_turn_owner(&mut self, player: PlayerId) {
        self.turn_owner = player;
    }

    /// Queue a player owed a reaction.
    pub fn add_reactive_player(&mut self, player: PlayerId) {
        self.reactive_players.push_back(player);
    }

    /// Is any reaction pending?
    #[must_use]
    pub fn has_reactions(&self) -> bool {
        !self.reactive_players.is_empty()
    }

    /// Pending reactions, front first.
    #[must_use]
    pub fn reactive_players(&self) -> &Vector<PlayerId> {
        &self.reactive_players
    }

    /// Pop the reaction that just resolved.
    pub fn resolve_reaction(&mut self) -> Option<PlayerId> {
        self.reactive_players.pop_front()
    }

    /// Rotate the turn to the next seat, counting a round on wrap-around.
    pub fn end_player_turn(&mut self) {
        self.turn += 1;
        self.turn_owner = self.turn_owner.next(self.player_count);
        if self.turn_owner.index() == 0 {
            self.round += 1;
        }
    }

    // === Status & Results ===

    /// Current game status.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Has the game ended?
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status == GameStatus::Ended
    }

    /// Per-player result vector.
    #[must_use]
    pub fn results(&self) -> &PlayerMap<PlayerResult> {
        &self.results
    }

    /// Result for one player.
    #[must_use]
    pub fn result(&self, player: PlayerId) -> PlayerResult {
        self.results[player]
    }

    /// Record a player's result.
    pub fn set_result(&mut self, player: PlayerId, result: PlayerResult) {
        self.results[player] = result;
    }

    /// End the game. Results must already be set by the rule set.
    pub fn end_game(&mut self) {
        self.status = GameStatus::Ended;
        self.reactive_players.clear();
    }

    // === Copying ===

    /// Copy this state as seen by `observer`.
    ///
    /// `Observer::Omniscient` yields a faithful copy. A seated observer gets
    /// a copy with every container hidden from them redeterminized.
    ///
    /// Takes `&mut self` because the copy's streams are forks of ours and
    /// resampling consumes our redeterminization stream. The gameplay
    /// sequence of `self` is never advanced.
    #[must_use]
    pub fn copy_for(&mut self, observer: Observer) -> Self {
        let mut copy = Self {
            player_count: self.player_count,
            registry: self.registry.clone(),
            turn_owner: self.turn_owner,
            reactive_players: self.reactive_players.clone(),
            turn: self.turn,
            round: self.round,
            phase: self.phase,
            status: self.status,
            results: self.results.clone(),
            rng: self.rng.fork(),
            redeterminize_rng: self.redeterminize_rng.fork(),
        };

        if let Observer::Player(player) = observer {
            redeterminize(&mut copy.registry, player, &mut self.redeterminize_rng);
        }

        copy
    }
}

impl PartialEq for GameState {
    /// Structural equality; RNG positions are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.player_count == other.player_count
            && self.registry == other.registry
            && self.turn_owner == other.turn_owner
            && self.reactive_players == other.reactive_players
            && self.turn == other.turn
            && self.round == other.round
            && self.phase == other.phase
            && self.status == other.status
            && self.results == other.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ContainerConfig;

    fn state_with_hands(seed: u64) -> GameState {
        let mut state = GameState::new(2, seed);
        let draw = state
            .registry
            .add_container(ContainerConfig::new("draw").hidden().ordered());
        let hand = state.registry.add_container(
            ContainerConfig::new("hand").with_owner(PlayerId::new(1)).owner_only(),
        );
        for value in 0..10 {
            state.registry.add_item("card", &[("value", value)], draw);
        }
        for _ in 0..3 {
            state.registry.draw(draw, hand);
        }
        state
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new(3, 1);

        assert_eq!(state.player_count(), 3);
        assert_eq!(state.current_player(), PlayerId::new(0));
        assert_eq!(state.turn, 0);
        assert_eq!(state.round, 0);
        assert!(!state.is_terminal());
        assert_eq!(state.result(PlayerId::new(2)), PlayerResult::Undecided);
    }

    #[test]
    fn test_end_player_turn_rotates_and_counts_rounds() {
        let mut state = GameState::new(3, 1);

        state.end_player_turn();
        assert_eq!(state.current_player(), PlayerId::new(1));
        state.end_player_turn();
        state.end_player_turn();

        assert_eq!(state.current_player(), PlayerId::new(0));
        assert_eq!(state.turn, 3);
        assert_eq!(state.round, 1);
    }

    #[test]
    fn test_reaction_queue_is_fifo() {
        let mut state = GameState::new(3, 1);
        state.add_reactive_player(PlayerId::new(2));
        state.add_reactive_player(PlayerId::new(1));

        assert!(state.has_reactions());
        assert_eq!(state.current_player(), PlayerId::new(2));
        assert_eq!(state.resolve_reaction(), Some(PlayerId::new(2)));
        assert_eq!(state.current_player(), PlayerId::new(1));
        assert_eq!(state.resolve_reaction(), Some(PlayerId::new(1)));
        assert_eq!(state.current_player(), state.turn_owner());
    }

    #[test]
    fn test_end_game() {
        let mut state = GameState::new(2, 1);
        state.add_reactive_player(PlayerId::new(1));
        state.set_result(PlayerId::new(0), PlayerResult::Win);
        state.set_result(PlayerId::new(1), PlayerResult::Lose);
        state.end_game();

        assert!(state.is_terminal());
        assert!(!state.has_reactions());
        assert_eq!(state.results()[PlayerId::new(0)], PlayerResult::Win);
    }

    #[test]
    fn test_omniscient_copy_is_faithful() {
        let mut state = state_with_hands(4);
        let copy = state.copy_for(Observer::Omniscient);

        assert_eq!(copy, state);
    }

    #[test]
    fn test_copy_does_not_advance_gameplay_stream() {
        let mut state = state_with_hands(4);
        let mut reference = GameRng::new(4);

        let _ = state.copy_for(Observer::Player(PlayerId::new(0)));
        let _ = state.copy_for(Observer::Omniscient);

        for _ in 0..5 {
            assert_eq!(
                state.rng.gen_range_usize(0..1000),
                reference.gen_range_usize(0..1000)
            );
        }
    }

    #[test]
    fn test_player_copy_resamples_hidden_only() {
        let mut state = state_with_hands(4);
        let hand = crate::core::ComponentId(1);

        let own_view = state.copy_for(Observer::Player(PlayerId::new(1)));
        assert_eq!(own_view.registry.contents(hand), state.registry.contents(hand));

        let other_view = state.copy_for(Observer::Player(PlayerId::new(0)));
        assert_eq!(other_view.registry.size(hand), 3);
    }

    #[test]
    fn test_copy_mutation_is_isolated() {
        let mut state = state_with_hands(4);
        let before = state.copy_for(Observer::Omniscient);

        let mut copy = state.copy_for(Observer::Omniscient);
        copy.end_player_turn();
        copy.registry.draw(crate::core::ComponentId(0), crate::core::ComponentId(1));

        assert_eq!(state, before);
        assert_ne!(copy, state);
    }
}
