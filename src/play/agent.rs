//! Decision makers seated at a game.

use crate::core::{GameRng, GameState, PlayerId};
use crate::mcts::{MCTSSearch, Result, SearchError};
use crate::rules::ForwardModel;

/// A player seat: picks actions and hears about every committed move.
pub trait Agent<M: ForwardModel> {
    /// Choose one of `actions` (the non-empty legal list) for the current
    /// player of `state`.
    fn choose_action(
        &mut self,
        model: &M,
        state: &mut GameState,
        actions: &[M::Action],
    ) -> Result<M::Action>;

    /// A move was committed to the live game, by any player.
    fn observe(&mut self, actor: PlayerId, action: &M::Action) {
        let _ = (actor, action);
    }

    /// Short label for logs.
    fn name(&self) -> &str;
}

/// Plays uniformly at random.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    rng: GameRng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl<M: ForwardModel> Agent<M> for RandomAgent {
    fn choose_action(
        &mut self,
        _model: &M,
        _state: &mut GameState,
        actions: &[M::Action],
    ) -> Result<M::Action> {
        self.rng
            .choose(actions)
            .cloned()
            .ok_or(SearchError::NoLegalActions)
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Searches every decision with its own `MCTSSearch`, keeping the tree
/// between decisions.
pub struct MctsAgent<M: ForwardModel> {
    search: MCTSSearch<M>,
}

impl<M: ForwardModel> MctsAgent<M> {
    pub fn new(search: MCTSSearch<M>) -> Self {
        Self { search }
    }

    /// The underlying search driver.
    #[must_use]
    pub fn search(&self) -> &MCTSSearch<M> {
        &self.search
    }
}

impl<M: ForwardModel> Agent<M> for MctsAgent<M> {
    fn choose_action(
        &mut self,
        _model: &M,
        state: &mut GameState,
        _actions: &[M::Action],
    ) -> Result<M::Action> {
        self.search.search(state)
    }

    fn observe(&mut self, actor: PlayerId, action: &M::Action) {
        self.search.observe(actor, action);
    }

    fn name(&self) -> &str {
        "mcts"
    }
}
