//! # tabletop-mcts
//!
//! A general-purpose engine for turn-based, multi-player, partial-information
//! tabletop games, with a Monte Carlo Tree Search that works unchanged
//! across rule sets.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: No hardcoded zones, card types or phases. Games
//!    describe their containers with `ContainerConfig` and their rules with
//!    a `ForwardModel`.
//!
//! 2. **N-Player First**: Rewards and results are per-player vectors.
//!    Nothing assumes two players.
//!
//! 3. **Hidden Information by Copy**: `GameState::copy_for` hands a searcher
//!    a state in which everything it cannot see has been resampled, using a
//!    random stream gameplay never touches.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im` so every search
//!   iteration can afford its own copy.
//!
//! - **Tree Reuse**: the search keeps its tree between decisions and follows
//!   the real moves down it.
//!
//! ## Modules
//!
//! - `core`: Component IDs, players, state, actions, RNG, configuration
//! - `components`: Component registry and redeterminization
//! - `rules`: `ForwardModel` trait and results
//! - `mcts`: Monte Carlo Tree Search
//! - `play`: Game loop and agents
//! - `games`: TicTacToe and Bamboo
//!
//! ## Example
//!
//! ```
//! use tabletop_mcts::core::PlayerId;
//! use tabletop_mcts::games::tictactoe::TicTacToe;
//! use tabletop_mcts::mcts::{MCTSConfig, MCTSSearch};
//!
//! let game = TicTacToe::new();
//! let mut state = game.new_game(42);
//!
//! let config = MCTSConfig::default().with_iterations(200);
//! let mut search = MCTSSearch::new(game, PlayerId::new(0), config);
//!
//! let action = search.search(&mut state)?;
//! assert_eq!(search.stats().iterations, 200);
//! println!("{}", tabletop_mcts::core::Action::describe(&action, &state));
//! # Ok::<(), tabletop_mcts::mcts::SearchError>(())
//! ```

pub mod core;
pub mod components;
pub mod rules;
pub mod mcts;
pub mod play;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, Component, ComponentId, ComponentKind, Container, ContainerConfig,
    GameRng, GameState, Observer, PhaseId, PlayerId, PlayerMap, PoolId, Visibility,
};

pub use crate::components::{redeterminize, ComponentRegistry};

pub use crate::rules::{ForwardModel, GameStatus, PlayerResult};

pub use crate::mcts::{
    Budget, MCTSConfig, MCTSSearch, MCTSTree, OpponentModel, RolloutKind, SearchError,
    SearchStats, TreeStats,
};

pub use crate::play::{Agent, GameOutcome, GameRunner, MctsAgent, RandomAgent};
