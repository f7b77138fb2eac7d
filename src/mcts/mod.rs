//! Monte Carlo Tree Search with hidden information and tree reuse.
//!
//! ## Overview
//!
//! - **Redeterminization**: every iteration runs on a copy of the root
//!   snapshot in which everything the searching player cannot see has been
//!   reshuffled among the places it could be
//! - **Opponent Modeling**: `Paranoid`, `MaxN`, or `SelfOnly` (opponents are
//!   simulated, never tree nodes)
//! - **Tree Reuse**: real moves reported through `observe` are followed down
//!   the previous tree and the reached subtree becomes the new root
//! - **N-Player Support**: rewards are per-player vectors
//! - **Configurable Policies**: selection, simulation, opponent
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tabletop_mcts::core::{GameState, PlayerId};
//! use tabletop_mcts::mcts::{MCTSConfig, MCTSSearch};
//!
//! let config = MCTSConfig::default().with_iterations(1000);
//! let mut search = MCTSSearch::new(model, PlayerId::new(0), config);
//!
//! let action = search.search(&mut state)?;
//! for (action, prob) in search.action_probabilities() {
//!     println!("{:?}: {:.2}%", action, prob * 100.0);
//! }
//!
//! // After every real move, by anyone:
//! search.observe(actor, &action);
//! ```
//!
//! ## Custom Policies
//!
//! ```rust,ignore
//! use tabletop_mcts::mcts::{MCTSSearch, GreedySimulation};
//!
//! let search = MCTSSearch::new(model, player, config)
//!     .with_simulation(GreedySimulation);
//! ```

pub mod config;
pub mod error;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use config::{Budget, MCTSConfig, OpponentModel, RolloutKind};
pub use error::{Result, SearchError};
pub use node::{Edge, MCTSNode, NodeId};
pub use policy::{
    GreedySimulation, OpponentPolicy, RandomSimulation, SelectionPolicy, SimulationPolicy,
    UniformOpponent, UCB1,
};
pub use search::MCTSSearch;
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
