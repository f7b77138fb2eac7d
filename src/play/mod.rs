//! Game loop and agents.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tabletop_mcts::play::{Agent, GameRunner, MctsAgent, RandomAgent};
//!
//! let mut runner = GameRunner::new(model.clone());
//! let mut state = runner.new_game(2, seed);
//! let mut agents: Vec<Box<dyn Agent<_>>> = vec![
//!     Box::new(MctsAgent::new(MCTSSearch::new(model, PlayerId::new(0), config))),
//!     Box::new(RandomAgent::new(seed)),
//! ];
//! let outcome = runner.play(&mut state, &mut agents)?;
//! ```

pub mod agent;
pub mod runner;

pub use agent::{Agent, MctsAgent, RandomAgent};
pub use runner::{GameOutcome, GameRunner};
