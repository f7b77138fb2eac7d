//! The action contract and action history records.
//!
//! An action is an immutable command value built by a forward model's
//! legal-action enumeration. It refers to components only through their
//! [`ComponentId`](super::ComponentId), so the same value applies to any
//! structurally equal copy of the state it was generated from. That is what
//! lets the search tree key children by action across independently
//! generated action lists.
//!
//! `execute` does not re-check legality: applying an action that is not in
//! the current legal list is the caller's mistake and its effect is
//! unspecified.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

use super::player::PlayerId;
use super::state::GameState;

/// One legal move.
pub trait Action: Clone + Eq + Hash + Debug {
    /// Apply this action's effects to `state`.
    ///
    /// Returns `true` when the effect was applied.
    fn execute(&self, state: &mut GameState) -> bool;

    /// Human-readable rendering against `state`.
    fn describe(&self, state: &GameState) -> String {
        let _ = state;
        format!("{:?}", self)
    }
}

/// A committed action with metadata for history tracking.
///
/// Used for replay/debugging and for the tree-reuse bookkeeping of agents
/// that did not search on a given decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord<A> {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: A,

    /// Turn number when the action was taken.
    pub turn: u32,

    /// Global sequence number (for ordering).
    pub sequence: u32,
}

impl<A> ActionRecord<A> {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, action: A, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
        }
    }
}
