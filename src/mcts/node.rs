//! MCTS node and edge structures.
//!
//! Uses arena-based allocation with index references (NodeId) for efficiency
//! and serializability.
//!
//! Edges are created lazily, one per tried action. Under redeterminization
//! the legal set at a node can differ between iterations, so a node does
//! not hold a fixed action list. An edge can lead to more than one child:
//! children are keyed by the player acting at the child, because the same
//! action label may hand control to different players.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{PlayerId, PlayerMap};

/// Index into the MCTSTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// Edge representing a tried action from a node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge<A> {
    /// The action this edge represents.
    pub action: A,

    /// Visit count for this action.
    pub visits: u32,

    /// Total reward accumulated for this action (per player).
    pub total_reward: PlayerMap<f64>,

    /// Children keyed by the player acting at the child.
    pub children: SmallVec<[(PlayerId, NodeId); 1]>,

    /// Iterations that ended on this edge without reaching a child.
    ///
    /// `visits` equals the children's visits plus `stops`.
    pub stops: u32,
}

impl<A> Edge<A> {
    /// Create a new edge with the given action.
    pub fn new(action: A, player_count: usize) -> Self {
        Self {
            action,
            visits: 0,
            total_reward: PlayerMap::with_value(player_count, 0.0),
            children: SmallVec::new(),
            stops: 0,
        }
    }

    /// Get the mean reward for a player.
    #[must_use]
    pub fn mean_reward(&self, player: PlayerId) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward[player] / self.visits as f64
        }
    }

    /// Child reached when `player` acts next.
    #[must_use]
    pub fn child(&self, player: PlayerId) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(key, _)| *key == player)
            .map(|(_, id)| *id)
    }
}

/// A node in the MCTS tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSNode<A> {
    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Index of the edge from parent that led to this node.
    pub parent_edge_idx: u16,

    /// Player to move at this node.
    pub to_move: PlayerId,

    /// Depth in tree (root = 0).
    pub depth: u16,

    /// Total visits to this node.
    pub visits: u32,

    /// Iterations whose tree walk ended at this node.
    pub stops: u32,

    /// Is this a terminal game state?
    pub is_terminal: bool,

    /// Tried actions.
    pub edges: SmallVec<[Edge<A>; 8]>,
}

impl<A: PartialEq> MCTSNode<A> {
    /// Create a new node.
    pub fn new(parent: NodeId, parent_edge_idx: u16, to_move: PlayerId, depth: u16) -> Self {
        Self {
            parent,
            parent_edge_idx,
            to_move,
            depth,
            visits: 0,
            stops: 0,
            is_terminal: false,
            edges: SmallVec::new(),
        }
    }

    /// Create a root node.
    pub fn root(to_move: PlayerId) -> Self {
        Self::new(NodeId::NONE, 0, to_move, 0)
    }

    /// Index of the edge for `action`, if it was tried here.
    #[must_use]
    pub fn edge_index(&self, action: &A) -> Option<usize> {
        self.edges.iter().position(|e| &e.action == action)
    }

    /// Get the edge with the most visits; ties go to the earliest edge.
    #[must_use]
    pub fn best_edge_by_visits(&self) -> Option<&Edge<A>> {
        self.edges
            .iter()
            .reduce(|best, e| if e.visits > best.visits { e } else { best })
    }

    /// Sum of edge visits.
    #[must_use]
    pub fn edge_visits(&self) -> u32 {
        self.edges.iter().map(|e| e.visits).sum()
    }
}
