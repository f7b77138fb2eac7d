//! Arena-based MCTS tree.
//!
//! Uses a flat `Vec<MCTSNode>` with index-based references for efficiency
//! and cache-friendliness. The root additionally owns the game-state
//! snapshot it was built from.
//!
//! Re-rooting copies the surviving subtree into a fresh arena so the
//! discarded siblings are freed and the new root is always `NodeId(0)`.

use std::collections::VecDeque;

use log::trace;

use super::node::{MCTSNode, NodeId};
use crate::core::{GameState, PlayerId};

/// Arena-based MCTS tree.
#[derive(Debug)]
pub struct MCTSTree<A> {
    /// All nodes in the tree.
    nodes: Vec<MCTSNode<A>>,

    /// The root node ID (always 0).
    root: NodeId,

    /// Number of players in the game.
    player_count: usize,

    /// Snapshot the root was built from.
    root_state: Option<GameState>,
}

impl<A: Clone + PartialEq> MCTSTree<A> {
    /// Create a new tree with a root node.
    pub fn new(root_player: PlayerId, player_count: usize) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(1024),
            root: NodeId::new(0),
            player_count,
            root_state: None,
        };
        tree.nodes.push(MCTSNode::root(root_player));
        tree
    }

    /// Get the root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode<A> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode<A> {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node, returning its ID.
    pub fn alloc(&mut self, node: MCTSNode<A>) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Player count for this tree.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Get the root node.
    #[must_use]
    pub fn root_node(&self) -> &MCTSNode<A> {
        self.get(self.root)
    }

    /// Snapshot the root was built from.
    #[must_use]
    pub fn root_state(&self) -> Option<&GameState> {
        self.root_state.as_ref()
    }

    /// Replace the root snapshot.
    pub fn set_root_state(&mut self, state: GameState) {
        self.root_state = Some(state);
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MCTSNode<A>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    /// Follow `(action, next player)` steps from the root.
    ///
    /// Returns `None` as soon as an action was never tried or the child for
    /// that next player was never created.
    #[must_use]
    pub fn descend(&self, steps: &[(A, PlayerId)]) -> Option<NodeId> {
        let mut current = self.root;
        for (action, next_player) in steps {
            let node = self.get(current);
            let edge = &node.edges[node.edge_index(action)?];
            current = edge.child(*next_player)?;
        }
        Some(current)
    }

    /// Make `new_root` the root, keeping only its subtree and statistics.
    ///
    /// Node IDs are renumbered; the new root is `NodeId(0)`.
    pub fn reroot(&mut self, new_root: NodeId) {
        if new_root == self.root {
            return;
        }

        let old_nodes = std::mem::take(&mut self.nodes);
        let base_depth = old_nodes[new_root.0 as usize].depth;
        let mut remap = vec![NodeId::NONE; old_nodes.len()];
        let mut order = Vec::new();
        let mut queue = VecDeque::from([new_root]);

        while let Some(old) = queue.pop_front() {
            remap[old.0 as usize] = NodeId::new(order.len() as u32);
            order.push(old);
            for edge in &old_nodes[old.0 as usize].edges {
                queue.extend(edge.children.iter().map(|(_, child)| *child));
            }
        }

        let mut nodes = Vec::with_capacity(order.len().max(1024));
        for &old in &order {
            let mut node = old_nodes[old.0 as usize].clone();
            node.depth -= base_depth;
            if old == new_root {
                node.parent = NodeId::NONE;
                node.parent_edge_idx = 0;
            } else {
                node.parent = remap[node.parent.0 as usize];
            }
            for edge in node.edges.iter_mut() {
                for (_, child) in edge.children.iter_mut() {
                    *child = remap[child.0 as usize];
                }
            }
            nodes.push(node);
        }

        trace!(
            "reroot: kept {} of {} nodes, root visits {}",
            nodes.len(),
            old_nodes.len(),
            nodes[0].visits
        );

        self.nodes = nodes;
        self.root = NodeId::new(0);
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let max_depth = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        let terminal_count = self.nodes.iter().filter(|n| n.is_terminal).count();
        let total_edges: usize = self.nodes.iter().map(|n| n.edges.len()).sum();

        TreeStats {
            node_count: self.nodes.len(),
            max_depth,
            terminal_count,
            total_edges,
        }
    }
}

/// Statistics about the MCTS tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Maximum depth reached.
    pub max_depth: u16,

    /// Number of terminal nodes.
    pub terminal_count: usize,

    /// Total number of edges (tried actions).
    pub total_edges: usize,
}

impl TreeStats {
    /// Get the branching factor (average edges per node).
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        if self.node_count == 0 {
            0.0
        } else {
            self.total_edges as f64 / self.node_count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcts::node::Edge;

    fn p(i: u8) -> PlayerId {
        PlayerId::new(i)
    }

    /// root(p0) -a-> n1(p1) -c-> n3(p0)
    ///          -b-> n2(p1)
    fn sample_tree() -> MCTSTree<char> {
        let mut tree = MCTSTree::new(p(0), 2);
        let root = tree.root();

        let n1 = tree.alloc(MCTSNode::new(root, 0, p(1), 1));
        let n2 = tree.alloc(MCTSNode::new(root, 1, p(1), 1));
        let n3 = tree.alloc(MCTSNode::new(n1, 0, p(0), 2));

        let mut a = Edge::new('a', 2);
        a.visits = 7;
        a.children.push((p(1), n1));
        let mut b = Edge::new('b', 2);
        b.visits = 3;
        b.children.push((p(1), n2));
        tree.get_mut(root).edges.push(a);
        tree.get_mut(root).edges.push(b);
        tree.get_mut(root).visits = 10;

        let mut c = Edge::new('c', 2);
        c.visits = 6;
        c.children.push((p(0), n3));
        tree.get_mut(n1).edges.push(c);
        tree.get_mut(n1).visits = 7;
        tree.get_mut(n1).stops = 1;
        tree.get_mut(n3).visits = 6;
        tree.get_mut(n3).stops = 6;
        tree.get_mut(n2).visits = 3;
        tree.get_mut(n2).stops = 3;

        tree
    }

    #[test]
    fn test_tree_new() {
        let tree: MCTSTree<char> = MCTSTree::new(p(0), 2);

        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.player_count(), 2);
        assert_eq!(tree.root(), NodeId::new(0));
        assert!(tree.root_state().is_none());
    }

    #[test]
    fn test_tree_alloc() {
        let mut tree: MCTSTree<char> = MCTSTree::new(p(0), 2);
        let child = tree.alloc(MCTSNode::new(NodeId::new(0), 0, p(1), 1));

        assert_eq!(child, NodeId::new(1));
        assert_eq!(tree.get(child).to_move, p(1));
        assert_eq!(tree.len(), 2);
        assert!(tree.root_state().is_none());

        tree.set_root_state(GameState::new(2, 1));
        assert_eq!(tree.root_state().map(|s| s.player_count()), Some(2));
    }

    #[test]
    fn test_descend() {
        let tree = sample_tree();

        assert_eq!(tree.descend(&[]), Some(NodeId::new(0)));
        assert_eq!(tree.descend(&[('a', p(1))]), Some(NodeId::new(1)));
        assert_eq!(tree.descend(&[('a', p(1)), ('c', p(0))]), Some(NodeId::new(3)));
        // Wrong next player
        assert_eq!(tree.descend(&[('a', p(0))]), None);
        // Untried action
        assert_eq!(tree.descend(&[('a', p(1)), ('d', p(0))]), None);
    }

    #[test]
    fn test_reroot_keeps_subtree_statistics() {
        let mut tree = sample_tree();
        let target = tree.descend(&[('a', p(1))]).unwrap();

        tree.reroot(target);

        assert_eq!(tree.len(), 2);
        let root = tree.root_node();
        assert!(root.parent.is_none());
        assert_eq!(root.depth, 0);
        assert_eq!(root.visits, 7);
        assert_eq!(root.to_move, p(1));

        let child = tree.descend(&[('c', p(0))]).unwrap();
        assert_eq!(child, NodeId::new(1));
        assert_eq!(tree.get(child).parent, NodeId::new(0));
        assert_eq!(tree.get(child).depth, 1);
        assert_eq!(tree.get(child).visits, 6);
    }

    #[test]
    fn test_reroot_to_root_is_noop() {
        let mut tree = sample_tree();
        tree.reroot(tree.root());
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = sample_tree();
        tree.get_mut(NodeId::new(2)).is_terminal = true;

        let stats = tree.stats();

        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.terminal_count, 1);
        assert_eq!(stats.total_edges, 3);
        assert_eq!(stats.branching_factor(), 0.75);
    }

    #[test]
    fn test_sample_tree_visit_accounting() {
        let tree = sample_tree();
        for (_, node) in tree.iter() {
            assert_eq!(node.visits, node.edge_visits() + node.stops);
        }
    }
}
