//! Core MCTS search algorithm with cross-move tree reuse.
//!
//! Each iteration plays on a working copy of the root snapshot: selection
//! by UCB1 among tried actions that are legal in that copy, expansion of one
//! untried action, a rollout, and backpropagation along the walked path.
//!
//! Between searches the driver records every real move it is told about.
//! At the next search it follows those moves down the previous tree and, if
//! the node exists, keeps that subtree with its statistics as the new root.

use std::time::{Duration, Instant};

use log::{debug, trace};
use rustc_hash::FxHashMap;

use crate::core::{GameRng, GameState, Observer, PlayerId, PlayerMap};
use crate::rules::ForwardModel;

use super::config::{Budget, MCTSConfig, OpponentModel, RolloutKind};
use super::error::{Result, SearchError};
use super::node::{Edge, MCTSNode, NodeId};
use super::policy::{
    heuristic_rewards, model_rewards, terminal_rewards, GreedySimulation, OpponentPolicy,
    RandomSimulation, SelectionPolicy, SimulationPolicy, UniformOpponent, UCB1,
};
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// Main MCTS search context for one seated player.
///
/// Generic over the forward model. Owns the search tree across decisions
/// so statistics can be reused after real moves.
pub struct MCTSSearch<M: ForwardModel> {
    /// The game's forward model.
    model: M,

    /// The player this search decides for.
    player: PlayerId,

    /// Search configuration.
    config: MCTSConfig,

    /// Tree from the last search, if any.
    tree: Option<MCTSTree<M::Action>>,

    /// RNG for expansion choices, rollouts and opponent turns.
    rng: GameRng,

    /// Selection policy.
    selection: Box<dyn SelectionPolicy<M::Action>>,

    /// Simulation policy.
    simulation: Box<dyn SimulationPolicy<M>>,

    /// Opponent policy for `SelfOnly` searches.
    opponent: Box<dyn OpponentPolicy<M>>,

    /// Search statistics.
    stats: SearchStats,

    /// Real moves seen since the last search, in order.
    pending: Vec<(PlayerId, M::Action)>,

    /// Searches actually run (single-action decisions excluded).
    decisions: u32,
}

impl<M: ForwardModel> MCTSSearch<M> {
    /// Create a new MCTS search context for `player`.
    pub fn new(model: M, player: PlayerId, config: MCTSConfig) -> Self {
        let rng = GameRng::new(config.seed);
        let simulation: Box<dyn SimulationPolicy<M>> = match config.rollout_policy {
            RolloutKind::Random => Box::new(RandomSimulation),
            RolloutKind::Greedy => Box::new(GreedySimulation),
        };

        Self {
            model,
            player,
            config,
            tree: None,
            rng,
            selection: Box::new(UCB1),
            simulation,
            opponent: Box::new(UniformOpponent),
            stats: SearchStats::default(),
            pending: Vec::new(),
            decisions: 0,
        }
    }

    /// Set a custom selection policy.
    pub fn with_selection<S: SelectionPolicy<M::Action> + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set a custom simulation policy.
    pub fn with_simulation<S: SimulationPolicy<M> + 'static>(mut self, simulation: S) -> Self {
        self.simulation = Box::new(simulation);
        self
    }

    /// Set a custom opponent policy.
    pub fn with_opponent<O: OpponentPolicy<M> + 'static>(mut self, opponent: O) -> Self {
        self.opponent = Box::new(opponent);
        self
    }

    /// Choose an action for the current player of `state`.
    ///
    /// `state` must be at this searcher's decision. It is never mutated
    /// structurally: copying it only forks its gameplay stream and consumes
    /// its redeterminization stream.
    ///
    /// With exactly one legal action that action is returned without a
    /// search; the tree and reuse bookkeeping are left for `observe`.
    pub fn search(&mut self, state: &mut GameState) -> Result<M::Action> {
        self.config.validate()?;

        if state.is_terminal() {
            return Err(SearchError::TerminalState);
        }

        let mut legal = self.model.compute_available_actions(state);
        if legal.is_empty() {
            return Err(SearchError::NoLegalActions);
        }
        if legal.len() == 1 {
            return Ok(legal.swap_remove(0));
        }

        debug_assert_eq!(state.current_player(), self.player);

        let start = Instant::now();
        self.stats.reset();

        let mut tree = self.prepare_tree(state.player_count());
        let mut root_state = state.copy_for(Observer::Player(self.player));
        self.stats.inherited_visits = tree.root_node().visits;

        match self.config.budget {
            Budget::Iterations(iterations) => {
                for _ in 0..iterations {
                    self.run_iteration(&mut tree, &mut root_state);
                }
            }
            Budget::TimeMillis(millis) => {
                let limit = Duration::from_millis(millis);
                loop {
                    self.run_iteration(&mut tree, &mut root_state);
                    if start.elapsed() >= limit {
                        break;
                    }
                }
            }
        }

        tree.set_root_state(root_state);
        let choice = best_action(&tree, legal);

        self.stats.time_us = start.elapsed().as_micros() as u64;
        self.pending.clear();
        self.decisions += 1;

        debug!(
            "{} searched {} iterations: root visits {} (inherited {}, reused {}), {} nodes, chose {:?}",
            self.player,
            self.stats.iterations,
            tree.root_node().visits,
            self.stats.inherited_visits,
            self.stats.tree_reused,
            tree.len(),
            choice
        );

        self.tree = Some(tree);
        Ok(choice)
    }

    /// Record a real move for tree-reuse descent at the next search.
    ///
    /// Call for every committed action, including this player's own and
    /// those taken without a search.
    pub fn observe(&mut self, actor: PlayerId, action: &M::Action) {
        if self.config.reuse_tree {
            self.pending.push((actor, action.clone()));
        }
    }

    /// Forget the tree and any recorded moves (e.g. for a new game).
    pub fn reset(&mut self) {
        self.tree = None;
        self.pending.clear();
    }

    /// Previous tree re-rooted at the observed moves, or a fresh one.
    fn prepare_tree(&mut self, player_count: usize) -> MCTSTree<M::Action> {
        let previous = self.tree.take();

        if self.config.reuse_tree {
            if let Some(mut tree) = previous {
                if let Some(node) = self.reuse_target(&tree) {
                    tree.reroot(node);
                    self.stats.tree_reused = true;
                    return tree;
                }
            }
        }

        MCTSTree::new(self.player, player_count)
    }

    /// Node of `tree` reached by the recorded moves, if it was built.
    fn reuse_target(&self, tree: &MCTSTree<M::Action>) -> Option<NodeId> {
        let steps: Vec<(M::Action, PlayerId)> = match self.config.opponent_model {
            OpponentModel::SelfOnly => self
                .pending
                .iter()
                .filter(|(actor, _)| *actor == self.player)
                .map(|(_, action)| (action.clone(), self.player))
                .collect(),
            OpponentModel::Paranoid | OpponentModel::MaxN => {
                if let Some((first_actor, _)) = self.pending.first() {
                    if *first_actor != tree.root_node().to_move {
                        return None;
                    }
                }
                self.pending
                    .iter()
                    .enumerate()
                    .map(|(i, (_, action))| {
                        let next = self.pending.get(i + 1).map_or(self.player, |(actor, _)| *actor);
                        (action.clone(), next)
                    })
                    .collect()
            }
        };

        let node = tree.descend(&steps)?;
        let target = tree.get(node);
        if target.to_move != self.player || target.is_terminal {
            return None;
        }
        Some(node)
    }

    /// One iteration on a fresh working copy of the root snapshot.
    fn run_iteration(&mut self, tree: &mut MCTSTree<M::Action>, root_state: &mut GameState) {
        let observer = if self.config.redeterminize {
            Observer::Player(self.player)
        } else {
            Observer::Omniscient
        };
        let mut working = root_state.copy_for(observer);
        self.iteration(tree, &mut working);
        self.stats.iterations += 1;
    }

    /// Single MCTS iteration: select, expand, simulate, backpropagate.
    fn iteration(&mut self, tree: &mut MCTSTree<M::Action>, state: &mut GameState) {
        let player_count = tree.player_count();
        let mut path: Vec<(NodeId, usize)> = Vec::new();
        let mut current = tree.root();
        let mut settled = true;

        let raw_rewards = loop {
            if state.is_terminal() {
                tree.get_mut(current).is_terminal = true;
                break terminal_rewards(state);
            }

            let actions = self.model.compute_available_actions(state);
            if actions.is_empty() {
                break heuristic_rewards(&self.model, state);
            }

            // Split the legal list into untried actions and existing edges
            let (untried, candidates) = {
                let known: FxHashMap<&M::Action, usize> = tree
                    .get(current)
                    .edges
                    .iter()
                    .enumerate()
                    .map(|(i, edge)| (&edge.action, i))
                    .collect();
                let mut untried = Vec::new();
                let mut candidates = Vec::new();
                for (i, action) in actions.iter().enumerate() {
                    match known.get(action) {
                        Some(&edge_idx) => candidates.push(edge_idx),
                        None => untried.push(i),
                    }
                }
                (untried, candidates)
            };

            // === EXPANSION ===
            if let Some(pick) = self.rng.choose(&untried).copied() {
                let action = actions[pick].clone();
                let node = tree.get_mut(current);
                node.edges.push(Edge::new(action.clone(), player_count));
                let edge_idx = node.edges.len() - 1;

                path.push((current, edge_idx));
                if !self.advance(state, &action) {
                    settled = false;
                    break heuristic_rewards(&self.model, state);
                }
                current = self.add_child(tree, current, edge_idx, state);
                break self.rollout(state);
            }

            // === SELECTION ===
            let node = tree.get(current);
            let edge_idx = self
                .selection
                .select(node, &candidates, node.to_move, &self.config);
            let action = node.edges[edge_idx].action.clone();

            path.push((current, edge_idx));
            if !self.advance(state, &action) {
                settled = false;
                break heuristic_rewards(&self.model, state);
            }

            let key = state.current_player();
            match tree.get(current).edges[edge_idx].child(key) {
                Some(child) => current = child,
                None => {
                    current = self.add_child(tree, current, edge_idx, state);
                    break self.rollout(state);
                }
            }
        };

        let leaf = settled.then_some(current);
        let rewards = model_rewards(self.config.opponent_model, self.player, raw_rewards);
        backpropagate(tree, &path, leaf, &rewards);
    }

    /// Apply a tree action, then resolve opponents' turns when they are not
    /// tree nodes.
    ///
    /// Returns `false` when a self-only search could not bring the turn back
    /// to its player within `rollout_depth` opponent moves. Such a state must
    /// not become a node.
    fn advance(&mut self, state: &mut GameState, action: &M::Action) -> bool {
        self.model.next(state, action);

        if self.config.opponent_model != OpponentModel::SelfOnly {
            return true;
        }

        let mut resolved = 0;
        while !state.is_terminal()
            && state.current_player() != self.player
            && resolved < self.config.rollout_depth
        {
            let Some(reply) = self.opponent.choose_action(&self.model, state, &mut self.rng) else {
                break;
            };
            self.model.next(state, &reply);
            resolved += 1;
        }

        let settled = state.is_terminal() || state.current_player() == self.player;
        if !settled {
            trace!(
                "opponent chain unresolved after {} moves, {} still to act",
                resolved,
                state.current_player()
            );
        }
        settled
    }

    /// Create the child of `parent` through `edge_idx`, keyed by the player
    /// now acting in `state`.
    fn add_child(
        &mut self,
        tree: &mut MCTSTree<M::Action>,
        parent: NodeId,
        edge_idx: usize,
        state: &GameState,
    ) -> NodeId {
        let depth = tree.get(parent).depth + 1;
        let to_move = state.current_player();

        let mut node = MCTSNode::new(parent, edge_idx as u16, to_move, depth);
        node.is_terminal = state.is_terminal();
        let id = tree.alloc(node);
        tree.get_mut(parent).edges[edge_idx].children.push((to_move, id));

        self.stats.nodes_created += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);
        id
    }

    /// Run the rollout policy from `state`.
    fn rollout(&mut self, state: &mut GameState) -> PlayerMap<f64> {
        self.stats.rollouts += 1;
        self.simulation
            .simulate(&self.model, state, &mut self.rng, self.config.rollout_depth)
    }

    /// Get search statistics of the last search.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the search tree (after the first search).
    #[must_use]
    pub fn tree(&self) -> Option<&MCTSTree<M::Action>> {
        self.tree.as_ref()
    }

    /// Number of searches actually run.
    #[must_use]
    pub fn decisions(&self) -> u32 {
        self.decisions
    }

    /// Real moves recorded since the last search.
    #[must_use]
    pub fn pending_moves(&self) -> &[(PlayerId, M::Action)] {
        &self.pending
    }

    /// The player this search decides for.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Get action visit counts from the root.
    pub fn action_visits(&self) -> Vec<(M::Action, u32)> {
        self.tree.as_ref().map_or_else(Vec::new, |tree| {
            tree.root_node()
                .edges
                .iter()
                .map(|e| (e.action.clone(), e.visits))
                .collect()
        })
    }

    /// Get action probabilities from the root.
    ///
    /// Returns (action, probability) pairs where probabilities sum to ~1.0.
    pub fn action_probabilities(&self) -> Vec<(M::Action, f64)> {
        let visits = self.action_visits();
        let total: u32 = visits.iter().map(|(_, v)| v).sum();

        if total == 0 {
            let uniform = 1.0 / visits.len().max(1) as f64;
            return visits.into_iter().map(|(a, _)| (a, uniform)).collect();
        }

        visits
            .into_iter()
            .map(|(a, v)| (a, v as f64 / total as f64))
            .collect()
    }

    /// Get the forward model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get the configuration.
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }
}

/// Add one visit along `path` and one stop at `leaf`.
///
/// Without a leaf the stop is recorded on the last edge of the path.
fn backpropagate<A>(
    tree: &mut MCTSTree<A>,
    path: &[(NodeId, usize)],
    leaf: Option<NodeId>,
    rewards: &PlayerMap<f64>,
) where
    A: Clone + PartialEq,
{
    for &(node_id, edge_idx) in path {
        let node = tree.get_mut(node_id);
        node.visits += 1;

        let edge = &mut node.edges[edge_idx];
        edge.visits += 1;
        edge.total_reward.accumulate(rewards);
    }

    match (leaf, path.last()) {
        (Some(leaf), _) => {
            let leaf = tree.get_mut(leaf);
            leaf.visits += 1;
            leaf.stops += 1;
        }
        (None, Some(&(node_id, edge_idx))) => {
            tree.get_mut(node_id).edges[edge_idx].stops += 1;
        }
        (None, None) => {}
    }
}

/// Most visited root action among the actions legal in the real state.
/// Ties go to the earliest legal action.
fn best_action<A: Clone + PartialEq>(tree: &MCTSTree<A>, mut legal: Vec<A>) -> A {
    let root = tree.root_node();
    let mut best = (0, 0);

    for (i, action) in legal.iter().enumerate() {
        let visits = root.edge_index(action).map_or(0, |e| root.edges[e].visits);
        if visits > best.1 {
            best = (i, visits);
        }
    }

    legal.swap_remove(best.0)
}
