//! MCTS policies for selection, simulation, and opponent modeling.
//!
//! Policies are trait-based to allow customization:
//! - `SelectionPolicy`: How to choose which tried action to follow (UCB1)
//! - `SimulationPolicy`: How to run rollouts (random, greedy)
//! - `OpponentPolicy`: How opponents act when their turns are not tree nodes
//!
//! The helpers at the bottom turn game outcomes into reward vectors and
//! apply the configured opponent model to them.

use crate::core::{GameRng, GameState, Observer, PlayerId, PlayerMap};
use crate::rules::ForwardModel;

use super::config::{MCTSConfig, OpponentModel};
use super::node::MCTSNode;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for selecting which edge to follow from a node.
pub trait SelectionPolicy<A>: Send + Sync {
    /// Select one of `candidates` (edge indices, all legal in the current
    /// working state) maximizing the value for `player`.
    fn select(
        &self,
        node: &MCTSNode<A>,
        candidates: &[usize],
        player: PlayerId,
        config: &MCTSConfig,
    ) -> usize;
}

/// UCB1 (Upper Confidence Bound) selection policy.
///
/// Balances exploitation (high reward) with exploration (low visits).
/// Formula: Q(a) + c * sqrt(ln(N) / n(a))
///
/// Ties go to the fewer-visited edge, then to the earlier candidate.
#[derive(Clone, Debug, Default)]
pub struct UCB1;

impl<A> SelectionPolicy<A> for UCB1 {
    fn select(
        &self,
        node: &MCTSNode<A>,
        candidates: &[usize],
        player: PlayerId,
        config: &MCTSConfig,
    ) -> usize {
        let ln_parent = (node.visits.max(1) as f64).ln();
        let mut best: Option<(usize, f64, u32)> = None;

        for &i in candidates {
            let edge = &node.edges[i];
            let score = if edge.visits == 0 {
                f64::INFINITY
            } else {
                edge.mean_reward(player)
                    + config.exploration_constant * (ln_parent / edge.visits as f64).sqrt()
            };

            let better = match best {
                None => true,
                Some((_, best_score, best_visits)) => {
                    score > best_score || (score == best_score && edge.visits < best_visits)
                }
            };
            if better {
                best = Some((i, score, edge.visits));
            }
        }

        best.map_or(0, |(i, _, _)| i)
    }
}

// =============================================================================
// Simulation Policy
// =============================================================================

/// Policy for running simulations (rollouts) from a leaf.
pub trait SimulationPolicy<M: ForwardModel>: Send + Sync {
    /// Pick the next rollout action from the legal list (non-empty).
    fn choose(
        &self,
        model: &M,
        state: &mut GameState,
        actions: &[M::Action],
        rng: &mut GameRng,
    ) -> usize;

    /// Play from `state` until the game ends or `max_depth` actions were
    /// applied, returning per-player rewards.
    ///
    /// Terminal states score their results; depth-limited states fall back
    /// to the model's heuristic.
    fn simulate(
        &self,
        model: &M,
        state: &mut GameState,
        rng: &mut GameRng,
        max_depth: u32,
    ) -> PlayerMap<f64> {
        let mut depth = 0;

        loop {
            if state.is_terminal() {
                return terminal_rewards(state);
            }

            if depth >= max_depth {
                return heuristic_rewards(model, state);
            }

            let actions = model.compute_available_actions(state);
            if actions.is_empty() {
                return heuristic_rewards(model, state);
            }

            let idx = self.choose(model, state, &actions, rng);
            model.next(state, &actions[idx]);

            depth += 1;
        }
    }
}

/// Random simulation policy.
///
/// Plays uniformly random legal actions.
#[derive(Clone, Debug, Default)]
pub struct RandomSimulation;

impl<M: ForwardModel> SimulationPolicy<M> for RandomSimulation {
    fn choose(
        &self,
        _model: &M,
        _state: &mut GameState,
        actions: &[M::Action],
        rng: &mut GameRng,
    ) -> usize {
        rng.gen_range_usize(0..actions.len())
    }
}

/// Greedy simulation policy.
///
/// Tries every legal action on a copy and keeps the one with the best
/// heuristic score for the acting player; ties go to the earlier action.
#[derive(Clone, Debug, Default)]
pub struct GreedySimulation;

impl<M: ForwardModel> SimulationPolicy<M> for GreedySimulation {
    fn choose(
        &self,
        model: &M,
        state: &mut GameState,
        actions: &[M::Action],
        _rng: &mut GameRng,
    ) -> usize {
        let actor = state.current_player();
        let mut best = (0, f64::NEG_INFINITY);

        for (i, action) in actions.iter().enumerate() {
            let mut lookahead = state.copy_for(Observer::Omniscient);
            model.next(&mut lookahead, action);
            let score = model.heuristic_score(&lookahead, actor);
            if score > best.1 {
                best = (i, score);
            }
        }

        best.0
    }
}

// =============================================================================
// Opponent Policy
// =============================================================================

/// Policy for choosing opponent actions whose turns are not tree nodes.
pub trait OpponentPolicy<M: ForwardModel>: Send + Sync {
    /// Choose an action for the current player of `state`.
    ///
    /// Returns `None` if no legal actions exist.
    fn choose_action(&self, model: &M, state: &GameState, rng: &mut GameRng) -> Option<M::Action>;
}

/// Uniform random opponent policy.
#[derive(Clone, Debug, Default)]
pub struct UniformOpponent;

impl<M: ForwardModel> OpponentPolicy<M> for UniformOpponent {
    fn choose_action(&self, model: &M, state: &GameState, rng: &mut GameRng) -> Option<M::Action> {
        let actions = model.compute_available_actions(state);
        let idx = rng.choose_index(actions.len())?;
        Some(actions[idx].clone())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Per-player rewards from the state's result vector.
pub fn terminal_rewards(state: &GameState) -> PlayerMap<f64> {
    PlayerMap::new(state.player_count(), |player| state.result(player).value())
}

/// Per-player heuristic rewards for a non-terminal state.
pub fn heuristic_rewards<M: ForwardModel>(model: &M, state: &GameState) -> PlayerMap<f64> {
    PlayerMap::new(state.player_count(), |player| {
        model.heuristic_score(state, player).clamp(0.0, 1.0)
    })
}

/// Apply the opponent model to a raw reward vector.
///
/// Under `Paranoid` every opponent is credited with the complement of the
/// root player's reward, so their selection minimizes the root's value.
pub fn model_rewards(
    opponent_model: OpponentModel,
    root_player: PlayerId,
    rewards: PlayerMap<f64>,
) -> PlayerMap<f64> {
    match opponent_model {
        OpponentModel::Paranoid => {
            let root = rewards[root_player];
            PlayerMap::new(rewards.player_count(), |player| {
                if player == root_player {
                    root
                } else {
                    1.0 - root
                }
            })
        }
        OpponentModel::MaxN | OpponentModel::SelfOnly => rewards,
    }
}
