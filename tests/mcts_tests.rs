//! MCTS integration tests using TicTacToe.

use tabletop_mcts::core::{GameState, Observer, PlayerId};
use tabletop_mcts::games::tictactoe::{cell, Place, TicTacToe};
use tabletop_mcts::mcts::{
    Budget, MCTSConfig, MCTSSearch, MCTSTree, OpponentModel, RolloutKind, SearchError,
};
use tabletop_mcts::rules::ForwardModel;

fn position(moves: &[usize]) -> (TicTacToe, GameState) {
    let game = TicTacToe::new();
    let mut state = game.new_game(42);
    for &i in moves {
        game.next(&mut state, &Place(cell(i)));
    }
    (game, state)
}

fn assert_visit_accounting(tree: &MCTSTree<Place>) {
    for (_, node) in tree.iter() {
        assert_eq!(node.visits, node.edge_visits() + node.stops);
    }
}

// =============================================================================
// Basic Search Tests
// =============================================================================

#[test]
fn test_mcts_returns_legal_action() {
    let (game, mut state) = position(&[]);
    let legal = game.compute_available_actions(&state);

    let mut search = MCTSSearch::new(game, PlayerId::new(0), MCTSConfig::default().with_iterations(100));
    let action = search.search(&mut state).unwrap();

    assert!(legal.contains(&action));
}

#[test]
fn test_mcts_takes_immediate_win() {
    // X: 0, 1   O: 3, 4   X to move
    let (game, mut state) = position(&[0, 3, 1, 4]);
    assert_eq!(TicTacToe::render(&state), "XX.\nOO.\n...\n");

    let mut search = MCTSSearch::new(game, PlayerId::new(0), MCTSConfig::default().with_iterations(1000));

    assert_eq!(search.search(&mut state).unwrap(), Place(cell(2)));
}

#[test]
fn test_mcts_blocks_immediate_loss() {
    // X: 0, 1   O: 4   O to move
    let (game, mut state) = position(&[0, 4, 1]);

    let mut search = MCTSSearch::new(game, PlayerId::new(1), MCTSConfig::default().with_iterations(2000));

    assert_eq!(search.search(&mut state).unwrap(), Place(cell(2)));
}

#[test]
fn test_mcts_paranoid_takes_immediate_win() {
    let (game, mut state) = position(&[0, 3, 1, 4]);

    let config = MCTSConfig::default()
        .with_iterations(1000)
        .with_opponent_model(OpponentModel::Paranoid);
    let mut search = MCTSSearch::new(game, PlayerId::new(0), config);

    assert_eq!(search.search(&mut state).unwrap(), Place(cell(2)));
}

#[test]
fn test_mcts_greedy_rollouts_take_immediate_win() {
    let (game, mut state) = position(&[0, 3, 1, 4]);

    let config = MCTSConfig::default()
        .with_iterations(500)
        .with_rollout(RolloutKind::Greedy);
    let mut search = MCTSSearch::new(game, PlayerId::new(0), config);

    assert_eq!(search.search(&mut state).unwrap(), Place(cell(2)));
}

// =============================================================================
// Determinism Tests
// =============================================================================

#[test]
fn test_mcts_deterministic_with_seed() {
    let (game1, mut state1) = position(&[4]);
    let (game2, mut state2) = position(&[4]);

    let config = MCTSConfig::default().with_iterations(300).with_seed(12345);
    let mut search1 = MCTSSearch::new(game1, PlayerId::new(1), config.clone());
    let mut search2 = MCTSSearch::new(game2, PlayerId::new(1), config);

    assert_eq!(search1.search(&mut state1), search2.search(&mut state2));
    assert_eq!(search1.action_visits(), search2.action_visits());
    assert_eq!(search1.tree().unwrap().len(), search2.tree().unwrap().len());
}

// =============================================================================
// Budget and Tree Invariants
// =============================================================================

#[test]
fn test_iteration_budget_is_exact() {
    let (game, mut state) = position(&[]);
    let mut search = MCTSSearch::new(game, PlayerId::new(0), MCTSConfig::default().with_iterations(250));

    search.search(&mut state).unwrap();

    let tree = search.tree().unwrap();
    assert_eq!(tree.root_node().visits, 250);
    assert_eq!(search.stats().iterations, 250);
    assert_eq!(search.stats().nodes_created as usize + 1, tree.len());
    assert_visit_accounting(tree);
}

#[test]
fn test_time_budget() {
    let (game, mut state) = position(&[]);
    let config = MCTSConfig::default().with_time_millis(20);
    let mut search = MCTSSearch::new(game, PlayerId::new(0), config);

    search.search(&mut state).unwrap();

    assert!(search.stats().iterations >= 1);
    assert!(search.stats().time_us >= 20_000);
    assert_visit_accounting(search.tree().unwrap());
}

#[test]
fn test_tree_nodes_alternate_players() {
    let (game, mut state) = position(&[]);
    let mut search = MCTSSearch::new(game, PlayerId::new(0), MCTSConfig::default().with_iterations(300));
    search.search(&mut state).unwrap();

    let tree = search.tree().unwrap();
    for (_, node) in tree.iter() {
        let expected = if node.depth % 2 == 0 { 0 } else { 1 };
        if !node.is_terminal {
            assert_eq!(node.to_move, PlayerId::new(expected));
        }
    }
}

#[test]
fn test_root_state_is_observer_copy() {
    let (game, mut state) = position(&[0, 4]);
    let mut search = MCTSSearch::new(game, PlayerId::new(0), MCTSConfig::default().with_iterations(50));
    search.search(&mut state).unwrap();

    // Nothing is hidden in TicTacToe, so the snapshot equals the real state
    let snapshot = search.tree().unwrap().root_state().unwrap();
    assert_eq!(snapshot, &state.copy_for(Observer::Omniscient));
}

#[test]
fn test_search_leaves_real_state_untouched() {
    let (game, mut state) = position(&[4, 0]);
    let before = state.copy_for(Observer::Omniscient);

    let mut search = MCTSSearch::new(game, PlayerId::new(0), MCTSConfig::default().with_iterations(400));
    search.search(&mut state).unwrap();

    assert_eq!(state, before);
}

// =============================================================================
// Configuration Errors
// =============================================================================

#[test]
fn test_config_from_json_drives_search() {
    let config = MCTSConfig::from_json(
        r#"{"budget": {"Iterations": 64}, "opponent_model": "Paranoid", "seed": 3}"#,
    )
    .unwrap();
    assert_eq!(config.budget, Budget::Iterations(64));

    let (game, mut state) = position(&[]);
    let mut search = MCTSSearch::new(game, PlayerId::new(0), config);
    search.search(&mut state).unwrap();

    assert_eq!(search.tree().unwrap().root_node().visits, 64);
}

#[test]
fn test_invalid_config_is_fatal_to_search() {
    let (game, mut state) = position(&[]);
    let config = MCTSConfig::default().with_exploration(f64::NAN);
    let mut search = MCTSSearch::new(game, PlayerId::new(0), config);

    assert!(matches!(search.search(&mut state), Err(SearchError::InvalidConfig(_))));
    assert_eq!(search.decisions(), 0);
}

#[test]
fn test_search_on_finished_game() {
    let (game, mut state) = position(&[0, 3, 1, 4, 2]);
    assert!(state.is_terminal());

    let mut search = MCTSSearch::new(game, PlayerId::new(1), MCTSConfig::default());
    assert_eq!(search.search(&mut state), Err(SearchError::TerminalState));
}
