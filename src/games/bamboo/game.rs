//! Bamboo forward model.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::core::{ComponentId, ContainerConfig, GameState, PlayerId};
use crate::rules::{ForwardModel, PlayerResult};

use super::actions::{evaluate, BambooAction, Op, PassAction, ResolveAction};
use super::layout::{
    number_hand, operator_hand, won_pile, NUMBER_DRAW, NUMBER_HAND_SIZE, NUMBER_POOL, OBJECTIVE,
    OBJECTIVE_DRAW, OP, OPERATOR_DRAW, OPERATOR_HAND_SIZE, OPERATOR_POOL, RULES, TABLE, VALUE,
};
use super::params::BambooParams;

/// Bamboo rules.
#[derive(Clone, Debug, Default)]
pub struct Bamboo {
    params: BambooParams,
}

impl Bamboo {
    pub fn new(params: BambooParams) -> Self {
        Self { params }
    }

    /// Get the parameters.
    pub fn params(&self) -> &BambooParams {
        &self.params
    }

    /// A set-up game for `player_count` seats.
    pub fn new_game(&self, player_count: usize, seed: u64) -> GameState {
        assert!((2..=6).contains(&player_count), "Player count must be 2-6");
        let mut state = GameState::new(player_count, seed);
        self.setup(&mut state);
        state
    }

    /// Value of the face-up objective, if one is showing.
    #[must_use]
    pub fn objective_value(state: &GameState) -> Option<i64> {
        state
            .registry
            .top(OBJECTIVE)
            .and_then(|card| state.registry.prop(card, VALUE))
    }

    /// Cards in a player's won pile.
    #[must_use]
    pub fn won_cards(state: &GameState, player: PlayerId) -> usize {
        state.registry.size(won_pile(player))
    }

    /// Every distinct resolve available to `player`.
    ///
    /// Operator cards of the same kind are interchangeable, so each operator
    /// sequence uses the first matching cards of the hand. Number orderings
    /// with the same values as an earlier one are skipped.
    fn resolve_actions(&self, state: &GameState, player: PlayerId) -> Vec<ResolveAction> {
        let Some(objective) = Self::objective_value(state) else {
            return Vec::new();
        };

        let registry = &state.registry;
        let numbers: Vec<(ComponentId, i64)> = registry
            .contents(number_hand(player))
            .iter()
            .filter_map(|&card| registry.prop(card, VALUE).map(|value| (card, value)))
            .collect();
        let operators: Vec<(ComponentId, Op)> = registry
            .contents(operator_hand(player))
            .iter()
            .filter_map(|&card| {
                let op = registry.prop(card, OP).and_then(Op::from_prop)?;
                Some((card, op))
            })
            .collect();

        let max_operators = self
            .params
            .operator_hand_size
            .min(operators.len())
            .min(numbers.len().saturating_sub(1));

        let mut actions = Vec::new();
        for count in 1..=max_operators {
            let orders = permutations(numbers.len(), count + 1);

            for sequence in operator_sequences(&operators, count) {
                let kinds: SmallVec<[Op; 3]> = sequence.iter().map(|(_, op)| *op).collect();
                let mut seen: FxHashSet<SmallVec<[i64; 4]>> = FxHashSet::default();

                for order in &orders {
                    let chosen: SmallVec<[(ComponentId, i64); 4]> =
                        order.iter().map(|&i| numbers[i]).collect();
                    let values: SmallVec<[i64; 4]> = chosen.iter().map(|(_, v)| *v).collect();

                    if evaluate(&values, &kinds) == objective && seen.insert(values) {
                        actions.push(ResolveAction::new(&chosen, &sequence, objective));
                    }
                }
            }
        }

        actions
    }

    /// Largest won pile wins; tied leaders draw; everyone else loses.
    fn declare_results(state: &mut GameState) {
        let seats: Vec<PlayerId> = state.player_ids().collect();
        let scores: Vec<usize> = seats.iter().map(|&p| Self::won_cards(state, p)).collect();
        let best = scores.iter().copied().max().unwrap_or(0);
        let leaders = scores.iter().filter(|&&s| s == best).count();

        for (&player, &score) in seats.iter().zip(&scores) {
            let result = if score < best {
                PlayerResult::Lose
            } else if leaders > 1 {
                PlayerResult::Draw
            } else {
                PlayerResult::Win
            };
            state.set_result(player, result);
        }
    }
}

impl ForwardModel for Bamboo {
    type Action = BambooAction;

    fn setup(&self, state: &mut GameState) {
        assert!(state.registry.is_empty(), "Bamboo setup needs an empty registry");
        let p = &self.params;
        let seats: Vec<PlayerId> = state.player_ids().collect();
        let registry = &mut state.registry;

        // Containers first, in layout order
        let table = registry.add_container(ContainerConfig::new("table"));
        registry.add_item(
            "rules",
            &[
                (NUMBER_HAND_SIZE, p.number_hand_size as i64),
                (OPERATOR_HAND_SIZE, p.operator_hand_size as i64),
            ],
            table,
        );
        registry.add_container(
            ContainerConfig::new("number draw pile").hidden().ordered().with_pool(NUMBER_POOL),
        );
        registry.add_container(
            ContainerConfig::new("operator draw pile").hidden().ordered().with_pool(OPERATOR_POOL),
        );
        registry.add_container(ContainerConfig::new("objective draw pile").hidden().ordered());
        registry.add_container(ContainerConfig::new("objective"));

        for &seat in &seats {
            registry.add_container(
                ContainerConfig::new(format!("player {} number hand", seat.0))
                    .with_owner(seat)
                    .owner_only()
                    .with_pool(NUMBER_POOL),
            );
            registry.add_container(
                ContainerConfig::new(format!("player {} operator hand", seat.0))
                    .with_owner(seat)
                    .owner_only()
                    .with_pool(OPERATOR_POOL),
            );
            let won = registry
                .add_container(ContainerConfig::new(format!("player {} won", seat.0)).with_owner(seat));
            debug_assert_eq!(won, won_pile(seat));
        }
        debug_assert_eq!(table, TABLE);
        debug_assert_eq!(registry.prop(RULES, NUMBER_HAND_SIZE), Some(p.number_hand_size as i64));

        // Cards
        for value in p.min_number_value..=p.max_number_value {
            for _ in 0..p.number_copies {
                registry.add_item(value.to_string(), &[(VALUE, value)], NUMBER_DRAW);
            }
        }
        for _ in 0..=p.operator_copies {
            for op in Op::ALL {
                registry.add_item(op.symbol().to_string(), &[(OP, op.to_prop())], OPERATOR_DRAW);
            }
        }
        for value in p.min_objective_value..=p.max_objective_value {
            registry.add_item(value.to_string(), &[(VALUE, value)], OBJECTIVE_DRAW);
        }

        for pile in [NUMBER_DRAW, OPERATOR_DRAW, OBJECTIVE_DRAW] {
            state.registry.shuffle(pile, &mut state.rng);
        }

        state.registry.draw(OBJECTIVE_DRAW, OBJECTIVE);
        for &seat in &seats {
            for _ in 0..p.number_hand_size {
                state.registry.draw(NUMBER_DRAW, number_hand(seat));
            }
            for _ in 0..p.operator_hand_size {
                state.registry.draw(OPERATOR_DRAW, operator_hand(seat));
            }
        }
    }

    fn compute_available_actions(&self, state: &GameState) -> Vec<BambooAction> {
        if state.is_terminal() {
            return Vec::new();
        }

        let player = state.current_player();
        let mut actions: Vec<BambooAction> = self
            .resolve_actions(state, player)
            .into_iter()
            .map(BambooAction::Resolve)
            .collect();
        actions.extend(PassAction::ALL.iter().copied().map(BambooAction::Pass));
        actions
    }

    fn after_action(&self, state: &mut GameState, _action: &BambooAction) {
        if state.registry.size(NUMBER_DRAW) == 0 || state.registry.size(OBJECTIVE_DRAW) == 0 {
            Self::declare_results(state);
            state.end_game();
        }
    }

    fn game_score(&self, state: &GameState, player: PlayerId) -> f64 {
        Self::won_cards(state, player) as f64
    }

    fn heuristic_score(&self, state: &GameState, player: PlayerId) -> f64 {
        if state.is_terminal() {
            return state.result(player).value();
        }
        let total = self.params.number_card_count() + self.params.objective_card_count();
        Self::won_cards(state, player) as f64 / total.max(1) as f64
    }
}

/// Operator sequences of length `count` the hand can spell, each card used
/// at most once.
fn operator_sequences(
    operators: &[(ComponentId, Op)],
    count: usize,
) -> Vec<SmallVec<[(ComponentId, Op); 3]>> {
    let by_kind = |kind: Op| -> Vec<ComponentId> {
        operators
            .iter()
            .filter(|(_, op)| *op == kind)
            .map(|(id, _)| *id)
            .collect()
    };
    let plus = by_kind(Op::Plus);
    let minus = by_kind(Op::Minus);

    let mut sequences = Vec::new();
    'masks: for mask in 0..(1u32 << count) {
        let (mut next_plus, mut next_minus) = (0, 0);
        let mut sequence = SmallVec::new();

        for bit in 0..count {
            let (cards, next, kind) = if mask & (1 << bit) == 0 {
                (&plus, &mut next_plus, Op::Plus)
            } else {
                (&minus, &mut next_minus, Op::Minus)
            };
            let Some(&card) = cards.get(*next) else {
                continue 'masks;
            };
            *next += 1;
            sequence.push((card, kind));
        }

        sequences.push(sequence);
    }
    sequences
}

/// Ordered selections of `k` distinct indices from `0..n`, lexicographic.
fn permutations(n: usize, k: usize) -> Vec<SmallVec<[usize; 4]>> {
    fn extend(
        n: usize,
        k: usize,
        current: &mut SmallVec<[usize; 4]>,
        used: &mut [bool],
        out: &mut Vec<SmallVec<[usize; 4]>>,
    ) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in 0..n {
            if used[i] {
                continue;
            }
            used[i] = true;
            current.push(i);
            extend(n, k, current, used, out);
            current.pop();
            used[i] = false;
        }
    }

    let mut out = Vec::new();
    if k <= n {
        extend(n, k, &mut SmallVec::new(), &mut vec![false; n], &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(i: u8) -> PlayerId {
        PlayerId::new(i)
    }

    #[test]
    fn test_setup_deals_hands() {
        let game = Bamboo::default();
        let state = game.new_game(3, 42);

        for seat in PlayerId::all(3) {
            assert_eq!(state.registry.size(number_hand(seat)), 3);
            assert_eq!(state.registry.size(operator_hand(seat)), 3);
            assert_eq!(state.registry.size(won_pile(seat)), 0);
        }
        assert_eq!(state.registry.size(OBJECTIVE), 1);
        assert_eq!(state.registry.size(NUMBER_DRAW), 45 - 9);
        assert_eq!(state.registry.size(OPERATOR_DRAW), 22 - 9);
        assert_eq!(state.registry.size(OBJECTIVE_DRAW), 8);
        assert!(Bamboo::objective_value(&state).is_some());
    }

    #[test]
    fn test_setup_deterministic() {
        let game = Bamboo::default();
        assert_eq!(game.new_game(2, 7), game.new_game(2, 7));
        assert_ne!(game.new_game(2, 7), game.new_game(2, 8));
    }

    #[test]
    fn test_actions_evaluate_to_objective() {
        let game = Bamboo::default();

        for seed in 0..20 {
            let state = game.new_game(2, seed);
            let objective = Bamboo::objective_value(&state).unwrap();
            let actions = game.compute_available_actions(&state);

            assert_eq!(
                actions.iter().filter(|a| matches!(a, BambooAction::Pass(_))).count(),
                4
            );
            for action in &actions {
                if let BambooAction::Resolve(resolve) = action {
                    assert_eq!(evaluate(resolve.values(), resolve.ops()), objective);
                    assert_eq!(resolve.objective(), objective);
                }
            }
        }
    }

    #[test]
    fn test_resolve_values_are_distinct() {
        let game = Bamboo::default();
        let state = game.new_game(2, 3);

        let mut keys: Vec<(Vec<i64>, Vec<Op>)> = game
            .compute_available_actions(&state)
            .into_iter()
            .filter_map(|a| match a {
                BambooAction::Resolve(r) => Some((r.values().to_vec(), r.ops().to_vec())),
                BambooAction::Pass(_) => None,
            })
            .collect();
        let count = keys.len();
        keys.sort_by(|a, b| format!("{:?}", a).cmp(&format!("{:?}", b)));
        keys.dedup();

        assert_eq!(keys.len(), count);
    }

    #[test]
    fn test_permutations() {
        assert_eq!(permutations(3, 2).len(), 6);
        assert_eq!(permutations(4, 4).len(), 24);
        assert!(permutations(2, 3).is_empty());
        assert_eq!(permutations(3, 1)[2].as_slice(), &[2]);
    }

    #[test]
    fn test_operator_sequences_respect_hand() {
        let hand = [
            (ComponentId(50), Op::Plus),
            (ComponentId(51), Op::Minus),
            (ComponentId(52), Op::Plus),
        ];

        // Two pluses, one minus: "--" impossible
        let pairs = operator_sequences(&hand, 2);
        assert_eq!(pairs.len(), 3);
        for sequence in &pairs {
            let ids: Vec<_> = sequence.iter().map(|(id, _)| *id).collect();
            let mut unique = ids.clone();
            unique.dedup();
            assert_eq!(ids.len(), unique.len());
        }

        let all_plus = hand.iter().filter(|(_, op)| *op == Op::Plus).copied().collect::<Vec<_>>();
        assert_eq!(operator_sequences(&all_plus, 2).len(), 1);
    }

    #[test]
    fn test_pass_draws_cards() {
        let game = Bamboo::default();
        let mut state = game.new_game(2, 1);
        let before = state.registry.size(NUMBER_DRAW);

        game.next(&mut state, &BambooAction::Pass(PassAction::new(2, 0)));

        assert_eq!(state.registry.size(number_hand(p(0))), 5);
        assert_eq!(state.registry.size(NUMBER_DRAW), before - 2);
        assert_eq!(state.current_player(), p(1));
    }

    #[test]
    fn test_end_when_number_pile_empties() {
        let game = Bamboo::default();
        let mut state = game.new_game(2, 1);

        // Dump all but one number card into player 1's won pile
        while state.registry.size(NUMBER_DRAW) > 1 {
            state.registry.draw(NUMBER_DRAW, won_pile(p(1)));
        }

        game.next(&mut state, &BambooAction::Pass(PassAction::new(1, 0)));

        assert!(state.is_terminal());
        assert_eq!(state.result(p(1)), PlayerResult::Win);
        assert_eq!(state.result(p(0)), PlayerResult::Lose);
        assert!(game.compute_available_actions(&state).is_empty());
    }

    #[test]
    fn test_tied_leaders_draw() {
        let game = Bamboo::default();
        let mut state = game.new_game(3, 1);
        state.registry.draw(NUMBER_DRAW, won_pile(p(0)));
        state.registry.draw(NUMBER_DRAW, won_pile(p(2)));

        Bamboo::declare_results(&mut state);

        assert_eq!(state.result(p(0)), PlayerResult::Draw);
        assert_eq!(state.result(p(1)), PlayerResult::Lose);
        assert_eq!(state.result(p(2)), PlayerResult::Draw);
    }

    #[test]
    fn test_heuristic_score_tracks_won_pile() {
        let game = Bamboo::default();
        let mut state = game.new_game(2, 1);
        assert_eq!(game.heuristic_score(&state, p(0)), 0.0);

        for _ in 0..27 {
            state.registry.draw(NUMBER_DRAW, won_pile(p(0)));
        }

        assert_eq!(game.heuristic_score(&state, p(0)), 0.5);
        assert_eq!(game.game_score(&state, p(0)), 27.0);
    }
}
