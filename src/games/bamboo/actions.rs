//! Bamboo actions.
//!
//! ## Resolve
//!
//! Play number cards joined by operator cards. The expression is evaluated
//! strictly left to right and must equal the face-up objective. Effects, in
//! order:
//!
//! 1. The numbers and the objective go to the player's won pile
//! 2. A new objective is turned up (if any remain)
//! 3. The player's number hand is refilled to its target size, as far as
//!    the draw pile allows
//! 4. Every other player holding more numbers than the target size loses
//!    random excess cards to this player's won pile
//! 5. All operator cards are collected, shuffled and dealt out again
//!
//! ## Pass
//!
//! Draw a fixed mix of number and operator cards (possibly none).

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Action, ComponentId, GameState};

use super::layout::{
    number_hand, operator_hand, won_pile, NUMBER_DRAW, NUMBER_HAND_SIZE, OBJECTIVE, OBJECTIVE_DRAW,
    OPERATOR_DRAW, OPERATOR_HAND_SIZE, RULES,
};

/// Arithmetic operator printed on an operator card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    Plus,
    Minus,
}

impl Op {
    pub const ALL: [Op; 2] = [Op::Plus, Op::Minus];

    #[must_use]
    pub fn apply(self, lhs: i64, rhs: i64) -> i64 {
        match self {
            Op::Plus => lhs + rhs,
            Op::Minus => lhs - rhs,
        }
    }

    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Op::Plus => '+',
            Op::Minus => '-',
        }
    }

    /// Encoding stored in the card's `op` property.
    #[must_use]
    pub fn to_prop(self) -> i64 {
        match self {
            Op::Plus => 0,
            Op::Minus => 1,
        }
    }

    #[must_use]
    pub fn from_prop(value: i64) -> Option<Self> {
        match value {
            0 => Some(Op::Plus),
            1 => Some(Op::Minus),
            _ => None,
        }
    }
}

/// Left-to-right value of `values[0] ops[0] values[1] ops[1] ...`.
///
/// Panics unless there is exactly one more value than operators.
#[must_use]
pub fn evaluate(values: &[i64], ops: &[Op]) -> i64 {
    assert_eq!(values.len(), ops.len() + 1, "expression needs one more number than operators");
    ops.iter()
        .zip(&values[1..])
        .fold(values[0], |acc, (op, &rhs)| op.apply(acc, rhs))
}

/// Claim the objective with an expression built from hand cards.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolveAction {
    /// Number cards in expression order.
    pub numbers: SmallVec<[ComponentId; 4]>,

    /// Operator cards in expression order.
    pub operators: SmallVec<[ComponentId; 3]>,

    values: SmallVec<[i64; 4]>,
    ops: SmallVec<[Op; 3]>,
    objective: i64,
}

impl ResolveAction {
    /// Panics unless there is exactly one more number than operators.
    pub fn new(numbers: &[(ComponentId, i64)], operators: &[(ComponentId, Op)], objective: i64) -> Self {
        assert_eq!(
            numbers.len(),
            operators.len() + 1,
            "resolve needs one more number than operators"
        );

        Self {
            numbers: numbers.iter().map(|(id, _)| *id).collect(),
            operators: operators.iter().map(|(id, _)| *id).collect(),
            values: numbers.iter().map(|(_, v)| *v).collect(),
            ops: operators.iter().map(|(_, op)| *op).collect(),
            objective,
        }
    }

    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    #[must_use]
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    #[must_use]
    pub fn objective(&self) -> i64 {
        self.objective
    }

    fn execute(&self, state: &mut GameState) -> bool {
        let player = state.current_player();
        let hand = number_hand(player);
        let won = won_pile(player);

        if self
            .numbers
            .iter()
            .any(|&card| state.registry.location(card) != Some(hand))
        {
            return false;
        }

        let hand_size = state.registry.prop(RULES, NUMBER_HAND_SIZE).unwrap_or(0) as usize;
        let operator_hand_size = state.registry.prop(RULES, OPERATOR_HAND_SIZE).unwrap_or(0) as usize;

        for &card in &self.numbers {
            state.registry.move_item(card, won);
        }
        if let Some(objective) = state.registry.top(OBJECTIVE) {
            state.registry.move_item(objective, won);
        }
        state.registry.draw(OBJECTIVE_DRAW, OBJECTIVE);

        while state.registry.size(hand) < hand_size {
            if state.registry.draw(NUMBER_DRAW, hand).is_none() {
                break;
            }
        }

        let seats: Vec<_> = state.player_ids().collect();

        // Excess numbers of other players go to the resolver
        for &other in seats.iter().filter(|&&p| p != player) {
            let other_hand = number_hand(other);
            while state.registry.size(other_hand) > hand_size {
                let index = state.rng.gen_range_usize(0..state.registry.size(other_hand));
                state.registry.pick(other_hand, index, won);
            }
        }

        for &seat in &seats {
            state.registry.move_all(operator_hand(seat), OPERATOR_DRAW);
        }
        state.registry.shuffle(OPERATOR_DRAW, &mut state.rng);
        for &seat in &seats {
            for _ in 0..operator_hand_size {
                state.registry.draw(OPERATOR_DRAW, operator_hand(seat));
            }
        }

        true
    }
}

impl fmt::Display for ResolveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.values[0])?;
        for (op, value) in self.ops.iter().zip(&self.values[1..]) {
            write!(f, "{}{}", op.symbol(), value)?;
        }
        write!(f, "={}", self.objective)
    }
}

/// Skip resolving and draw cards instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PassAction {
    pub numbers: u8,
    pub operators: u8,
}

impl PassAction {
    /// Every pass variant, in the order they are offered.
    pub const ALL: [PassAction; 4] = [
        PassAction::new(1, 1),
        PassAction::new(2, 0),
        PassAction::new(0, 2),
        PassAction::new(0, 0),
    ];

    #[must_use]
    pub const fn new(numbers: u8, operators: u8) -> Self {
        Self { numbers, operators }
    }

    fn execute(&self, state: &mut GameState) -> bool {
        let player = state.current_player();
        for _ in 0..self.numbers {
            state.registry.draw(NUMBER_DRAW, number_hand(player));
        }
        for _ in 0..self.operators {
            state.registry.draw(OPERATOR_DRAW, operator_hand(player));
        }
        true
    }
}

impl fmt::Display for PassAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pass (+{}n +{}o)", self.numbers, self.operators)
    }
}

/// Any Bamboo move.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BambooAction {
    Resolve(ResolveAction),
    Pass(PassAction),
}

impl Action for BambooAction {
    fn execute(&self, state: &mut GameState) -> bool {
        match self {
            BambooAction::Resolve(resolve) => resolve.execute(state),
            BambooAction::Pass(pass) => pass.execute(state),
        }
    }

    fn describe(&self, _state: &GameState) -> String {
        self.to_string()
    }
}

impl fmt::Display for BambooAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BambooAction::Resolve(resolve) => fmt::Display::fmt(resolve, f),
            BambooAction::Pass(pass) => fmt::Display::fmt(pass, f),
        }
    }
}
