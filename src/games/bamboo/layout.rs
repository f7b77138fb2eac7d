//! Fixed component IDs of a Bamboo table.
//!
//! Containers are created first and in a fixed order, so their IDs follow
//! from the seat index alone and actions can address them without access
//! to the forward model.

use crate::core::{ComponentId, PlayerId, PoolId};

/// Face-up container holding the rules card.
pub const TABLE: ComponentId = ComponentId(0);

/// Item carrying the hand sizes as properties.
pub const RULES: ComponentId = ComponentId(1);

pub const NUMBER_DRAW: ComponentId = ComponentId(2);
pub const OPERATOR_DRAW: ComponentId = ComponentId(3);
pub const OBJECTIVE_DRAW: ComponentId = ComponentId(4);

/// The face-up objective (zero or one card).
pub const OBJECTIVE: ComponentId = ComponentId(5);

const FIRST_SEAT: u32 = 6;
const PER_SEAT: u32 = 3;

/// Number cards in draw pile and hands are one hidden population.
pub const NUMBER_POOL: PoolId = PoolId(0);

/// Operator cards in draw pile and hands are one hidden population.
pub const OPERATOR_POOL: PoolId = PoolId(1);

/// Property keys.
pub const VALUE: &str = "value";
pub const OP: &str = "op";
pub const NUMBER_HAND_SIZE: &str = "number_hand_size";
pub const OPERATOR_HAND_SIZE: &str = "operator_hand_size";

#[must_use]
pub fn number_hand(player: PlayerId) -> ComponentId {
    ComponentId(FIRST_SEAT + PER_SEAT * player.0 as u32)
}

#[must_use]
pub fn operator_hand(player: PlayerId) -> ComponentId {
    ComponentId(FIRST_SEAT + PER_SEAT * player.0 as u32 + 1)
}

#[must_use]
pub fn won_pile(player: PlayerId) -> ComponentId {
    ComponentId(FIRST_SEAT + PER_SEAT * player.0 as u32 + 2)
}
