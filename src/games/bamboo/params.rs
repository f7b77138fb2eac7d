//! Bamboo game parameters.

use serde::{Deserialize, Serialize};

use crate::mcts::{Result, SearchError};

/// Tunable card counts and hand sizes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BambooParams {
    /// Number cards a hand is replenished to after resolving.
    pub number_hand_size: usize,

    /// Operator cards dealt to each player.
    pub operator_hand_size: usize,

    pub min_objective_value: i64,
    pub max_objective_value: i64,

    /// Copies of each number value.
    pub number_copies: usize,

    pub min_number_value: i64,
    pub max_number_value: i64,

    /// Copies of each operator are numbered `0..=operator_copies`.
    pub operator_copies: usize,
}

impl Default for BambooParams {
    fn default() -> Self {
        Self {
            number_hand_size: 3,
            operator_hand_size: 3,
            min_objective_value: 1,
            max_objective_value: 9,
            number_copies: 5,
            min_number_value: 1,
            max_number_value: 9,
            operator_copies: 10,
        }
    }
}

impl BambooParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode parameters from JSON; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| SearchError::ConfigParse(e.to_string()))
    }

    pub fn with_number_hand_size(mut self, size: usize) -> Self {
        self.number_hand_size = size;
        self
    }

    pub fn with_operator_hand_size(mut self, size: usize) -> Self {
        self.operator_hand_size = size;
        self
    }

    pub fn with_number_copies(mut self, copies: usize) -> Self {
        self.number_copies = copies;
        self
    }

    pub fn with_operator_copies(mut self, copies: usize) -> Self {
        self.operator_copies = copies;
        self
    }

    /// Number cards in a full deck.
    #[must_use]
    pub fn number_card_count(&self) -> usize {
        let values = (self.max_number_value - self.min_number_value + 1).max(0) as usize;
        values * self.number_copies
    }

    /// Objective cards in a full deck.
    #[must_use]
    pub fn objective_card_count(&self) -> usize {
        (self.max_objective_value - self.min_objective_value + 1).max(0) as usize
    }

    /// Operator cards in a full deck (both operators).
    #[must_use]
    pub fn operator_card_count(&self) -> usize {
        2 * (self.operator_copies + 1)
    }
}
