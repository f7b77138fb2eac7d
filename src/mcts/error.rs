//! Search error type.

use thiserror::Error;

/// Errors that abort a single search call.
///
/// None of these leave the live game state modified; all search mutation
/// happens on working copies.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// Configuration failed validation before the first iteration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The forward model returned no actions for a non-terminal state.
    #[error("No legal actions available from current state")]
    NoLegalActions,

    /// A search was requested on a finished game.
    #[error("Cannot search from a terminal state")]
    TerminalState,

    /// Configuration text could not be decoded.
    #[error("Could not parse configuration: {0}")]
    ConfigParse(String),
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SearchError::InvalidConfig("budget must be positive".into()).to_string(),
            "Invalid configuration: budget must be positive"
        );
        assert_eq!(
            SearchError::NoLegalActions.to_string(),
            "No legal actions available from current state"
        );
    }
}
