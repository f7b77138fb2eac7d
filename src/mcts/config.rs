//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

use super::error::{Result, SearchError};

/// How long a single search runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Budget {
    /// Fixed number of iterations (reproducible given a seed).
    Iterations(u32),
    /// Wall-clock limit, checked between iterations.
    TimeMillis(u64),
}

/// How rewards and node keys treat players other than the searcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpponentModel {
    /// Opponents minimize the root player's value.
    Paranoid,
    /// Every player maximizes their own reward.
    MaxN,
    /// Only the root player's decisions become tree nodes; opponents'
    /// turns are resolved by the opponent policy and collapsed into edges.
    SelfOnly,
}

/// Rollout policy selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RolloutKind {
    /// Uniform random legal actions.
    Random,
    /// One-ply lookahead maximizing the actor's heuristic score.
    Greedy,
}

/// MCTS configuration parameters.
///
/// Read-only once a search starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MCTSConfig {
    /// Iteration or time budget per search.
    pub budget: Budget,

    /// Keep the subtree reached by real moves between searches.
    pub reuse_tree: bool,

    /// Opponent-modeling policy.
    pub opponent_model: OpponentModel,

    /// UCB1 exploration constant (default: sqrt(2) = 1.414).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Maximum actions per rollout before falling back to the heuristic.
    pub rollout_depth: u32,

    /// Rollout policy.
    pub rollout_policy: RolloutKind,

    /// Resample hidden information for every iteration.
    pub redeterminize: bool,

    /// Random seed for the search's own stream.
    /// Same seed produces deterministic searches.
    pub seed: u64,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            budget: Budget::Iterations(1000),
            reuse_tree: true,
            opponent_model: OpponentModel::MaxN,
            exploration_constant: std::f64::consts::SQRT_2,
            rollout_depth: 100,
            rollout_policy: RolloutKind::Random,
            redeterminize: true,
            seed: 42,
        }
    }
}

impl MCTSConfig {
    /// Decode a configuration document. Missing fields take defaults.
    ///
    /// ```
    /// use tabletop_mcts::mcts::{Budget, MCTSConfig, OpponentModel};
    ///
    /// let config = MCTSConfig::from_json(
    ///     r#"{ "budget": { "Iterations": 200 }, "opponent_model": "Paranoid" }"#,
    /// ).unwrap();
    /// assert_eq!(config.budget, Budget::Iterations(200));
    /// assert_eq!(config.opponent_model, OpponentModel::Paranoid);
    /// assert!(config.reuse_tree);
    /// ```
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| SearchError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject malformed configurations before any iteration runs.
    pub fn validate(&self) -> Result<()> {
        match self.budget {
            Budget::Iterations(0) => {
                return Err(SearchError::InvalidConfig(
                    "iteration budget must be positive".into(),
                ))
            }
            Budget::TimeMillis(0) => {
                return Err(SearchError::InvalidConfig("time budget must be positive".into()))
            }
            _ => {}
        }
        if self.rollout_depth == 0 {
            return Err(SearchError::InvalidConfig("rollout depth must be positive".into()));
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        Ok(())
    }

    /// Set an iteration budget.
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.budget = Budget::Iterations(iterations);
        self
    }

    /// Set a wall-clock budget.
    #[must_use]
    pub fn with_time_millis(mut self, millis: u64) -> Self {
        self.budget = Budget::TimeMillis(millis);
        self
    }

    /// Enable or disable tree reuse.
    #[must_use]
    pub fn with_reuse(mut self, reuse: bool) -> Self {
        self.reuse_tree = reuse;
        self
    }

    /// Set the opponent model.
    #[must_use]
    pub fn with_opponent_model(mut self, model: OpponentModel) -> Self {
        self.opponent_model = model;
        self
    }

    /// Set the exploration constant.
    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Set the rollout depth.
    #[must_use]
    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.rollout_depth = depth;
        self
    }

    /// Set the rollout policy.
    #[must_use]
    pub fn with_rollout(mut self, kind: RolloutKind) -> Self {
        self.rollout_policy = kind;
        self
    }

    /// Enable or disable per-iteration redeterminization.
    #[must_use]
    pub fn with_redeterminize(mut self, redeterminize: bool) -> Self {
        self.redeterminize = redeterminize;
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MCTSConfig::default();
        assert!((config.exploration_constant - std::f64::consts::SQRT_2).abs() < 0.001);
        assert_eq!(config.rollout_depth, 100);
        assert_eq!(config.opponent_model, OpponentModel::MaxN);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MCTSConfig::default()
            .with_iterations(200)
            .with_exploration(2.0)
            .with_seed(123)
            .with_reuse(false)
            .with_rollout(RolloutKind::Greedy);

        assert_eq!(config.budget, Budget::Iterations(200));
        assert_eq!(config.exploration_constant, 2.0);
        assert_eq!(config.seed, 123);
        assert!(!config.reuse_tree);
        assert_eq!(config.rollout_policy, RolloutKind::Greedy);
    }

    #[test]
    fn test_validate_rejects_malformed() {
        let zero_iterations = MCTSConfig::default().with_iterations(0);
        assert!(matches!(zero_iterations.validate(), Err(SearchError::InvalidConfig(_))));

        let zero_time = MCTSConfig::default().with_time_millis(0);
        assert!(zero_time.validate().is_err());

        let zero_depth = MCTSConfig::default().with_rollout_depth(0);
        assert!(zero_depth.validate().is_err());

        let bad_c = MCTSConfig::default().with_exploration(f64::NAN);
        assert!(bad_c.validate().is_err());

        let negative_c = MCTSConfig::default().with_exploration(-1.0);
        assert!(negative_c.validate().is_err());
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(
            MCTSConfig::from_json("{ not json"),
            Err(SearchError::ConfigParse(_))
        ));
        assert!(matches!(
            MCTSConfig::from_json(r#"{ "budget": { "Iterations": 0 } }"#),
            Err(SearchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_serialization() {
        let config = MCTSConfig::default()
            .with_time_millis(250)
            .with_opponent_model(OpponentModel::SelfOnly);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MCTSConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
