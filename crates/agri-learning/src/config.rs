//! Configuration for the yield model trainer.
//!
//! This module provides [`TrainerConfig`] and its builder. The defaults
//! reproduce a standard random-forest regressor evaluated on a single
//! 70/30 split with seed 0.
//!
//! # Example
//!
//! ```
//! use agri_learning::TrainerConfig;
//!
//! let config = TrainerConfig::builder()
//!     .n_estimators(50)
//!     .max_depth(12)
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.test_size, 0.3);
//! assert_eq!(config.random_state, 0);
//! ```

use crate::error::LearningError;
use serde::{Deserialize, Serialize};

/// Fraction of rows held out for evaluation.
pub const DEFAULT_TEST_SIZE: f64 = 0.3;

/// Seed shared by the split and the forest.
pub const DEFAULT_RANDOM_STATE: u64 = 0;

/// Number of trees in the forest.
pub const DEFAULT_N_ESTIMATORS: usize = 100;

/// Configuration for [`RandomForestTrainer`](crate::RandomForestTrainer).
///
/// # Validation
///
/// The builder validates the following constraints on [`build()`](TrainerConfigBuilder::build):
/// - `test_size` must be in range `(0.0, 1.0)` (exclusive)
/// - `n_estimators` must be at least 1
/// - `min_samples_split` must be at least 2
/// - `min_samples_leaf` must be at least 1
/// - `max_depth`, when set, must be at least 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Fraction of data to use for testing (default: 0.3).
    pub test_size: f64,

    /// Seed for the split, bootstrap sampling and feature shuffling (default: 0).
    pub random_state: u64,

    /// Number of trees (default: 100).
    pub n_estimators: usize,

    /// Maximum tree depth; `None` grows trees until leaves are pure.
    pub max_depth: Option<usize>,

    /// Minimum samples required to split an internal node (default: 2).
    pub min_samples_split: usize,

    /// Minimum samples required at a leaf (default: 1).
    pub min_samples_leaf: usize,

    /// Draw a bootstrap sample for each tree (default: true).
    pub bootstrap: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            test_size: DEFAULT_TEST_SIZE,
            random_state: DEFAULT_RANDOM_STATE,
            n_estimators: DEFAULT_N_ESTIMATORS,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            bootstrap: true,
        }
    }
}

impl TrainerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> TrainerConfigBuilder {
        TrainerConfigBuilder::default()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), LearningError> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(LearningError::InvalidConfig(format!(
                "test_size must be between 0.0 and 1.0 (exclusive), got {}",
                self.test_size
            )));
        }
        if self.n_estimators == 0 {
            return Err(LearningError::InvalidConfig(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(LearningError::InvalidConfig(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        if self.min_samples_leaf == 0 {
            return Err(LearningError::InvalidConfig(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(LearningError::InvalidConfig(
                "max_depth must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`TrainerConfig`].
#[derive(Debug, Default)]
pub struct TrainerConfigBuilder {
    test_size: Option<f64>,
    random_state: Option<u64>,
    n_estimators: Option<usize>,
    max_depth: Option<usize>,
    min_samples_split: Option<usize>,
    min_samples_leaf: Option<usize>,
    bootstrap: Option<bool>,
}

impl TrainerConfigBuilder {
    /// Set the held-out fraction.
    pub fn test_size(mut self, test_size: f64) -> Self {
        self.test_size = Some(test_size);
        self
    }

    /// Set the seed.
    pub fn random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Set the number of trees.
    pub fn n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = Some(n);
        self
    }

    /// Limit tree depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn min_samples_split(mut self, n: usize) -> Self {
        self.min_samples_split = Some(n);
        self
    }

    pub fn min_samples_leaf(mut self, n: usize) -> Self {
        self.min_samples_leaf = Some(n);
        self
    }

    /// Enable or disable bootstrap sampling.
    pub fn bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<TrainerConfig, LearningError> {
        let defaults = TrainerConfig::default();
        let config = TrainerConfig {
            test_size: self.test_size.unwrap_or(defaults.test_size),
            random_state: self.random_state.unwrap_or(defaults.random_state),
            n_estimators: self.n_estimators.unwrap_or(defaults.n_estimators),
            max_depth: self.max_depth.or(defaults.max_depth),
            min_samples_split: self.min_samples_split.unwrap_or(defaults.min_samples_split),
            min_samples_leaf: self.min_samples_leaf.unwrap_or(defaults.min_samples_leaf),
            bootstrap: self.bootstrap.unwrap_or(defaults.bootstrap),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrainerConfig::default();
        assert_eq!(config.test_size, 0.3);
        assert_eq!(config.random_state, 0);
        assert_eq!(config.n_estimators, 100);
        assert_eq!(config.max_depth, None);
        assert!(config.bootstrap);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = TrainerConfig::builder()
            .test_size(0.25)
            .random_state(7)
            .n_estimators(10)
            .max_depth(4)
            .bootstrap(false)
            .build()
            .unwrap();

        assert_eq!(config.test_size, 0.25);
        assert_eq!(config.random_state, 7);
        assert_eq!(config.n_estimators, 10);
        assert_eq!(config.max_depth, Some(4));
        assert!(!config.bootstrap);
    }

    #[test]
    fn test_invalid_test_size() {
        assert!(TrainerConfig::builder().test_size(0.0).build().is_err());
        assert!(TrainerConfig::builder().test_size(1.0).build().is_err());
    }

    #[test]
    fn test_invalid_tree_params() {
        assert!(TrainerConfig::builder().n_estimators(0).build().is_err());
        assert!(TrainerConfig::builder().min_samples_split(1).build().is_err());
        assert!(TrainerConfig::builder().max_depth(0).build().is_err());
    }
}
