//! agri-learning: random-forest yield modelling for the agricultural pipeline.
//!
//! This crate turns the merged country/year table produced by
//! `agri-processing` into a fitted regression model: one seeded train/test
//! split, one random forest and two metrics.
//!
//! # Features
//!
//! - **Feature extraction** from a `polars::DataFrame` with schema checks
//! - **Reproducible split** driven by a single seed
//! - **Native random forest** of CART regression trees with bootstrap sampling
//! - **Impurity-based feature importances** aligned to the feature columns
//! - **Explicit trainer state**: results exist only once training succeeded
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use agri_learning::{RandomForestTrainer, TrainerConfig};
//!
//! let mut trainer = RandomForestTrainer::new(
//!     TrainerConfig::default(),
//!     &["avg_temp (°C)", "average_rain_fall (mm/year)", "pest_value (tonnes)"],
//!     "yield_value (hg/ha)",
//! )?;
//!
//! let model = trainer.train_and_evaluate(&table)?;
//! println!("R² = {:.3}, MSE = {:.1}", model.score, model.mse);
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, LearningError>`]:
//!
//! - [`LearningError::InvalidConfig`] - Invalid trainer configuration
//! - [`LearningError::ColumnsNotFound`] - Feature or target column missing
//! - [`LearningError::NonNumericColumn`] - Column cannot be used as a number
//! - [`LearningError::NotTrained`] - Results requested before training
//!
//! See [`LearningError`] for the complete list.

mod config;
mod dataset;
mod error;
mod forest;
mod metrics;
mod trainer;
mod tree;

// Configuration types
pub use config::{
    DEFAULT_N_ESTIMATORS, DEFAULT_RANDOM_STATE, DEFAULT_TEST_SIZE, TrainerConfig,
    TrainerConfigBuilder,
};
// Error types
pub use error::{LearningError, Result};
// Data preparation
pub use dataset::{Dataset, FeatureMatrix, TrainTestSplit};
// Models
pub use forest::RandomForestRegressor;
pub use tree::{RegressionTree, TreeParams};
// Metrics
pub use metrics::{mean_squared_error, r2_score};
// Trainer
pub use trainer::{ModelResults, ModelState, RandomForestTrainer, TrainedModel};

// Models and trainers are handed across threads by callers.
static_assertions::assert_impl_all!(RandomForestTrainer: Send, Sync);
static_assertions::assert_impl_all!(TrainedModel: Send, Sync);
static_assertions::assert_impl_all!(LearningError: Send, Sync);
