//! The yield model trainer.
//!
//! [`RandomForestTrainer`] owns the configuration and the feature/target
//! column names, and moves from [`ModelState::Untrained`] to
//! [`ModelState::Trained`] in a single [`train_and_evaluate`] call. Results
//! only exist inside the `Trained` variant, so asking an untrained trainer for
//! them yields [`LearningError::NotTrained`].
//!
//! [`train_and_evaluate`]: RandomForestTrainer::train_and_evaluate
//!
//! # Example
//!
//! ```
//! use agri_learning::{LearningError, RandomForestTrainer, TrainerConfig};
//! use polars::prelude::*;
//!
//! let df = df!(
//!     "rain" => (0..20).map(|i| i as f64).collect::<Vec<_>>(),
//!     "yield" => (0..20).map(|i| (i * 2) as f64).collect::<Vec<_>>()
//! )?;
//!
//! let config = TrainerConfig::builder().n_estimators(5).build()?;
//! let mut trainer = RandomForestTrainer::new(config, &["rain"], "yield")?;
//! assert!(matches!(trainer.results(), Err(LearningError::NotTrained)));
//!
//! let model = trainer.train_and_evaluate(&df)?;
//! assert_eq!(model.results().y_test.len(), 6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::config::TrainerConfig;
use crate::dataset::{Dataset, FeatureMatrix};
use crate::error::{LearningError, Result};
use crate::forest::RandomForestRegressor;
use crate::metrics::{mean_squared_error, r2_score};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Arrays handed to the report layer after training.
///
/// Serialized keys follow the conventional `X_train`/`y_pred` naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResults {
    #[serde(rename = "X_train")]
    pub x_train: FeatureMatrix,
    #[serde(rename = "X_test")]
    pub x_test: FeatureMatrix,
    pub y_train: Vec<f64>,
    pub y_test: Vec<f64>,
    /// Predictions for `X_test`, row-aligned with `y_test`.
    pub y_pred: Vec<f64>,
    /// One `(feature, weight)` pair per feature, in feature-column order.
    pub feature_importance: Vec<(String, f64)>,
    /// Row positions of the training rows in the source table.
    pub train_indices: Vec<usize>,
    /// Row positions of the test rows in the source table.
    pub test_indices: Vec<usize>,
}

/// A fitted forest plus its evaluation on the held-out partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    forest: RandomForestRegressor,
    results: ModelResults,
    /// Coefficient of determination on the test partition.
    pub score: f64,
    /// Mean squared error on the test partition.
    pub mse: f64,
    pub training_time_seconds: f64,
}

impl TrainedModel {
    pub fn results(&self) -> &ModelResults {
        &self.results
    }

    pub fn forest(&self) -> &RandomForestRegressor {
        &self.forest
    }

    /// Predict yields for a feature matrix with the training column layout.
    pub fn predict(&self, x: &FeatureMatrix) -> Result<Vec<f64>> {
        self.forest.predict(x)
    }

    /// Importances sorted from most to least important.
    pub fn ranked_importances(&self) -> Vec<(String, f64)> {
        let mut ranked = self.results.feature_importance.clone();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// Serialize the model to JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Save the model as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

/// Training state of a [`RandomForestTrainer`].
#[derive(Debug, Clone, PartialEq)]
pub enum ModelState {
    Untrained,
    Trained(Box<TrainedModel>),
}

/// Splits a table, fits a random forest and evaluates it.
#[derive(Debug, Clone)]
pub struct RandomForestTrainer {
    config: TrainerConfig,
    feature_columns: Vec<String>,
    target_column: String,
    state: ModelState,
}

impl RandomForestTrainer {
    /// Create an untrained trainer.
    pub fn new<S: AsRef<str>>(
        config: TrainerConfig,
        feature_columns: &[S],
        target_column: &str,
    ) -> Result<Self> {
        config.validate()?;
        if feature_columns.is_empty() {
            return Err(LearningError::InvalidConfig(
                "At least one feature column is required".to_string(),
            ));
        }
        Ok(Self {
            config,
            feature_columns: feature_columns
                .iter()
                .map(|c| c.as_ref().to_string())
                .collect(),
            target_column: target_column.to_string(),
            state: ModelState::Untrained,
        })
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    pub fn is_trained(&self) -> bool {
        matches!(self.state, ModelState::Trained(_))
    }

    /// Select features and target, split, fit, predict and score.
    ///
    /// Replaces any previously trained model. On error the trainer keeps its
    /// previous state.
    pub fn train_and_evaluate(&mut self, df: &DataFrame) -> Result<&TrainedModel> {
        let start = Instant::now();

        let dataset = Dataset::from_dataframe(df, &self.feature_columns, &self.target_column)?;
        let split = dataset.train_test_split(self.config.test_size, self.config.random_state)?;
        debug!(
            "Split {} rows into {} train / {} test",
            dataset.n_samples(),
            split.train.n_samples(),
            split.test.n_samples()
        );

        let forest = RandomForestRegressor::fit(&self.config, &split.train)?;
        let y_pred = forest.predict(&split.test.features)?;
        let score = r2_score(&split.test.targets, &y_pred);
        let mse = mean_squared_error(&split.test.targets, &y_pred);

        let feature_importance = self
            .feature_columns
            .iter()
            .cloned()
            .zip(forest.feature_importances().iter().copied())
            .collect();

        info!(
            "Trained random forest ({} trees): R²={:.4}, MSE={:.2}",
            forest.n_trees(),
            score,
            mse
        );

        let results = ModelResults {
            x_train: split.train.features,
            x_test: split.test.features,
            y_train: split.train.targets,
            y_test: split.test.targets,
            y_pred,
            feature_importance,
            train_indices: split.train_indices,
            test_indices: split.test_indices,
        };

        self.state = ModelState::Trained(Box::new(TrainedModel {
            forest,
            results,
            score,
            mse,
            training_time_seconds: start.elapsed().as_secs_f64(),
        }));
        self.model()
    }

    /// The trained model, or [`LearningError::NotTrained`].
    pub fn model(&self) -> Result<&TrainedModel> {
        match &self.state {
            ModelState::Trained(model) => Ok(model),
            ModelState::Untrained => Err(LearningError::NotTrained),
        }
    }

    pub fn results(&self) -> Result<&ModelResults> {
        self.model().map(TrainedModel::results)
    }

    pub fn score(&self) -> Result<f64> {
        self.model().map(|m| m.score)
    }

    pub fn mse(&self) -> Result<f64> {
        self.model().map(|m| m.mse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn yield_frame(n: usize) -> DataFrame {
        let temp: Vec<f64> = (0..n).map(|i| 10.0 + (i % 15) as f64).collect();
        let rain: Vec<i64> = (0..n).map(|i| 500 + ((i * 37) % 900) as i64).collect();
        let pest: Vec<f64> = (0..n).map(|i| ((i * 13) % 50) as f64).collect();
        let target: Vec<i64> = (0..n)
            .map(|i| (2000.0 + 40.0 * temp[i] + 0.5 * rain[i] as f64 + 3.0 * pest[i]) as i64)
            .collect();
        df!(
            "avg_temp" => temp,
            "rain" => rain,
            "pest" => pest,
            "yield" => target
        )
        .unwrap()
    }

    fn trainer() -> RandomForestTrainer {
        let config = TrainerConfig::builder().n_estimators(20).build().unwrap();
        RandomForestTrainer::new(config, &["avg_temp", "rain", "pest"], "yield").unwrap()
    }

    #[test]
    fn test_untrained_results_fail() {
        let t = trainer();
        assert!(!t.is_trained());
        assert!(matches!(t.results(), Err(LearningError::NotTrained)));
        assert!(matches!(t.score(), Err(LearningError::NotTrained)));
    }

    #[test]
    fn test_train_and_evaluate_populates_results() {
        let mut t = trainer();
        let model = t.train_and_evaluate(&yield_frame(60)).unwrap();
        let results = model.results();

        assert_eq!(results.y_test.len(), 18);
        assert_eq!(results.y_train.len(), 42);
        assert_eq!(results.y_pred.len(), results.y_test.len());
        assert_eq!(results.x_test.n_samples(), 18);

        let names: Vec<&str> = results
            .feature_importance
            .iter()
            .map(|(n, _)| n.as_str())
            .collect();
        assert_eq!(names, vec!["avg_temp", "rain", "pest"]);
        assert!(model.score > 0.0);
        assert!(t.is_trained());
    }

    #[test]
    fn test_training_is_deterministic() {
        let df = yield_frame(50);
        let mut a = trainer();
        let mut b = trainer();
        let first = a.train_and_evaluate(&df).unwrap().clone();
        let second = b.train_and_evaluate(&df).unwrap();

        assert_eq!(first.results().y_pred, second.results().y_pred);
        assert_eq!(first.score, second.score);
        assert_eq!(
            first.results().feature_importance,
            second.results().feature_importance
        );
    }

    #[test]
    fn test_missing_target_is_schema_error() {
        let mut t = RandomForestTrainer::new(TrainerConfig::default(), &["rain"], "nope").unwrap();
        let err = t.train_and_evaluate(&yield_frame(10)).unwrap_err();
        assert_eq!(err.error_code(), "SCHEMA_ERROR");
        assert!(!t.is_trained());
    }

    #[test]
    fn test_results_serialize_with_conventional_keys() {
        let mut t = trainer();
        let model = t.train_and_evaluate(&yield_frame(20)).unwrap();
        let json = serde_json::to_value(model.results()).unwrap();
        for key in ["X_train", "X_test", "y_train", "y_test", "y_pred", "feature_importance"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_model_bytes_roundtrip_predicts_identically() {
        let mut t = trainer();
        let model = t.train_and_evaluate(&yield_frame(30)).unwrap();
        let restored = TrainedModel::from_bytes(&model.to_bytes().unwrap()).unwrap();
        let x = &model.results().x_test;
        for (a, b) in model.predict(x).unwrap().iter().zip(restored.predict(x).unwrap()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_empty_feature_list_rejected() {
        let empty: [&str; 0] = [];
        assert!(RandomForestTrainer::new(TrainerConfig::default(), &empty, "y").is_err());
    }
}
