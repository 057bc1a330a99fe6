//! Random forest regressor.
//!
//! Each tree is grown on its own bootstrap sample with an RNG seeded from the
//! forest seed plus the tree index, so a fit is fully reproducible.

use crate::config::TrainerConfig;
use crate::dataset::{Dataset, FeatureMatrix};
use crate::error::{LearningError, Result};
use crate::metrics::r2_score;
use crate::tree::{RegressionTree, TreeParams};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A fitted random forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<RegressionTree>,
    feature_names: Vec<String>,
    feature_importances: Vec<f64>,
}

impl RandomForestRegressor {
    /// Fit a forest on a training dataset.
    pub fn fit(config: &TrainerConfig, train: &Dataset) -> Result<Self> {
        let n = train.n_samples();
        if n == 0 {
            return Err(LearningError::InvalidData(
                "Cannot fit a forest on an empty training set".to_string(),
            ));
        }

        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            min_samples_leaf: config.min_samples_leaf,
        };

        let trees: Vec<RegressionTree> = (0..config.n_estimators)
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(config.random_state.wrapping_add(i as u64));
                let sample: Vec<usize> = if config.bootstrap {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                RegressionTree::fit(&train.features, &train.targets, &sample, params, &mut rng)
            })
            .collect();

        let feature_importances = aggregate_importances(&trees, train.features.n_features());
        debug!(
            "Fitted {} trees (mean depth {:.1})",
            trees.len(),
            trees.iter().map(|t| t.depth() as f64).sum::<f64>() / trees.len() as f64
        );

        Ok(Self {
            trees,
            feature_names: train.features.feature_names.clone(),
            feature_importances,
        })
    }

    /// Predict a single sample by averaging the trees.
    pub fn predict_one(&self, row: &[f64]) -> f64 {
        self.trees.iter().map(|t| t.predict_one(row)).sum::<f64>() / self.trees.len() as f64
    }

    /// Predict every row of a feature matrix.
    pub fn predict(&self, x: &FeatureMatrix) -> Result<Vec<f64>> {
        if x.feature_names.len() != self.feature_names.len() {
            return Err(LearningError::InvalidData(format!(
                "Expected {} features, got {}",
                self.feature_names.len(),
                x.feature_names.len()
            )));
        }
        Ok(x.rows.iter().map(|row| self.predict_one(row)).collect())
    }

    /// R² of the forest's predictions on a dataset.
    pub fn score(&self, data: &Dataset) -> Result<f64> {
        let predictions = self.predict(&data.features)?;
        Ok(r2_score(&data.targets, &predictions))
    }

    /// Importances aligned with [`feature_names`](Self::feature_names).
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

/// Mean of the per-tree importances (single-leaf trees excluded), renormalised.
fn aggregate_importances(trees: &[RegressionTree], n_features: usize) -> Vec<f64> {
    let split_trees: Vec<&RegressionTree> = trees.iter().filter(|t| t.node_count() > 1).collect();
    if split_trees.is_empty() {
        return vec![0.0; n_features];
    }

    let mut importances = vec![0.0; n_features];
    for tree in &split_trees {
        for (acc, imp) in importances.iter_mut().zip(tree.feature_importances()) {
            *acc += imp;
        }
    }
    for imp in &mut importances {
        *imp /= split_trees.len() as f64;
    }

    let total: f64 = importances.iter().sum();
    if total > 0.0 {
        for imp in &mut importances {
            *imp /= total;
        }
    }
    importances
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic(n: usize) -> Dataset {
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                let x1 = i as f64 / 10.0;
                let x2 = ((i * 7) % 13) as f64;
                vec![x1, x2]
            })
            .collect();
        let targets = rows.iter().map(|r| 3.0 * r[0] + 0.1 * r[1]).collect();
        Dataset {
            features: FeatureMatrix {
                feature_names: vec!["x1".to_string(), "x2".to_string()],
                rows,
            },
            targets,
        }
    }

    fn small_config() -> TrainerConfig {
        TrainerConfig::builder().n_estimators(10).build().unwrap()
    }

    #[test]
    fn test_fit_produces_requested_trees() {
        let forest = RandomForestRegressor::fit(&small_config(), &synthetic(100)).unwrap();
        assert_eq!(forest.n_trees(), 10);
        assert_eq!(forest.feature_importances().len(), 2);
        let total: f64 = forest.feature_importances().iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_dominant_feature_has_highest_importance() {
        let forest = RandomForestRegressor::fit(&small_config(), &synthetic(200)).unwrap();
        let imp = forest.feature_importances();
        assert!(imp[0] > imp[1]);
    }

    #[test]
    fn test_fits_training_data_well() {
        let data = synthetic(150);
        let forest = RandomForestRegressor::fit(&small_config(), &data).unwrap();
        assert!(forest.score(&data).unwrap() > 0.9);
    }

    #[test]
    fn test_same_seed_same_forest() {
        let data = synthetic(80);
        let a = RandomForestRegressor::fit(&small_config(), &data).unwrap();
        let b = RandomForestRegressor::fit(&small_config(), &data).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let forest = RandomForestRegressor::fit(&small_config(), &synthetic(30)).unwrap();
        let x = FeatureMatrix {
            feature_names: vec!["x1".to_string()],
            rows: vec![vec![1.0]],
        };
        assert!(matches!(forest.predict(&x), Err(LearningError::InvalidData(_))));
    }

    #[test]
    fn test_empty_training_set_rejected() {
        let data = Dataset {
            features: FeatureMatrix {
                feature_names: vec!["x".to_string()],
                rows: vec![],
            },
            targets: vec![],
        };
        assert!(RandomForestRegressor::fit(&small_config(), &data).is_err());
    }
}
