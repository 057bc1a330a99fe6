//! Feature/target extraction and the seeded train/test split.

use crate::error::{LearningError, Result};
use polars::prelude::*;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Row-major numeric feature matrix with named columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    /// Column names, in the order of each row's values.
    pub feature_names: Vec<String>,
    /// One vector per sample.
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn n_samples(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Values of one feature across all samples.
    pub fn column(&self, idx: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[idx]).collect()
    }

    fn take(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}

/// Features plus the regression target.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub features: FeatureMatrix,
    pub targets: Vec<f64>,
}

/// Result of [`Dataset::train_test_split`].
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Dataset,
    pub test: Dataset,
    /// Row positions (in the source table) of the training partition.
    pub train_indices: Vec<usize>,
    /// Row positions (in the source table) of the test partition.
    pub test_indices: Vec<usize>,
}

impl Dataset {
    /// Extract the given feature columns and target column from a DataFrame.
    ///
    /// Every requested column must exist, be numeric (integer or float) and
    /// contain no nulls.
    pub fn from_dataframe<S: AsRef<str>>(
        df: &DataFrame,
        feature_columns: &[S],
        target_column: &str,
    ) -> Result<Self> {
        let present: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let missing: Vec<String> = feature_columns
            .iter()
            .map(|c| c.as_ref())
            .chain(std::iter::once(target_column))
            .filter(|c| !present.iter().any(|p| p == c))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(LearningError::ColumnsNotFound(missing));
        }

        let columns: Vec<Vec<f64>> = feature_columns
            .iter()
            .map(|c| numeric_values(df, c.as_ref()))
            .collect::<Result<_>>()?;
        let targets = numeric_values(df, target_column)?;

        let rows = (0..df.height())
            .map(|i| columns.iter().map(|col| col[i]).collect())
            .collect();

        Ok(Self {
            features: FeatureMatrix {
                feature_names: feature_columns.iter().map(|c| c.as_ref().to_string()).collect(),
                rows,
            },
            targets,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.targets.len()
    }

    /// Shuffle rows with a seeded RNG and hold out `ceil(test_size * n)` of them.
    ///
    /// The first `n_test` entries of the permutation form the test partition and
    /// the remainder the training partition, so identical inputs and seeds always
    /// yield identical partitions.
    pub fn train_test_split(&self, test_size: f64, seed: u64) -> Result<TrainTestSplit> {
        let n = self.n_samples();
        let n_test = (test_size * n as f64).ceil() as usize;
        let n_train = n.saturating_sub(n_test);
        if n_test == 0 || n_train == 0 {
            return Err(LearningError::InvalidData(format!(
                "With n_samples={}, test_size={} the resulting train set would be empty",
                n, test_size
            )));
        }

        let mut permutation: Vec<usize> = (0..n).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        permutation.shuffle(&mut rng);

        let test_indices = permutation[..n_test].to_vec();
        let train_indices = permutation[n_test..].to_vec();

        Ok(TrainTestSplit {
            train: self.take(&train_indices),
            test: self.take(&test_indices),
            train_indices,
            test_indices,
        })
    }

    fn take(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.take(indices),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }
}

fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df.column(name)?;
    if !is_numeric_dtype(column.dtype()) {
        return Err(LearningError::NonNumericColumn {
            column: name.to_string(),
            dtype: column.dtype().to_string(),
        });
    }

    let as_float = column.cast(&DataType::Float64)?;
    let values: Option<Vec<f64>> = as_float.f64()?.into_iter().collect();
    values.ok_or_else(|| {
        LearningError::InvalidData(format!("Column '{}' contains null values", name))
    })
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_frame() -> DataFrame {
        df!(
            "a" => [1i64, 2, 3, 4, 5, 6, 7, 8, 9, 10],
            "b" => [0.5f64, 1.5, 2.5, 3.5, 4.5, 5.5, 6.5, 7.5, 8.5, 9.5],
            "y" => [10i64, 20, 30, 40, 50, 60, 70, 80, 90, 100],
            "name" => ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]
        )
        .unwrap()
    }

    #[test]
    fn test_from_dataframe_rows_follow_feature_order() {
        let ds = Dataset::from_dataframe(&sample_frame(), &["b", "a"], "y").unwrap();
        assert_eq!(ds.features.feature_names, vec!["b", "a"]);
        assert_eq!(ds.features.rows[0], vec![0.5, 1.0]);
        assert_eq!(ds.targets[9], 100.0);
    }

    #[test]
    fn test_missing_columns_are_all_reported() {
        let err = Dataset::from_dataframe(&sample_frame(), &["a", "zz"], "target").unwrap_err();
        match err {
            LearningError::ColumnsNotFound(cols) => {
                assert_eq!(cols, vec!["zz".to_string(), "target".to_string()])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_string_feature_rejected() {
        let err = Dataset::from_dataframe(&sample_frame(), &["name"], "y").unwrap_err();
        assert!(matches!(err, LearningError::NonNumericColumn { .. }));
    }

    #[test]
    fn test_null_target_rejected() {
        let df = df!("a" => [1.0f64, 2.0], "y" => [Some(1.0f64), None]).unwrap();
        let err = Dataset::from_dataframe(&df, &["a"], "y").unwrap_err();
        assert!(matches!(err, LearningError::InvalidData(_)));
    }

    #[test]
    fn test_split_sizes_and_disjointness() {
        let ds = Dataset::from_dataframe(&sample_frame(), &["a", "b"], "y").unwrap();
        let split = ds.train_test_split(0.3, 0).unwrap();

        assert_eq!(split.test_indices.len(), 3);
        assert_eq!(split.train_indices.len(), 7);

        let mut all: Vec<usize> = split
            .train_indices
            .iter()
            .chain(split.test_indices.iter())
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());

        // Targets travel with their rows
        for (pos, &idx) in split.test_indices.iter().enumerate() {
            assert_eq!(split.test.targets[pos], ds.targets[idx]);
        }
    }

    #[test]
    fn test_split_is_deterministic_for_a_seed() {
        let ds = Dataset::from_dataframe(&sample_frame(), &["a"], "y").unwrap();
        let first = ds.train_test_split(0.3, 0).unwrap();
        let second = ds.train_test_split(0.3, 0).unwrap();
        assert_eq!(first.test_indices, second.test_indices);
        assert_eq!(first.train_indices, second.train_indices);
    }

    #[test]
    fn test_split_rejects_empty_train() {
        let df = df!("a" => [1.0f64], "y" => [2.0f64]).unwrap();
        let ds = Dataset::from_dataframe(&df, &["a"], "y").unwrap();
        assert!(matches!(
            ds.train_test_split(0.3, 0),
            Err(LearningError::InvalidData(_))
        ));
    }
}
