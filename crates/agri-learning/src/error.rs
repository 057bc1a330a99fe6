//! Error types for the agri-learning crate.
//!
//! This module defines [`LearningError`], the main error type used throughout
//! the crate. All public API functions return `Result<T, LearningError>`.
//!
//! # Example
//!
//! ```
//! use agri_learning::{LearningError, TrainerConfig};
//!
//! fn configure() -> Result<TrainerConfig, LearningError> {
//!     // Errors are automatically propagated with ?
//!     let config = TrainerConfig::builder().test_size(0.3).build()?;
//!     Ok(config)
//! }
//! # configure().unwrap();
//! ```

use thiserror::Error;

/// The main error type for agri-learning operations.
///
/// This enum covers all error conditions that can occur during:
/// - Trainer configuration and validation
/// - Feature/target extraction from a DataFrame
/// - Train/test splitting
/// - Model fitting and evaluation
/// - Querying results of a model that was never trained
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LearningError {
    /// Invalid configuration provided to the trainer.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid data provided for training or inference.
    ///
    /// Common causes:
    /// - A feature or target column contains null values
    /// - Too few rows to produce non-empty train and test partitions
    /// - Prediction input with the wrong number of features
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// One or more feature/target columns were not found in the DataFrame.
    ///
    /// Column names are case-sensitive.
    #[error("Column(s) not found: {}", .0.join(", "))]
    ColumnsNotFound(Vec<String>),

    /// A column could not be interpreted as numeric.
    #[error("Column '{column}' is not numeric ({dtype})")]
    NonNumericColumn {
        /// The offending column.
        column: String,
        /// Its polars data type.
        dtype: String,
    },

    /// Model results were requested before `train_and_evaluate` ran.
    #[error("Model has not been trained; call train_and_evaluate first")]
    NotTrained,

    /// Model (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error while saving or loading a model.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl LearningError {
    /// Get a stable error code for callers that map errors to messages.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::InvalidData(_) => "INVALID_DATA",
            Self::ColumnsNotFound(_) => "SCHEMA_ERROR",
            Self::NonNumericColumn { .. } => "CONVERSION_ERROR",
            Self::NotTrained => "NOT_TRAINED",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
        }
    }
}

/// Result type alias for learning operations.
pub type Result<T> = std::result::Result<T, LearningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LearningError::NotTrained.error_code(), "NOT_TRAINED");
        assert_eq!(
            LearningError::ColumnsNotFound(vec!["a".to_string()]).error_code(),
            "SCHEMA_ERROR"
        );
    }

    #[test]
    fn test_columns_not_found_message_lists_all() {
        let err = LearningError::ColumnsNotFound(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "Column(s) not found: a, b");
    }
}
