//! Error types for the agricultural data pipeline.
//!
//! Every stage propagates its failure to the caller; there is no retry or
//! recovery. The one place failures are turned into data is continent lookup,
//! which yields null instead of an error.
//!
//! Errors are serializable as `{code, message}` so the CLI can print them in
//! its JSON output mode.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// An input file is missing or unreadable.
    #[error("Cannot access '{}': {reason}", path.display())]
    FileAccess { path: PathBuf, reason: String },

    /// A file was read but its contents do not match the declared delimiter,
    /// encoding or column layout.
    #[error("Failed to parse '{}': {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// One or more expected columns are absent.
    #[error("Column(s) not found: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    /// A rename would produce a column name that already exists.
    #[error("Cannot rename '{from}' to '{to}': column already exists")]
    ColumnConflict { from: String, to: String },

    /// A value could not be converted after placeholder substitution.
    #[error("Cannot convert value '{value}' in column '{column}' (row {row}) to integer")]
    Conversion {
        column: String,
        row: usize,
        value: String,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Report generation failed.
    #[error("Failed to generate report: {0}")]
    ReportGenerationFailed(String),

    /// Model training or evaluation failed.
    #[error(transparent)]
    Learning(#[from] agri_learning::LearningError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reader/writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PipelineError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for a single missing column.
    pub fn missing_column(name: impl Into<String>) -> Self {
        PipelineError::Schema {
            missing: vec![name.into()],
        }
    }

    /// Get a stable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FileAccess { .. } => "FILE_ACCESS",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::Schema { .. } | Self::ColumnConflict { .. } => "SCHEMA_ERROR",
            Self::Conversion { .. } => "CONVERSION_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ReportGenerationFailed(_) => "REPORT_GENERATION_FAILED",
            Self::Learning(e) => e.error_code(),
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Csv(_) => "CSV_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by bad input data rather than the environment.
    pub fn is_data_error(&self) -> bool {
        match self {
            Self::Parse { .. }
            | Self::Schema { .. }
            | Self::ColumnConflict { .. }
            | Self::Conversion { .. } => true,
            Self::WithContext { source, .. } => source.is_data_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for PipelineError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("PipelineError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PipelineError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PipelineError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agri_learning::LearningError;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            PipelineError::missing_column("Year").error_code(),
            "SCHEMA_ERROR"
        );
        assert_eq!(
            PipelineError::Conversion {
                column: "rain".to_string(),
                row: 3,
                value: "abc".to_string(),
            }
            .error_code(),
            "CONVERSION_ERROR"
        );
        assert_eq!(
            PipelineError::from(LearningError::NotTrained).error_code(),
            "NOT_TRAINED"
        );
    }

    #[test]
    fn test_schema_message_names_all_columns() {
        let err = PipelineError::Schema {
            missing: vec!["Item_y".to_string(), "Value_y".to_string()],
        };
        assert_eq!(err.to_string(), "Column(s) not found: Item_y, Value_y");
    }

    #[test]
    fn test_error_serialization() {
        let error = PipelineError::FileAccess {
            path: PathBuf::from("data/rain.csv"),
            reason: "No such file".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("FILE_ACCESS"));
        assert!(json.contains("rain.csv"));
    }

    #[test]
    fn test_with_context() {
        let error = PipelineError::missing_column("Country").with_context("During merge");
        assert!(error.to_string().contains("During merge"));
        assert_eq!(error.error_code(), "SCHEMA_ERROR");
        assert!(error.is_data_error());
    }
}
