//! Configuration for the agricultural pipeline.
//!
//! Input locations derive from a single data root: the `DATA_DIR`
//! environment variable when set, the current directory otherwise. Sources
//! are looked up under `<root>/data/` and reports go to `<root>/output/`
//! unless an output directory is given explicitly.

use agri_learning::TrainerConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the data root.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub const RAIN_FILE: &str = "rain.csv";
pub const NORMALIZED_RAIN_FILE: &str = "modified_rain.csv";
pub const TEMPERATURE_FILE: &str = "temperature.csv";
pub const PESTICIDE_FILE: &str = "pesticides_usage.csv";
pub const YIELD_FILE: &str = "yield.csv";

/// Placeholder the rainfall source uses for missing measurements.
pub const DEFAULT_PLACEHOLDER: &str = "..";

/// Text encoding of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextEncoding {
    /// UTF-8; invalid sequences are a parse error.
    #[default]
    Utf8,
    /// ISO-8859-1: every byte is the code point of the same value.
    Latin1,
}

/// Configuration for the pipeline.
///
/// Use [`PipelineConfig::builder()`] for a validated configuration, or
/// [`PipelineConfig::from_env()`] for the defaults rooted at `DATA_DIR`.
///
/// # Example
///
/// ```rust,ignore
/// use agri_processing::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .data_root("/srv/agri")
///     .output_dir("/tmp/reports")
///     .build()?;
///
/// assert!(config.rain_path().ends_with("data/rain.csv"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory containing the `data/` folder.
    pub data_root: PathBuf,

    /// Where reports and charts are written.
    /// Default: `<data_root>/output`
    pub output_dir: PathBuf,

    /// Encoding of the temperature source.
    /// Default: Latin1
    pub temperature_encoding: TextEncoding,

    /// Delimiter of the pesticide and yield sources.
    /// Default: `;`
    pub agri_delimiter: u8,

    /// Token treated as zero rainfall.
    /// Default: `..`
    pub placeholder: String,

    /// Exact-match country name repairs applied to the temperature source.
    pub country_fixes: Vec<(String, String)>,

    /// Settings of the yield model.
    pub trainer: TrainerConfig,

    /// Whether to write charts and tables.
    /// Default: true
    pub generate_reports: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::rooted_at(PathBuf::from("."))
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Defaults rooted at `$DATA_DIR`, or the current directory.
    pub fn from_env() -> Self {
        Self::rooted_at(data_root_from_env())
    }

    fn rooted_at(root: PathBuf) -> Self {
        Self {
            output_dir: root.join("output"),
            data_root: root,
            temperature_encoding: TextEncoding::Latin1,
            agri_delimiter: b';',
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            country_fixes: default_country_fixes(),
            trainer: TrainerConfig::default(),
            generate_reports: true,
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_root.join("data")
    }

    pub fn rain_path(&self) -> PathBuf {
        self.data_dir().join(RAIN_FILE)
    }

    /// Intermediate file written by the rain normalizer.
    pub fn normalized_rain_path(&self) -> PathBuf {
        self.data_dir().join(NORMALIZED_RAIN_FILE)
    }

    pub fn temperature_path(&self) -> PathBuf {
        self.data_dir().join(TEMPERATURE_FILE)
    }

    pub fn pesticide_path(&self) -> PathBuf {
        self.data_dir().join(PESTICIDE_FILE)
    }

    pub fn yield_path(&self) -> PathBuf {
        self.data_dir().join(YIELD_FILE)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.trainer
            .validate()
            .map_err(|e| ConfigValidationError::Trainer(e.to_string()))?;

        if matches!(self.agri_delimiter, b'\n' | b'\r' | b'"' | 0) {
            return Err(ConfigValidationError::InvalidDelimiter(
                self.agri_delimiter as char,
            ));
        }

        if self.placeholder.is_empty() {
            return Err(ConfigValidationError::EmptyPlaceholder);
        }

        if self.output_dir.is_file() {
            return Err(ConfigValidationError::OutputIsFile(self.output_dir.clone()));
        }

        Ok(())
    }
}

/// Read the data root from `DATA_DIR`, defaulting to the current directory.
pub fn data_root_from_env() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// The Ivory Coast spelling the temperature source garbles.
pub fn default_country_fixes() -> Vec<(String, String)> {
    vec![("CÃ´te D'Ivoire".to_string(), "Côte D'Ivoire".to_string())]
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid model settings: {0}")]
    Trainer(String),

    #[error("Invalid delimiter {0:?}")]
    InvalidDelimiter(char),

    #[error("Placeholder token must not be empty")]
    EmptyPlaceholder,

    #[error("Output directory '{}' is an existing file", .0.display())]
    OutputIsFile(PathBuf),
}

impl From<ConfigValidationError> for crate::error::PipelineError {
    fn from(e: ConfigValidationError) -> Self {
        crate::error::PipelineError::InvalidConfig(e.to_string())
    }
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    data_root: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    temperature_encoding: Option<TextEncoding>,
    agri_delimiter: Option<u8>,
    placeholder: Option<String>,
    country_fixes: Option<Vec<(String, String)>>,
    trainer: Option<TrainerConfig>,
    generate_reports: Option<bool>,
}

impl PipelineConfigBuilder {
    /// Set the directory that contains `data/`.
    ///
    /// If not set, `DATA_DIR` or the current directory is used.
    pub fn data_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_root = Some(path.into());
        self
    }

    /// Set the output directory for reports.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    pub fn temperature_encoding(mut self, encoding: TextEncoding) -> Self {
        self.temperature_encoding = Some(encoding);
        self
    }

    /// Set the delimiter of the pesticide and yield files.
    pub fn agri_delimiter(mut self, delimiter: u8) -> Self {
        self.agri_delimiter = Some(delimiter);
        self
    }

    pub fn placeholder(mut self, token: impl Into<String>) -> Self {
        self.placeholder = Some(token.into());
        self
    }

    /// Replace the country name repairs.
    pub fn country_fixes(mut self, fixes: Vec<(String, String)>) -> Self {
        self.country_fixes = Some(fixes);
        self
    }

    /// Set the model settings.
    pub fn trainer(mut self, trainer: TrainerConfig) -> Self {
        self.trainer = Some(trainer);
        self
    }

    /// Enable or disable report generation.
    pub fn generate_reports(mut self, generate: bool) -> Self {
        self.generate_reports = Some(generate);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let defaults =
            PipelineConfig::rooted_at(self.data_root.unwrap_or_else(data_root_from_env));

        let config = PipelineConfig {
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            data_root: defaults.data_root,
            temperature_encoding: self
                .temperature_encoding
                .unwrap_or(defaults.temperature_encoding),
            agri_delimiter: self.agri_delimiter.unwrap_or(defaults.agri_delimiter),
            placeholder: self.placeholder.unwrap_or(defaults.placeholder),
            country_fixes: self.country_fixes.unwrap_or(defaults.country_fixes),
            trainer: self.trainer.unwrap_or(defaults.trainer),
            generate_reports: self.generate_reports.unwrap_or(defaults.generate_reports),
        };

        config.validate()?;
        Ok(config)
    }
}
