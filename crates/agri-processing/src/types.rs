//! Column names and result types shared across the pipeline.

use crate::preprocess::MergeReport;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Column names
// ============================================================================

pub const COUNTRY: &str = "Country";
pub const YEAR: &str = "Year";
pub const CONTINENT: &str = "Continent";
pub const CROP_TYPES: &str = "crop_types";
pub const AVG_TEMP: &str = "avg_temp (°C)";
pub const AVERAGE_RAIN_FALL: &str = "average_rain_fall (mm/year)";
pub const PEST_VALUE: &str = "pest_value (tonnes)";
pub const YIELD_VALUE: &str = "yield_value (hg/ha)";

/// Rainfall column as it appears in the raw source.
pub const RAW_RAIN_FALL: &str = "average_rain_fall_mm_per_year";

/// Keys every source is joined on.
pub const MERGE_KEYS: [&str; 2] = [COUNTRY, YEAR];

/// Lower-case key names normalised to [`MERGE_KEYS`] before merging.
pub const KEY_RENAMES: [(&str, &str); 2] = [("country", COUNTRY), ("year", YEAR)];

/// Columns kept after the four sources are merged.
///
/// `Item_y`/`Value_y` come from the yield source and `Value_x` from the
/// pesticide source, both of which share the `Item`/`Value` layout.
pub const SELECTED_COLUMNS: [&str; 7] = [
    COUNTRY,
    YEAR,
    "Item_y",
    AVG_TEMP,
    RAW_RAIN_FALL,
    "Value_x",
    "Value_y",
];

/// Renames applied to [`SELECTED_COLUMNS`].
pub const FINAL_RENAMES: [(&str, &str); 4] = [
    ("Item_y", CROP_TYPES),
    (RAW_RAIN_FALL, AVERAGE_RAIN_FALL),
    ("Value_x", PEST_VALUE),
    ("Value_y", YIELD_VALUE),
];

/// Model inputs, in matrix column order.
pub const FEATURE_COLUMNS: [&str; 3] = [AVG_TEMP, AVERAGE_RAIN_FALL, PEST_VALUE];

/// Model target.
pub const TARGET_COLUMN: &str = YIELD_VALUE;

/// Numeric columns summarised by the reports.
pub const NUMERIC_COLUMNS: [&str; 4] = [PEST_VALUE, AVERAGE_RAIN_FALL, AVG_TEMP, YIELD_VALUE];

// ============================================================================
// Run summary
// ============================================================================

/// Serializable summary of a complete pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    /// Row counts of the four sources as loaded.
    pub rain_rows: usize,
    pub temperature_rows: usize,
    pub pesticide_rows: usize,
    pub yield_rows: usize,

    /// Rows in the final table.
    pub final_rows: usize,
    /// Rows whose country has no continent.
    pub unresolved_continents: usize,
    /// Distinct countries with no continent, sorted.
    pub unresolved_countries: Vec<String>,

    /// One entry per merge step.
    pub merges: Vec<MergeReport>,

    /// Model R² on the test partition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_score: Option<f64>,
    /// Model MSE on the test partition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_mse: Option<f64>,
    /// Importances in feature order.
    pub feature_importance: Vec<(String, f64)>,

    /// Audience the report was generated for, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    /// Every file written during the run.
    pub artifacts: Vec<PathBuf>,

    /// Non-fatal issues encountered.
    pub warnings: Vec<String>,

    /// When the run finished (RFC 3339).
    pub finished_at: String,
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            duration_ms: 0,
            rain_rows: 0,
            temperature_rows: 0,
            pesticide_rows: 0,
            yield_rows: 0,
            final_rows: 0,
            unresolved_continents: 0,
            unresolved_countries: Vec::new(),
            merges: Vec::new(),
            model_score: None,
            model_mse: None,
            feature_importance: Vec::new(),
            audience: None,
            artifacts: Vec::new(),
            warnings: Vec::new(),
            finished_at: String::new(),
        }
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}
