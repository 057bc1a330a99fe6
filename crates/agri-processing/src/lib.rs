//! Agricultural Data Pipeline Library
//!
//! Joins country/year rainfall, temperature, pesticide and crop-yield
//! sources into one table, trains a random-forest yield model on it and
//! writes audience-specific reports.
//!
//! # Overview
//!
//! - **Reading**: delimiter and encoding aware CSV loading, plus a reshaping
//!   pass for the malformed rainfall file
//! - **Merging**: inner joins on `(Country, Year)` with per-merge coverage
//!   reports
//! - **Transforming**: column selection and renaming, continent lookup and
//!   placeholder coercion
//! - **Modelling**: a seeded random forest from [`agri_learning`]
//! - **Reporting**: JSON chart specifications and CSV summaries for analysts
//!   and plant breeders
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use agri_processing::{Audience, Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::builder()
//!     .data_root("/srv/agri")
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run(Some(Audience::Breeder))?;
//!
//! println!("{} rows, R² = {:.3}", result.table.height(), result.model.score);
//! ```
//!
//! # Preparing without training
//!
//! [`Pipeline::prepare`] stops after the final table is built, which is
//! useful for inspecting merge coverage:
//!
//! ```rust,ignore
//! let prepared = pipeline.prepare()?;
//! for merge in &prepared.merges {
//!     println!("{}: {} -> {} rows", merge.step, merge.left_rows, merge.output_rows);
//! }
//! ```
//!
//! # Error Handling
//!
//! Every fallible operation returns [`PipelineResultAlias`]; errors carry a
//! stable code from [`PipelineError::error_code`].

pub mod config;
pub mod error;
pub mod geo;
pub mod pipeline;
pub mod preprocess;
pub mod reader;
pub mod reporting;
pub mod transform;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, PipelineConfig, PipelineConfigBuilder, TextEncoding};
pub use error::{PipelineError, Result as PipelineResultAlias, ResultExt};
pub use geo::{Continent, ContinentResolver, CountryCatalog, default_resolver};
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, PipelineResult, PipelineStage,
    PreparedDataset, ProgressReporter, ProgressUpdate, SourceRows,
};
pub use preprocess::{MergeReport, merge, merge_with_report, rename_columns, replace_value, select_columns};
pub use reader::{NormalizeStats, normalize_rain_file, read_csv, read_csv_with_delimiter, read_csv_with_encoding};
pub use reporting::{Audience, ChartKind, ChartSpec, ReportGenerator};
pub use transform::{map_continent, replace_column_data, unresolved_countries};
pub use types::RunSummary;

static_assertions::assert_impl_all!(PipelineError: Send, Sync);
