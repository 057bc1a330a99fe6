//! Pipeline orchestration: load, normalize, merge, transform, train, report.

mod builder;
mod progress;

pub use builder::{Pipeline, PipelineBuilder, PipelineResult, PreparedDataset, SourceRows};
pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
