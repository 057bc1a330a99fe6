//! Table preprocessing: value repair, renames, projection and merging.
//!
//! Every function takes a table by value or reference and returns a new one;
//! nothing is mutated behind the caller's back. Schema problems surface as
//! [`PipelineError::Schema`](crate::error::PipelineError::Schema) at the
//! call that needs the column, never later.

mod columns;
mod merge;

pub(crate) use columns::missing_columns;
pub use columns::{rename_columns, replace_value, select_columns};
pub use merge::{LEFT_SUFFIX, MergeReport, RIGHT_SUFFIX, merge, merge_with_report};
