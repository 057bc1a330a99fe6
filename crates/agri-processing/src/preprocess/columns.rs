//! Column-level operations.

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use tracing::debug;

/// Names of `columns` that `df` lacks, in request order.
pub(crate) fn missing_columns<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Vec<String> {
    let present = df.get_column_names();
    columns
        .iter()
        .map(AsRef::as_ref)
        .filter(|c| !present.iter().any(|p| p.as_str() == *c))
        .map(str::to_string)
        .collect()
}

/// Replace every cell of `column` exactly equal to `old` with `new`.
///
/// Non-text columns cannot hold `old` and are returned unchanged.
pub fn replace_value(mut df: DataFrame, column: &str, old: &str, new: &str) -> Result<DataFrame> {
    let series = df
        .column(column)
        .map_err(|_| PipelineError::missing_column(column))?
        .as_materialized_series()
        .clone();

    if series.dtype() != &DataType::String {
        debug!("Column '{}' is {}, skipping replacement", column, series.dtype());
        return Ok(df);
    }

    let mut replaced = 0usize;
    let values: Vec<Option<&str>> = series
        .str()?
        .into_iter()
        .map(|opt| {
            opt.map(|v| {
                if v == old {
                    replaced += 1;
                    new
                } else {
                    v
                }
            })
        })
        .collect();

    if replaced > 0 {
        debug!("Replaced {} occurrence(s) of {:?} in '{}'", replaced, old, column);
        df.replace(column, Series::new(column.into(), values))?;
    }
    Ok(df)
}

/// Rename columns by a `from -> to` mapping.
///
/// Mapping entries whose source column is absent are ignored and unmapped
/// columns pass through unchanged. Renaming onto an existing column is a
/// [`PipelineError::ColumnConflict`].
pub fn rename_columns(mut df: DataFrame, mapping: &[(&str, &str)]) -> Result<DataFrame> {
    for (from, to) in mapping {
        if from == to || df.column(from).is_err() {
            continue;
        }
        if df.column(to).is_ok() {
            return Err(PipelineError::ColumnConflict {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        df.rename(from, (*to).into())?;
    }
    Ok(df)
}

/// Project onto exactly `columns`, in that order.
///
/// Fails with every missing name listed if any column is absent.
pub fn select_columns<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<DataFrame> {
    let missing = missing_columns(df, columns);
    if !missing.is_empty() {
        return Err(PipelineError::Schema { missing });
    }
    Ok(df.select(columns.iter().map(|c| c.as_ref()))?)
}
