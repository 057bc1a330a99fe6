//! Inner join on shared keys.
//!
//! Output rows follow the left table's order; for a left row with several
//! matches, the right table's order decides. Non-key columns present on both
//! sides are kept twice, suffixed [`LEFT_SUFFIX`] and [`RIGHT_SUFFIX`].

use super::columns::missing_columns;
use crate::error::{PipelineError, Result};
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const LEFT_SUFFIX: &str = "_x";
pub const RIGHT_SUFFIX: &str = "_y";

const LEFT_ROW: &str = "__left_row";
const RIGHT_ROW: &str = "__right_row";

/// Row and key coverage of one merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MergeReport {
    /// Label of the merge in the run summary.
    pub step: String,
    pub left_rows: usize,
    pub right_rows: usize,
    pub output_rows: usize,
    /// Distinct key tuples on each side.
    pub left_keys: usize,
    pub right_keys: usize,
    /// Distinct key tuples present on both sides.
    pub matched_keys: usize,
}

impl MergeReport {
    /// Key tuples of the left table with no partner on the right.
    pub fn left_dropped_keys(&self) -> usize {
        self.left_keys - self.matched_keys
    }

    pub fn right_dropped_keys(&self) -> usize {
        self.right_keys - self.matched_keys
    }

    /// Whether any key tuple was lost on either side.
    pub fn lost_coverage(&self) -> bool {
        self.left_dropped_keys() > 0 || self.right_dropped_keys() > 0
    }

    /// Label the report.
    pub fn with_step(mut self, step: impl Into<String>) -> Self {
        self.step = step.into();
        self
    }
}

/// Inner-join `left` and `right` on `keys`.
pub fn merge(left: &DataFrame, right: &DataFrame, keys: &[&str]) -> Result<DataFrame> {
    merge_with_report(left, right, keys).map(|(df, _)| df)
}

/// Inner-join `left` and `right` on `keys`, reporting coverage.
///
/// Duplicate key tuples produce every pairing. Keys whose column types differ
/// between the two sides are compared as text.
pub fn merge_with_report(
    left: &DataFrame,
    right: &DataFrame,
    keys: &[&str],
) -> Result<(DataFrame, MergeReport)> {
    if keys.is_empty() {
        return Err(PipelineError::InvalidConfig(
            "Merge requires at least one key".to_string(),
        ));
    }

    let mut missing = missing_columns(left, keys);
    for name in missing_columns(right, keys) {
        if !missing.contains(&name) {
            missing.push(name);
        }
    }
    if !missing.is_empty() {
        return Err(PipelineError::Schema { missing });
    }

    let mut left = left.clone();
    let mut right = right.clone();
    align_key_types(&mut left, &mut right, keys)?;
    suffix_overlapping(&mut left, &mut right, keys)?;

    let left_keys = distinct_keys(&left, keys)?;
    let right_keys = distinct_keys(&right, keys)?;

    let on: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
    let joined = left
        .with_row_index(LEFT_ROW.into(), None)?
        .lazy()
        .join(
            right.with_row_index(RIGHT_ROW.into(), None)?.lazy(),
            on.clone(),
            on,
            JoinArgs::new(JoinType::Inner),
        )
        .sort_by_exprs(
            vec![col(LEFT_ROW), col(RIGHT_ROW)],
            SortMultipleOptions::default(),
        )
        .collect()?
        .drop_many([LEFT_ROW, RIGHT_ROW]);

    let report = MergeReport {
        step: keys.join("+"),
        left_rows: left.height(),
        right_rows: right.height(),
        output_rows: joined.height(),
        left_keys,
        right_keys,
        matched_keys: distinct_keys(&joined, keys)?,
    };

    debug!(
        "Merged {} x {} rows on [{}] into {} rows",
        report.left_rows,
        report.right_rows,
        keys.join(", "),
        report.output_rows
    );
    if report.lost_coverage() {
        warn!(
            "Merge on [{}] dropped {} left and {} right key(s) without a partner",
            keys.join(", "),
            report.left_dropped_keys(),
            report.right_dropped_keys()
        );
    }

    Ok((joined, report))
}

fn align_key_types(left: &mut DataFrame, right: &mut DataFrame, keys: &[&str]) -> Result<()> {
    for key in keys {
        let left_type = left.column(key)?.dtype().clone();
        let right_type = right.column(key)?.dtype().clone();
        if left_type == right_type {
            continue;
        }
        let target = if is_numeric_dtype(&left_type) && is_numeric_dtype(&right_type) {
            if all_whole(left.column(key)?)? && all_whole(right.column(key)?)? {
                DataType::Int64
            } else {
                DataType::Float64
            }
        } else {
            DataType::String
        };
        debug!(
            "Key '{}' is {} on the left and {} on the right, comparing as {}",
            key, left_type, right_type, target
        );
        for df in [&mut *left, &mut *right] {
            let aligned = df.column(key)?.as_materialized_series().cast(&target)?;
            df.replace(key, aligned)?;
        }
    }
    Ok(())
}

/// Whether every value of a numeric key fits an `Int64` without loss.
fn all_whole(column: &Column) -> Result<bool> {
    let values = column.as_materialized_series().cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().flatten().all(|x| {
        x.is_finite() && x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64
    }))
}

fn suffix_overlapping(left: &mut DataFrame, right: &mut DataFrame, keys: &[&str]) -> Result<()> {
    let right_names: Vec<String> = right
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let shared: Vec<String> = left
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .filter(|name| !keys.contains(&name.as_str()) && right_names.contains(name))
        .collect();

    for name in &shared {
        left.rename(name, format!("{name}{LEFT_SUFFIX}").into())?;
        right.rename(name, format!("{name}{RIGHT_SUFFIX}").into())?;
    }
    Ok(())
}

fn distinct_keys(df: &DataFrame, keys: &[&str]) -> Result<usize> {
    Ok(df
        .select(keys.iter().copied())?
        .unique::<&str, &str>(None, UniqueKeepStrategy::First, None)?
        .height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(df: &DataFrame) -> Vec<String> {
        df.get_column_names().iter().map(|s| s.to_string()).collect()
    }

    fn pesticides() -> DataFrame {
        df!(
            "Country" => ["Kenya", "Kenya", "Peru"],
            "Year" => [2000i64, 2001, 2000],
            "Item" => ["Pesticides (total)", "Pesticides (total)", "Pesticides (total)"],
            "Value" => [120.0f64, 130.0, 55.0]
        )
        .unwrap()
    }

    fn yields() -> DataFrame {
        df!(
            "Country" => ["Kenya", "Kenya", "Kenya", "Chad"],
            "Year" => [2001i64, 2000, 2000, 2000],
            "Item" => ["Maize", "Maize", "Wheat", "Sorghum"],
            "Value" => [16000i64, 15000, 21000, 9000]
        )
        .unwrap()
    }

    #[test]
    fn test_overlapping_columns_are_suffixed() {
        let out = merge(&pesticides(), &yields(), &["Country", "Year"]).unwrap();
        assert_eq!(
            names(&out),
            vec!["Country", "Year", "Item_x", "Value_x", "Item_y", "Value_y"]
        );
    }

    #[test]
    fn test_left_order_then_right_order() {
        let out = merge(&pesticides(), &yields(), &["Country", "Year"]).unwrap();
        let years: Vec<Option<i64>> = out.column("Year").unwrap().i64().unwrap().into_iter().collect();
        let crops: Vec<Option<&str>> = out.column("Item_y").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(years, vec![Some(2000), Some(2000), Some(2001)]);
        assert_eq!(crops, vec![Some("Maize"), Some("Wheat"), Some("Maize")]);
    }

    #[test]
    fn test_report_counts_lost_keys() {
        let (out, report) = merge_with_report(&pesticides(), &yields(), &["Country", "Year"]).unwrap();
        assert_eq!(out.height(), 3);
        assert_eq!(report.left_rows, 3);
        assert_eq!(report.right_rows, 4);
        assert_eq!(report.output_rows, 3);
        assert_eq!(report.matched_keys, 2);
        assert_eq!(report.left_dropped_keys(), 1);
        assert_eq!(report.right_dropped_keys(), 1);
        assert!(report.lost_coverage());
    }

    #[test]
    fn test_duplicate_keys_pair_every_row() {
        let left = df!("k" => ["a", "a"], "l" => [1i64, 2]).unwrap();
        let right = df!("k" => ["a", "a", "a"], "r" => [10i64, 20, 30]).unwrap();
        let out = merge(&left, &right, &["k"]).unwrap();
        assert_eq!(out.height(), 6);
        let r: Vec<Option<i64>> = out.column("r").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(
            r,
            vec![Some(10), Some(20), Some(30), Some(10), Some(20), Some(30)]
        );
    }

    #[test]
    fn test_no_common_keys_gives_empty_table() {
        let left = df!("k" => ["a"], "v" => [1i64]).unwrap();
        let right = df!("k" => ["b"], "v" => [2i64]).unwrap();
        let out = merge(&left, &right, &["k"]).unwrap();
        assert_eq!(out.height(), 0);
        assert_eq!(names(&out), vec!["k", "v_x", "v_y"]);
    }

    #[test]
    fn test_mismatched_key_types_compare_as_text() {
        let left = df!("Year" => [2000i64, 2001], "a" => [1i64, 2]).unwrap();
        let right = df!("Year" => ["2001", "1999"], "b" => [3i64, 4]).unwrap();
        let out = merge(&left, &right, &["Year"]).unwrap();
        assert_eq!(out.height(), 1);
        assert_eq!(out.column("a").unwrap().i64().unwrap().get(0), Some(2));
    }

    #[test]
    fn test_integer_and_float_keys_compare_by_value() {
        let left = df!("Country" => ["Kenya"], "Year" => [2000i64], "a" => [1i64]).unwrap();
        let right = df!("Country" => ["Kenya"], "Year" => [2000.0f64], "b" => [2i64]).unwrap();
        let out = merge(&left, &right, &["Country", "Year"]).unwrap();
        assert_eq!(out.height(), 1);
        assert_eq!(out.column("Year").unwrap().dtype(), &DataType::Int64);
        assert_eq!(out.column("b").unwrap().i64().unwrap().get(0), Some(2));
    }

    #[test]
    fn test_fractional_float_keys_compare_as_float() {
        let left = df!("k" => [1i32, 2], "a" => [1i64, 2]).unwrap();
        let right = df!("k" => [2.0f64, 2.5], "b" => [3i64, 4]).unwrap();
        let out = merge(&left, &right, &["k"]).unwrap();
        assert_eq!(out.height(), 1);
        assert_eq!(out.column("k").unwrap().dtype(), &DataType::Float64);
        assert_eq!(out.column("a").unwrap().i64().unwrap().get(0), Some(2));
    }

    #[test]
    fn test_missing_key_is_schema_error() {
        let left = df!("Country" => ["Kenya"]).unwrap();
        let right = df!("country" => ["Kenya"], "Year" => [2000i64]).unwrap();
        match merge(&left, &right, &["Country", "Year"]).unwrap_err() {
            PipelineError::Schema { missing } => {
                assert_eq!(missing, vec!["Year".to_string(), "Country".to_string()])
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
