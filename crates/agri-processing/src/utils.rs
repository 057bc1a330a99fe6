//! Shared helpers for reading values out of tables.

use crate::error::{PipelineError, Result};
use polars::prelude::*;
use serde_json::Value;

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
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

/// Column names as owned strings, in table order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Non-null values of a numeric column as `f64`.
pub fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    let series = df
        .column(column)
        .map_err(|_| PipelineError::missing_column(column))?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().flatten().collect())
}

/// Row-major JSON view of a table.
///
/// Numeric columns become JSON numbers (NaN as null), everything else text.
pub fn frame_rows(df: &DataFrame) -> Result<Vec<Vec<Value>>> {
    let mut columns: Vec<Vec<Value>> = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let series = column.as_materialized_series();
        let values: Vec<Value> = if is_numeric_dtype(series.dtype()) {
            series
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .map(|v| v.filter(|x| x.is_finite()).map_or(Value::Null, Value::from))
                .collect()
        } else {
            series
                .cast(&DataType::String)?
                .str()?
                .into_iter()
                .map(|v| v.map_or(Value::Null, Value::from))
                .collect()
        };
        columns.push(values);
    }

    Ok((0..df.height())
        .map(|row| columns.iter().map(|c| c[row].clone()).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float32));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_numeric_values_skip_nulls() {
        let df = df!("v" => [Some(1i64), None, Some(3)]).unwrap();
        assert_eq!(numeric_values(&df, "v").unwrap(), vec![1.0, 3.0]);
        assert!(numeric_values(&df, "w").is_err());
    }

    #[test]
    fn test_frame_rows() {
        let df = df!("Year" => [2000i64, 2001], "crop" => [Some("Maize"), None]).unwrap();
        assert_eq!(
            frame_rows(&df).unwrap(),
            vec![
                vec![json!(2000.0), json!("Maize")],
                vec![json!(2001.0), Value::Null]
            ]
        );
    }
}
