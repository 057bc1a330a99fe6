//! Descriptive statistics and correlations.

use crate::error::{PipelineError, Result};
use crate::utils::{is_numeric_dtype, numeric_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Row labels of [`describe`], in order.
pub const DESCRIBE_STATS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Linear-interpolated quantile of sorted values; `None` when empty.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

fn column_stats(mut values: Vec<f64>) -> [Option<f64>; 8] {
    let n = values.len();
    if n == 0 {
        return [Some(0.0), None, None, None, None, None, None, None];
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = (n > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });
    [
        Some(n as f64),
        Some(mean),
        std,
        values.first().copied(),
        quantile(&values, 0.25),
        quantile(&values, 0.5),
        quantile(&values, 0.75),
        values.last().copied(),
    ]
}

/// Summary statistics of every numeric column.
///
/// The first column, `statistic`, labels the rows with [`DESCRIBE_STATS`];
/// each numeric input column follows with its values. `std` is the sample
/// standard deviation and is null for fewer than two values.
pub fn describe(df: &DataFrame) -> Result<DataFrame> {
    let mut columns: Vec<Column> = vec![Column::new(
        "statistic".into(),
        DESCRIBE_STATS.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
    )];

    for column in df.get_columns() {
        if !is_numeric_dtype(column.dtype()) {
            continue;
        }
        let name = column.name().as_str();
        let stats = column_stats(numeric_values(df, name)?);
        columns.push(Column::new(name.into(), stats.to_vec()));
    }

    Ok(DataFrame::new(columns)?)
}

/// Pairwise Pearson correlations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]` correlates `columns[i]` with `columns[j]`; `None` when
    /// either side is constant or fewer than two rows are complete.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }

    /// Square table with a leading `column` label column.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut columns = vec![Column::new("column".into(), self.columns.clone())];
        for (j, name) in self.columns.iter().enumerate() {
            let values: Vec<Option<f64>> = self.values.iter().map(|row| row[j]).collect();
            columns.push(Column::new(name.as_str().into(), values));
        }
        Ok(DataFrame::new(columns)?)
    }
}

fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    let n = pairs.len();
    if n < 2 {
        return None;
    }
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Pearson correlation between each pair of `columns`, using the rows where
/// both values are present.
pub fn correlation_matrix<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<CorrelationMatrix> {
    let mut data: Vec<Vec<Option<f64>>> = Vec::with_capacity(columns.len());
    for name in columns {
        let name = name.as_ref();
        let series = df
            .column(name)
            .map_err(|_| PipelineError::missing_column(name))?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        data.push(series.f64()?.into_iter().collect());
    }

    let values = data
        .iter()
        .map(|a| {
            data.iter()
                .map(|b| {
                    let pairs: Vec<(f64, f64)> = a
                        .iter()
                        .zip(b)
                        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                        .collect();
                    pearson(&pairs)
                })
                .collect()
        })
        .collect();

    Ok(CorrelationMatrix {
        columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&v, 0.0), Some(1.0));
        assert_eq!(quantile(&v, 0.5), Some(2.5));
        assert_eq!(quantile(&v, 0.25), Some(1.75));
        assert_eq!(quantile(&v, 1.0), Some(4.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_describe_numeric_columns_only() {
        let df = df!(
            "Country" => ["A", "B", "C", "D"],
            "Year" => [2000i64, 2001, 2002, 2003],
            "yield" => [1.0f64, 2.0, 3.0, 4.0]
        )
        .unwrap();
        let out = describe(&df).unwrap();

        assert_eq!(out.height(), 8);
        let names: Vec<&str> = out.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["statistic", "Year", "yield"]);

        let y = out.column("yield").unwrap().f64().unwrap();
        assert_eq!(y.get(0), Some(4.0));
        assert_eq!(y.get(1), Some(2.5));
        assert!((y.get(2).unwrap() - 1.2909944487358056).abs() < 1e-12);
        assert_eq!(y.get(3), Some(1.0));
        assert_eq!(y.get(5), Some(2.5));
        assert_eq!(y.get(7), Some(4.0));
    }

    #[test]
    fn test_describe_single_value_has_no_std() {
        let df = df!("v" => [5i64]).unwrap();
        let out = describe(&df).unwrap();
        assert_eq!(out.column("v").unwrap().f64().unwrap().get(2), None);
    }

    #[test]
    fn test_correlation_matrix() {
        let df = df!(
            "a" => [1.0f64, 2.0, 3.0, 4.0],
            "b" => [2.0f64, 4.0, 6.0, 8.0],
            "c" => [4.0f64, 3.0, 2.0, 1.0],
            "k" => [1.0f64, 1.0, 1.0, 1.0]
        )
        .unwrap();
        let m = correlation_matrix(&df, &["a", "b", "c", "k"]).unwrap();
        assert!((m.get("a", "b").unwrap() - 1.0).abs() < 1e-12);
        assert!((m.get("a", "c").unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(m.get("a", "k"), None);
        assert_eq!(m.to_frame().unwrap().shape(), (4, 5));
    }

    #[test]
    fn test_correlation_missing_column() {
        let df = df!("a" => [1.0f64]).unwrap();
        assert!(correlation_matrix(&df, &["a", "z"]).is_err());
    }
}
