use crate::error::{PipelineError, Result};
use crate::utils::{column_names, frame_rows};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    Heatmap,
}

/// A straight reference segment drawn over the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// Renderer-agnostic description of one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// File stem of the written chart.
    pub name: String,
    pub kind: ChartKind,
    pub title: String,
    /// Column plotted on the x axis.
    pub x: String,
    /// Column plotted on the y axis.
    pub y: String,
    /// Column that colours the marks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Extra columns shown on hover.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hover: Vec<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_line: Option<ReferenceLine>,
}

impl ChartSpec {
    /// Chart of a table whose columns include `x` and `y`.
    pub fn from_frame(
        name: &str,
        kind: ChartKind,
        title: &str,
        x: &str,
        y: &str,
        df: &DataFrame,
    ) -> Result<Self> {
        let columns = column_names(df);
        for axis in [x, y] {
            if !columns.iter().any(|c| c == axis) {
                return Err(PipelineError::missing_column(axis).with_context(format!(
                    "Chart '{name}'"
                )));
            }
        }
        Ok(Self {
            name: name.to_string(),
            kind,
            title: title.to_string(),
            x: x.to_string(),
            y: y.to_string(),
            color: None,
            hover: Vec::new(),
            rows: frame_rows(df)?,
            columns,
            reference_line: None,
        })
    }

    pub fn with_color(mut self, column: &str) -> Self {
        self.color = Some(column.to_string());
        self
    }

    pub fn with_hover(mut self, column: &str) -> Self {
        self.hover.push(column.to_string());
        self
    }

    pub fn with_reference_line(mut self, line: ReferenceLine) -> Self {
        self.reference_line = Some(line);
        self
    }

    /// Values of one column, in row order.
    pub fn column_values(&self, column: &str) -> Option<Vec<&Value>> {
        let idx = self.columns.iter().position(|c| c == column)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Write the chart as `<dir>/<name>.json`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.json", self.name));
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        info!("Chart saved: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use serde_json::json;

    fn frame() -> DataFrame {
        df!("Year" => [2000i64, 2001], "yield" => [1.5f64, 2.5]).unwrap()
    }

    #[test]
    fn test_from_frame_requires_axes() {
        let err = ChartSpec::from_frame("c", ChartKind::Line, "t", "Year", "rain", &frame())
            .unwrap_err();
        assert!(err.to_string().contains("rain"));
        assert_eq!(err.error_code(), "SCHEMA_ERROR");
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let chart = ChartSpec::from_frame("trend", ChartKind::Line, "Trend", "Year", "yield", &frame())
            .unwrap()
            .with_color("Year");
        let path = chart.write_to(&dir.path().join("nested")).unwrap();
        assert!(path.ends_with("nested/trend.json"));

        let back: ChartSpec = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, chart);
        assert_eq!(
            back.column_values("yield").unwrap(),
            vec![&json!(1.5), &json!(2.5)]
        );
    }
}
