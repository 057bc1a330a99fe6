use super::Audience;
use super::chart::{ChartKind, ChartSpec};
use super::model_plot::{
    ACTUAL_VS_PREDICTED_CHART, FEATURE_IMPORTANCE_CHART, actual_vs_predicted_chart,
    feature_importance_chart,
};
use super::stats::{CorrelationMatrix, correlation_matrix, describe};
use crate::error::{PipelineError, Result, ResultExt};
use crate::preprocess::missing_columns;
use crate::types::{
    AVERAGE_RAIN_FALL, CONTINENT, COUNTRY, CROP_TYPES, NUMERIC_COLUMNS, PEST_VALUE, YEAR,
    YIELD_VALUE,
};
use agri_learning::ModelResults;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const YIELD_TREND_CHART: &str = "yield_trend_plot";
pub const AVERAGE_YIELD_PER_CROP_CHART: &str = "average_yield_per_crop_plot";
pub const DESCRIPTIVES_FILE: &str = "descriptives.csv";
pub const RAINFALL_VS_YIELD_CHART: &str = "rainfall_vs_yield_overyears";
pub const PESTICIDE_VS_YIELD_CHART: &str = "pesticide_vs_yield_overyears";
pub const YIELD_VS_CONTINENT_CHART: &str = "yield_vs_continent";
pub const CORRELATION_CHART: &str = "correlation_matrix";

/// File stems written for an audience, in generation order.
pub fn chart_names(audience: Audience) -> Vec<&'static str> {
    let mut names = vec![YIELD_TREND_CHART, AVERAGE_YIELD_PER_CROP_CHART];
    if audience.includes_descriptives() {
        names.push(DESCRIPTIVES_FILE);
    }
    names.extend([
        RAINFALL_VS_YIELD_CHART,
        PESTICIDE_VS_YIELD_CHART,
        YIELD_VS_CONTINENT_CHART,
        CORRELATION_CHART,
    ]);
    names
}

/// Writes report charts and tables for the final agricultural table.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the report for `audience`, returning the files written.
    pub fn generate(&self, df: &DataFrame, audience: Audience) -> Result<Vec<PathBuf>> {
        match audience {
            Audience::Analyst => info!("Generating report for Analysts..."),
            Audience::Breeder => info!("Generating detailed report for Plant Breeders..."),
        }

        let mut written = vec![
            Self::yield_trend(df)?.write_to(&self.output_dir)?,
            Self::average_yield_per_crop(df)?.write_to(&self.output_dir)?,
        ];
        if audience.includes_descriptives() {
            written.push(self.write_descriptives(df)?);
        }
        written.push(Self::rainfall_vs_yield(df)?.write_to(&self.output_dir)?);
        written.push(Self::pesticide_vs_yield(df)?.write_to(&self.output_dir)?);
        written.push(Self::yield_vs_continent(df)?.write_to(&self.output_dir)?);

        let matrix = Self::correlations(df)?;
        written.push(Self::correlation_chart(&matrix)?.write_to(&self.output_dir)?);

        info!("{} report: {} file(s) in {}", audience, written.len(), self.output_dir.display());
        Ok(written)
    }

    /// Write the report selected by free-text `user_type`.
    ///
    /// Text other than `analyst` or `breeder` writes nothing.
    pub fn generate_for(&self, df: &DataFrame, user_type: &str) -> Result<Vec<PathBuf>> {
        match user_type.parse::<Audience>() {
            Ok(audience) => self.generate(df, audience),
            Err(_) => {
                info!("No report for user type {:?}", user_type);
                Ok(Vec::new())
            }
        }
    }

    /// Write the feature importance and actual vs predicted charts.
    pub fn generate_model_plots(&self, results: &ModelResults) -> Result<Vec<PathBuf>> {
        debug!(
            "Plotting {} and {}",
            FEATURE_IMPORTANCE_CHART, ACTUAL_VS_PREDICTED_CHART
        );
        Ok(vec![
            feature_importance_chart(results)?.write_to(&self.output_dir)?,
            actual_vs_predicted_chart(results)?.write_to(&self.output_dir)?,
        ])
    }

    /// Mean yield per year and crop, one line per crop.
    pub fn yield_trend(df: &DataFrame) -> Result<ChartSpec> {
        let grouped = mean_by(df, &[YEAR, CROP_TYPES], &[YIELD_VALUE])?;
        Ok(ChartSpec::from_frame(
            YIELD_TREND_CHART,
            ChartKind::Line,
            "Average Yield Values Over Time",
            YEAR,
            YIELD_VALUE,
            &grouped,
        )?
        .with_color(CROP_TYPES))
    }

    /// Per-crop means of yield, pesticide use and rainfall, plotted as yield bars.
    pub fn average_yield_per_crop(df: &DataFrame) -> Result<ChartSpec> {
        let grouped = mean_by(df, &[CROP_TYPES], &[YIELD_VALUE, PEST_VALUE, AVERAGE_RAIN_FALL])?;
        ChartSpec::from_frame(
            AVERAGE_YIELD_PER_CROP_CHART,
            ChartKind::Bar,
            "Average Yield per Crop",
            CROP_TYPES,
            YIELD_VALUE,
            &grouped,
        )
    }

    pub fn rainfall_vs_yield(df: &DataFrame) -> Result<ChartSpec> {
        let grouped = mean_by(df, &[YEAR], &[AVERAGE_RAIN_FALL, YIELD_VALUE])?;
        Ok(ChartSpec::from_frame(
            RAINFALL_VS_YIELD_CHART,
            ChartKind::Scatter,
            "Rainfall vs Yield Over Years",
            YEAR,
            YIELD_VALUE,
            &grouped,
        )?
        .with_color(AVERAGE_RAIN_FALL)
        .with_hover(YEAR))
    }

    pub fn pesticide_vs_yield(df: &DataFrame) -> Result<ChartSpec> {
        let grouped = mean_by(df, &[YEAR], &[PEST_VALUE, YIELD_VALUE])?;
        Ok(ChartSpec::from_frame(
            PESTICIDE_VS_YIELD_CHART,
            ChartKind::Scatter,
            "Pesticide Use vs Yield Over Years",
            YEAR,
            YIELD_VALUE,
            &grouped,
        )?
        .with_color(PEST_VALUE)
        .with_hover(YEAR))
    }

    /// Every row's yield by crop, coloured by continent.
    pub fn yield_vs_continent(df: &DataFrame) -> Result<ChartSpec> {
        let columns = [CROP_TYPES, YIELD_VALUE, CONTINENT, COUNTRY];
        require(df, &columns)?;
        let points = df.select(columns)?;
        Ok(ChartSpec::from_frame(
            YIELD_VS_CONTINENT_CHART,
            ChartKind::Scatter,
            "Yield vs Crop types within different continent",
            CROP_TYPES,
            YIELD_VALUE,
            &points,
        )?
        .with_color(CONTINENT)
        .with_hover(COUNTRY))
    }

    /// Pearson correlation of the per-country means of the numeric columns.
    pub fn correlations(df: &DataFrame) -> Result<CorrelationMatrix> {
        let by_country = mean_by(df, &[COUNTRY], &NUMERIC_COLUMNS)?;
        correlation_matrix(&by_country, &NUMERIC_COLUMNS)
    }

    /// Heatmap of a correlation matrix in long form.
    pub fn correlation_chart(matrix: &CorrelationMatrix) -> Result<ChartSpec> {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        let mut values = Vec::new();
        for (i, row) in matrix.columns.iter().enumerate() {
            for (j, column) in matrix.columns.iter().enumerate() {
                xs.push(column.clone());
                ys.push(row.clone());
                values.push(matrix.values[i][j]);
            }
        }
        let long = df!("x" => xs, "y" => ys, "correlation" => values)?;
        Ok(ChartSpec::from_frame(
            CORRELATION_CHART,
            ChartKind::Heatmap,
            "Correlation Matrix",
            "x",
            "y",
            &long,
        )?
        .with_color("correlation"))
    }

    /// Write `descriptives.csv` with [`describe`] of the table.
    pub fn write_descriptives(&self, df: &DataFrame) -> Result<PathBuf> {
        let mut stats = describe(df)?;
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(DESCRIPTIVES_FILE);
        let mut file = File::create(&path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut stats)
            .context(format!("Failed to write {}", path.display()))?;
        info!("Descriptive statistics saved: {}", path.display());
        Ok(path)
    }
}

fn require(df: &DataFrame, columns: &[&str]) -> Result<()> {
    let missing = missing_columns(df, columns);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::Schema { missing })
    }
}

/// Mean of `values` per distinct `keys`, sorted by the keys.
fn mean_by(df: &DataFrame, keys: &[&str], values: &[&str]) -> Result<DataFrame> {
    let all: Vec<&str> = keys.iter().chain(values).copied().collect();
    require(df, &all)?;

    let by: Vec<Expr> = keys.iter().map(|k| col(*k)).collect();
    let aggs: Vec<Expr> = values
        .iter()
        .map(|v| col(*v).cast(DataType::Float64).mean())
        .collect();
    Ok(df
        .clone()
        .lazy()
        .group_by(by.clone())
        .agg(aggs)
        .sort_by_exprs(by, SortMultipleOptions::default())
        .collect()?)
}
