//! The agricultural pipeline and its builder.

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result, ResultExt};
use crate::geo::{ContinentResolver, default_resolver};
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::preprocess::{MergeReport, merge_with_report, rename_columns, replace_value, select_columns};
use crate::reader::{
    NormalizeStats, normalize_rain_file, read_csv, read_csv_with_delimiter, read_csv_with_encoding,
};
use crate::reporting::{Audience, ReportGenerator};
use crate::transform::{map_continent, replace_column_data, unresolved_countries};
use crate::types::{
    AVERAGE_RAIN_FALL, CONTINENT, COUNTRY, FEATURE_COLUMNS, FINAL_RENAMES, KEY_RENAMES, MERGE_KEYS,
    RunSummary, SELECTED_COLUMNS, TARGET_COLUMN,
};
use agri_learning::{RandomForestTrainer, TrainedModel};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Row counts of the four sources as loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceRows {
    pub rain: usize,
    pub temperature: usize,
    pub pesticide: usize,
    pub yields: usize,
}

/// The final agricultural table and how it was assembled.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    /// One row per country, year and crop with the final column names.
    pub table: DataFrame,
    pub source_rows: SourceRows,
    pub rain_normalization: NormalizeStats,
    /// One report per merge, in merge order.
    pub merges: Vec<MergeReport>,
    /// Distinct countries whose continent could not be resolved, sorted.
    pub unresolved_countries: Vec<String>,
    /// Rows with a null `Continent`.
    pub unresolved_rows: usize,
}

/// Everything a complete run produces.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub table: DataFrame,
    pub model: TrainedModel,
    pub summary: RunSummary,
}

struct Sources {
    rain: DataFrame,
    temperature: DataFrame,
    pesticide: DataFrame,
    yields: DataFrame,
    rain_normalization: NormalizeStats,
}

/// The agricultural data pipeline.
///
/// Use [`Pipeline::builder()`] to create one.
///
/// # Example
///
/// ```rust,ignore
/// use agri_processing::{Audience, Pipeline, PipelineConfig};
///
/// let result = Pipeline::builder()
///     .config(PipelineConfig::builder().data_root("/srv/agri").build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .run(Some(Audience::Analyst))?;
///
/// println!("R² = {:.3}", result.model.score);
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    resolver: Arc<dyn ContinentResolver>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read, normalize, merge and transform the four sources.
    pub fn prepare(&self) -> Result<PreparedDataset> {
        self.finish(self.prepare_internal(), |_| "Dataset prepared".to_string())
    }

    /// Prepare the dataset, train the yield model and write the reports.
    ///
    /// With `audience` set to `None` only the model plots are written.
    pub fn run(&self, audience: Option<Audience>) -> Result<PipelineResult> {
        self.finish(self.run_internal(audience), |result| {
            format!(
                "Pipeline completed: {} rows, R²={:.4}",
                result.table.height(),
                result.model.score
            )
        })
    }

    fn finish<T>(&self, outcome: Result<T>, message: impl FnOnce(&T) -> String) -> Result<T> {
        match outcome {
            Ok(value) => {
                self.report_progress(ProgressUpdate::complete(message(&value)));
                Ok(value)
            }
            Err(e) => {
                error!("Pipeline error: {}", e);
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self, audience: Option<Audience>) -> Result<PipelineResult> {
        let start_time = Instant::now();
        let prepared = self.prepare_internal()?;

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Training,
            0.0,
            "Training random forest...",
        ));
        info!("Training yield model on {} rows...", prepared.table.height());
        let mut trainer =
            RandomForestTrainer::new(self.config.trainer.clone(), &FEATURE_COLUMNS, TARGET_COLUMN)?;
        let model = trainer
            .train_and_evaluate(&prepared.table)
            .map_err(PipelineError::from)
            .context("Model training failed")?
            .clone();
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Training,
            1.0,
            format!("R²={:.4}, MSE={:.2}", model.score, model.mse),
        ));

        let mut summary = RunSummary::new();
        if self.config.generate_reports {
            self.report_progress(ProgressUpdate::new(
                PipelineStage::Reporting,
                0.0,
                "Writing reports...",
            ));
            let generator = ReportGenerator::new(self.config.output_dir.clone());
            if let Some(audience) = audience {
                summary.artifacts.extend(generator.generate(&prepared.table, audience)?);
                summary.audience = Some(audience.to_string());
            } else {
                info!("No audience selected, skipping report");
            }
            summary
                .artifacts
                .extend(generator.generate_model_plots(model.results())?);
            self.report_progress(ProgressUpdate::new(
                PipelineStage::Reporting,
                1.0,
                format!("Wrote {} file(s)", summary.artifacts.len()),
            ));
        } else {
            debug!("Report generation disabled");
        }

        summary.rain_rows = prepared.source_rows.rain;
        summary.temperature_rows = prepared.source_rows.temperature;
        summary.pesticide_rows = prepared.source_rows.pesticide;
        summary.yield_rows = prepared.source_rows.yields;
        summary.final_rows = prepared.table.height();
        summary.unresolved_continents = prepared.unresolved_rows;
        summary.unresolved_countries = prepared.unresolved_countries.clone();
        for merge in &prepared.merges {
            if merge.lost_coverage() {
                summary.add_warning(format!(
                    "Merge '{}' dropped {} left and {} right key(s)",
                    merge.step,
                    merge.left_dropped_keys(),
                    merge.right_dropped_keys()
                ));
            }
        }
        if prepared.rain_normalization.records_dropped > 0 {
            summary.add_warning(format!(
                "Rain normalizer dropped {} short line(s)",
                prepared.rain_normalization.records_dropped
            ));
        }
        if !prepared.unresolved_countries.is_empty() {
            summary.add_warning(format!(
                "No continent for: {}",
                prepared.unresolved_countries.join(", ")
            ));
        }
        summary.merges = prepared.merges;
        summary.model_score = Some(model.score);
        summary.model_mse = Some(model.mse);
        summary.feature_importance = model.results().feature_importance.clone();
        summary.duration_ms = start_time.elapsed().as_millis() as u64;
        summary.finished_at = Local::now().to_rfc3339();

        Ok(PipelineResult {
            table: prepared.table,
            model,
            summary,
        })
    }

    fn load_sources(&self) -> Result<Sources> {
        let config = &self.config;
        info!("Loading sources from {}", config.data_dir().display());

        self.report_loading("temperature", 0, &config.temperature_path());
        let temperature = read_csv_with_encoding(config.temperature_path(), config.temperature_encoding)?;
        self.report_loading("pesticides", 1, &config.pesticide_path());
        let pesticide = read_csv_with_delimiter(config.pesticide_path(), config.agri_delimiter)?;
        self.report_loading("yield", 2, &config.yield_path());
        let yields = read_csv_with_delimiter(config.yield_path(), config.agri_delimiter)?;
        debug!(
            "Loaded temperature={}, pesticides={}, yield={} rows",
            temperature.height(),
            pesticide.height(),
            yields.height()
        );

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Normalizing,
            0.0,
            "Normalizing rainfall file...",
        ));
        let rain_normalization =
            normalize_rain_file(&config.rain_path(), &config.normalized_rain_path())?;
        let rain = read_csv(config.normalized_rain_path())?;
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Normalizing,
            1.0,
            format!("{} rainfall records", rain_normalization.records_written),
        ));

        Ok(Sources {
            rain,
            temperature,
            pesticide,
            yields,
            rain_normalization,
        })
    }

    fn report_loading(&self, source: &str, index: usize, path: &Path) {
        self.report_progress(ProgressUpdate::with_items(
            PipelineStage::Loading,
            source,
            index,
            3,
            format!("Reading {}", path.display()),
        ));
    }

    fn prepare_internal(&self) -> Result<PreparedDataset> {
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            0.0,
            "Loading sources...",
        ));
        let sources = self.load_sources()?;
        let source_rows = SourceRows {
            rain: sources.rain.height(),
            temperature: sources.temperature.height(),
            pesticide: sources.pesticide.height(),
            yields: sources.yields.height(),
        };

        let rain = rename_columns(sources.rain, &KEY_RENAMES).context("Preparing rainfall")?;
        let mut temperature =
            rename_columns(sources.temperature, &KEY_RENAMES).context("Preparing temperature")?;
        for (old, new) in &self.config.country_fixes {
            temperature = replace_value(temperature, COUNTRY, old, new)
                .context("Repairing temperature country names")?;
        }

        let steps: [(&str, DataFrame); 3] = [
            ("rain", rain),
            ("temperature", temperature),
            ("yield", sources.yields),
        ];
        let mut merged = sources.pesticide;
        let mut merges = Vec::with_capacity(steps.len());
        let mut label = "pesticides".to_string();
        for (i, (name, right)) in steps.into_iter().enumerate() {
            label = format!("{label}+{name}");
            self.report_progress(ProgressUpdate::with_items(
                PipelineStage::Merging,
                label.clone(),
                i,
                3,
                format!("Merging {name}"),
            ));
            let (out, report) = merge_with_report(&merged, &right, &MERGE_KEYS)
                .context(format!("Merge '{label}'"))?;
            merges.push(report.with_step(label.clone()));
            merged = out;
        }
        info!("Merged table: {} rows x {} columns", merged.height(), merged.width());

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Transforming,
            0.0,
            "Selecting and transforming columns...",
        ));
        let selected = select_columns(&merged, &SELECTED_COLUMNS)?;
        let renamed = rename_columns(selected, &FINAL_RENAMES)?;
        let with_continent = map_continent(renamed, self.resolver.as_ref())?;
        let table = replace_column_data(with_continent, AVERAGE_RAIN_FALL, &self.config.placeholder)?;

        let unresolved = unresolved_countries(&table)?;
        let unresolved_rows = table.column(CONTINENT)?.null_count();
        if !unresolved.is_empty() {
            warn!("No continent for {} countries", unresolved.len());
        }
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Transforming,
            1.0,
            format!("Final table: {} rows", table.height()),
        ));

        Ok(PreparedDataset {
            table,
            source_rows,
            rain_normalization: sources.rain_normalization,
            merges,
            unresolved_countries: unresolved,
            unresolved_rows,
        })
    }
}

/// Builder for creating a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    resolver: Option<Arc<dyn ContinentResolver>>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    ///
    /// If not set, [`PipelineConfig::from_env()`] is used.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the built-in country catalog.
    pub fn resolver(mut self, resolver: Arc<dyn ContinentResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a closure for receiving progress updates.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline, validating the configuration.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.unwrap_or_else(PipelineConfig::from_env);
        config.validate()?;

        Ok(Pipeline {
            config,
            resolver: self.resolver.unwrap_or_else(default_resolver),
            progress_reporter: self.progress_reporter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Continent;
    use std::fs;
    use std::sync::Mutex;

    struct KenyaOnly;

    impl ContinentResolver for KenyaOnly {
        fn resolve_continent(&self, country: &str) -> Option<Continent> {
            (country == "Kenya").then_some(Continent::Africa)
        }
    }

    fn write_sources(root: &Path) {
        let data = root.join("data");
        fs::create_dir_all(&data).unwrap();
        fs::write(
            data.join("rain.csv"),
            "country,year,average_rain_fall_mm_per_year\nKenya,2020,630\nBolivia, Plurinational State of,2020,..\n",
        )
        .unwrap();
        fs::write(
            data.join("temperature.csv"),
            "year,country,avg_temp (°C)\n2020,Kenya,19.5\n2020,Bolivia  Plurinational State of,21.0\n",
        )
        .unwrap();
        fs::write(
            data.join("pesticides_usage.csv"),
            "Domain;Country;Element;Item;Year;Unit;Value\n\
             Pesticides Use;Kenya;Use;Pesticides (total);2020;tonnes of active ingredients;120.5\n\
             Pesticides Use;Bolivia  Plurinational State of;Use;Pesticides (total);2020;tonnes of active ingredients;80\n",
        )
        .unwrap();
        fs::write(
            data.join("yield.csv"),
            "Domain;Country;Item;Year;Unit;Value\n\
             Crops;Kenya;Maize;2020;hg/ha;16000\n\
             Crops;Bolivia  Plurinational State of;Potatoes;2020;hg/ha;55000\n",
        )
        .unwrap();
    }

    fn pipeline(root: &Path) -> Pipeline {
        let config = PipelineConfig::builder()
            .data_root(root)
            .temperature_encoding(crate::config::TextEncoding::Utf8)
            .build()
            .unwrap();
        Pipeline::builder()
            .config(config)
            .resolver(Arc::new(KenyaOnly))
            .build()
            .unwrap()
    }

    #[test]
    fn test_prepare_builds_final_table() {
        let dir = tempfile::tempdir().unwrap();
        write_sources(dir.path());
        let prepared = pipeline(dir.path()).prepare().unwrap();

        let names: Vec<String> = prepared
            .table
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "Country",
                "Year",
                "crop_types",
                "avg_temp (°C)",
                "average_rain_fall (mm/year)",
                "pest_value (tonnes)",
                "yield_value (hg/ha)",
                "Continent"
            ]
        );
        assert_eq!(prepared.table.height(), 2);
        let rain = prepared.table.column(AVERAGE_RAIN_FALL).unwrap().i64().unwrap();
        assert_eq!(rain.get(0), Some(630));
        assert_eq!(rain.get(1), Some(0));
        assert_eq!(
            prepared.unresolved_countries,
            vec!["Bolivia  Plurinational State of".to_string()]
        );
        assert_eq!(prepared.unresolved_rows, 1);
        assert_eq!(prepared.merges.len(), 3);
        assert_eq!(prepared.merges[2].step, "pesticides+rain+temperature+yield");
        assert!(dir.path().join("data/modified_rain.csv").exists());
    }

    #[test]
    fn test_missing_source_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&stages);
        let config = PipelineConfig::builder().data_root(dir.path()).build().unwrap();
        let err = Pipeline::builder()
            .config(config)
            .on_progress(move |u| sink.lock().unwrap().push(u.stage))
            .build()
            .unwrap()
            .prepare()
            .unwrap_err();

        assert_eq!(err.error_code(), "FILE_ACCESS");
        assert_eq!(stages.lock().unwrap().last(), Some(&PipelineStage::Failed));
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let mut config = PipelineConfig::default();
        config.placeholder.clear();
        let err = Pipeline::builder().config(config).build().err().unwrap();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
