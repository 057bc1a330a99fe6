//! CLI entry point for the agricultural data pipeline.

use agri_processing::{Audience, Pipeline, PipelineConfig, RunSummary};
use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    author = "Agri Pipeline Team",
    version,
    about = "Agricultural yield data pipeline",
    long_about = "Merges rainfall, temperature, pesticide and yield data, trains a \
                  random-forest yield model and writes reports.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  DATA_DIR    Directory containing data/ (default: current directory)\n  \
                  RUST_LOG    Overrides --log-level\n\n\
                  EXAMPLES:\n  \
                  # Prompt for the report audience\n  \
                  agri-processing --data-dir /srv/agri\n\n  \
                  # Non-interactive analyst report\n  \
                  agri-processing --audience analyst -o reports/\n\n  \
                  # Train only, print JSON summary\n  \
                  agri-processing --skip-report --json"
)]
struct Args {
    /// Directory containing the data/ folder
    ///
    /// Defaults to $DATA_DIR, then the current directory
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Output directory for charts and tables
    ///
    /// Defaults to <data-dir>/output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report audience: analyst or breeder
    ///
    /// When omitted the user type is read from stdin
    #[arg(short, long)]
    audience: Option<String>,

    /// Skip the audience report and chart output entirely
    #[arg(long)]
    skip_report: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output the run summary as JSON to stdout
    ///
    /// Disables all logs so stdout only contains the summary.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled so stdout stays parseable.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    dotenv().ok();

    let mut config_builder = PipelineConfig::builder().generate_reports(!args.skip_report);
    if let Some(ref dir) = args.data_dir {
        config_builder = config_builder.data_root(dir);
    }
    if let Some(ref output) = args.output {
        config_builder = config_builder.output_dir(output);
    }
    let config = config_builder.build()?;

    if !config.data_dir().is_dir() {
        return Err(anyhow!(
            "Data directory not found: {}",
            config.data_dir().display()
        ));
    }

    let audience = if args.skip_report {
        None
    } else {
        resolve_audience(args.audience.as_deref())?
    };

    let mut builder = Pipeline::builder().config(config);
    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }
    let pipeline = builder.build()?;

    match pipeline.run(audience) {
        Ok(result) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result.summary)?);
            } else {
                print_human_readable_summary(&result.summary);
            }
            Ok(())
        }
        Err(e) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&e)?);
            }
            error!("Pipeline failed: {}", e);
            Err(anyhow!("Pipeline failed: {}", e))
        }
    }
}

/// Audience from the flag, or from a prompt on stdin.
///
/// Text that names neither audience is not an error: the run continues
/// without the audience report.
fn resolve_audience(flag: Option<&str>) -> Result<Option<Audience>> {
    let input = match flag {
        Some(value) => value.to_string(),
        None => {
            print!("Enter user type (analyst or breeder): ");
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line
        }
    };

    let audience = Audience::from_input(&input);
    if audience.is_none() {
        warn!(
            "Unknown user type '{}', no audience report will be written",
            input.trim_end_matches(['\r', '\n'])
        );
    }
    Ok(audience)
}

/// Print a human-readable summary of the run.
fn print_human_readable_summary(summary: &RunSummary) {
    println!();
    println!("{}", "=".repeat(80));
    println!("PIPELINE COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!("Sources:");
    println!("  Rainfall:    {} rows", summary.rain_rows);
    println!("  Temperature: {} rows", summary.temperature_rows);
    println!("  Pesticides:  {} rows", summary.pesticide_rows);
    println!("  Yield:       {} rows", summary.yield_rows);
    println!();

    println!("Merges:");
    for merge in &summary.merges {
        println!(
            "  {:<40} {:>7} x {:>7} -> {:>7} rows",
            merge.step, merge.left_rows, merge.right_rows, merge.output_rows
        );
    }
    println!("Final table: {} rows", summary.final_rows);
    println!();

    if let (Some(score), Some(mse)) = (summary.model_score, summary.model_mse) {
        println!("Model:");
        println!("  R² score: {:.4}", score);
        println!("  MSE:      {:.2}", mse);
        for (feature, importance) in &summary.feature_importance {
            println!("  {:<30} {:.4}", feature, importance);
        }
        println!();
    }

    if !summary.artifacts.is_empty() {
        println!("Written ({}):", summary.audience.as_deref().unwrap_or("model only"));
        for path in &summary.artifacts {
            println!("  - {}", path.display());
        }
        println!();
    }

    if !summary.warnings.is_empty() {
        println!("Warnings:");
        for warning in &summary.warnings {
            println!("  ! {}", warning);
        }
        println!();
    }

    println!("Duration: {}ms", summary.duration_ms);
    println!("{}", "=".repeat(80));
}
