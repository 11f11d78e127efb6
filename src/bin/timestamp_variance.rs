//! Processing-timestamp variance CLI.
//!
//! Scrapes the worker logs for processing-timestamp measurements and
//! summarizes the per-element spread across workers.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use env_logger::Env;

use streameval::analysis::summarize_processing_timestamps;
use streameval::config::EvaluationConfig;

/// Summarize the processing-timestamp spread across workers
#[derive(Parser, Debug)]
#[command(name = "timestamp-variance")]
#[command(version, about)]
struct Args {
    /// Directory containing the <worker>.log input files
    #[arg(short, long, default_value = "workerLogs")]
    input_dir: PathBuf,

    /// Output directory for the variance CSVs and charts
    #[arg(short, long, default_value = "processingTimestampVarianceStats")]
    output_dir: PathBuf,

    /// Optional YAML configuration overriding the built-in worker list
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = EvaluationConfig::load_or_default(args.config.as_deref())?;
    summarize_processing_timestamps(&config, &args.input_dir, &args.output_dir)
}
