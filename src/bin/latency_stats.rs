//! Latency statistics CLI.
//!
//! Summarizes per-stream latency CSVs into a statistics table and CDF
//! charts.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use env_logger::Env;

use streameval::analysis::summarize_latencies;
use streameval::config::EvaluationConfig;

/// Summarize per-stream latency measurements into statistics and CDF charts
#[derive(Parser, Debug)]
#[command(name = "latency-stats")]
#[command(version, about)]
struct Args {
    /// Directory containing the <stream>Latencies.csv input files
    #[arg(short, long, default_value = "latencies")]
    input_dir: PathBuf,

    /// Output directory for the summary CSV and charts
    #[arg(short, long, default_value = "stats")]
    output_dir: PathBuf,

    /// Optional YAML configuration overriding the built-in entity tables
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = EvaluationConfig::load_or_default(args.config.as_deref())?;
    summarize_latencies(&config, &args.input_dir, &args.output_dir)
}
