//! Samza metrics fetch CLI.
//!
//! Queries the metrics endpoint for the container metrics of every Samza
//! job and writes the joined summary CSV.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use env_logger::Env;

use streameval::analysis::fetch_samza_metrics;
use streameval::config::EvaluationConfig;

/// Fetch Samza container metrics from the metrics-query endpoint
#[derive(Parser, Debug)]
#[command(name = "fetch-samza-metrics")]
#[command(version, about)]
struct Args {
    /// Output directory for samzaMetrics.csv
    #[arg(short, long, default_value = "stats")]
    output_dir: PathBuf,

    /// Metrics endpoint host, overriding the configured one
    #[arg(long)]
    host: Option<String>,

    /// PromQL range literal for the query window, e.g. 45m
    #[arg(long)]
    time_window: Option<String>,

    /// Optional YAML configuration overriding the built-in endpoint settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = EvaluationConfig::load_or_default(args.config.as_deref())?;
    let mut endpoint = config.metrics;
    if let Some(host) = args.host {
        endpoint.host = host;
    }
    if let Some(time_window) = args.time_window {
        endpoint.time_window = time_window;
    }

    fetch_samza_metrics(&endpoint, &args.output_dir)
}
