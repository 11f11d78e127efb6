//! Qualitative evaluation graphs CLI.
//!
//! Renders the detection-accuracy grids for every configured event type.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use env_logger::Env;

use streameval::analysis::render_qualitative_graphs;
use streameval::config::EvaluationConfig;

/// Render qualitative detection-accuracy grids per event type
#[derive(Parser, Debug)]
#[command(name = "qualitative-graphs")]
#[command(version, about)]
struct Args {
    /// Directory containing the <eventType>Stats.csv files; grids are
    /// written next to them
    #[arg(short, long, default_value = "qualitativeEvalStats")]
    stats_dir: PathBuf,

    /// Optional YAML configuration overriding the built-in event types and
    /// grid labels
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = EvaluationConfig::load_or_default(args.config.as_deref())?;
    render_qualitative_graphs(&config, &args.stats_dir)
}
