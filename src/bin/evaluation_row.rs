//! Evaluation-row statistics CLI.
//!
//! Pivots the per-run summary files of an evaluation row into cross-run
//! matrices and scalability charts.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use env_logger::Env;

use streameval::analysis::build_evaluation_row;
use streameval::config::EvaluationConfig;

/// Build cross-run statistics over an evaluation row of simulation runs
#[derive(Parser, Debug)]
#[command(name = "evaluation-row")]
#[command(version, about)]
struct Args {
    /// Number of simulation runs in the evaluation row (runs 1..=N)
    max_simulations: usize,

    /// Evaluation row root containing one <run>/stats/ directory per run
    #[arg(short, long, default_value = "evaluationRowOutput")]
    root: PathBuf,

    /// Optional YAML configuration overriding the built-in entity tables
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = EvaluationConfig::load_or_default(args.config.as_deref())?;
    build_evaluation_row(&config, &args.root, args.max_simulations)
}
