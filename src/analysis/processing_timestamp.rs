//! Processing-timestamp spread across workers.
//!
//! Every worker that consumes the ball's field object state stream logs the
//! processing timestamp it observed for each stream element. Grouping those
//! measurements by (match, generation timestamp) and looking at the spread
//! per group shows how far apart in time the workers process the same
//! logical element.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use color_eyre::eyre::{bail, eyre, Context, Result};

use crate::chart::HeatmapChart;
use crate::config::EvaluationConfig;
use crate::ingest::worker_log::{scrape_worker_log, EventKey};
use crate::stats::{mean, percentile, population_variance};

pub const VARIANCES_FILE: &str = "processingTimestampVariances.csv";
pub const SUMMARY_FILE: &str = "stats.csv";

/// Runs the processing-timestamp variance pipeline.
pub fn summarize_processing_timestamps(
    config: &EvaluationConfig,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<()> {
    let mut groups: BTreeMap<EventKey, Vec<f64>> = BTreeMap::new();
    for worker in &config.variance_workers {
        let path = input_dir.join(format!("{worker}.log"));
        let matched = scrape_worker_log(&path, &mut groups)?;
        log::info!("Parsed {} ({matched} measurement lines)", path.display());
    }
    log::info!("Parsed all worker logs");

    if groups.is_empty() {
        bail!(
            "no measurement lines found in any worker log under {}",
            input_dir.display()
        );
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let mut variances = Vec::with_capacity(groups.len());
    let mut std_devs = Vec::with_capacity(groups.len());
    let mut counts = Vec::with_capacity(groups.len());
    let mut generation_timestamps = Vec::with_capacity(groups.len());

    let variances_path = output_dir.join(VARIANCES_FILE);
    let mut writer = csv::Writer::from_path(&variances_path)
        .with_context(|| format!("failed to open {}", variances_path.display()))?;
    writer.write_record(["matchId", "generationTimestamp", "var", "std", "num"])?;

    // BTreeMap iteration gives ascending key order, which for the padded key
    // rendering equals lexicographic order of the keys.
    for (key, values) in &groups {
        let variance = population_variance(values)
            .ok_or_else(|| eyre!("empty measurement group for key {key}"))?;
        let std_dev = variance.sqrt();
        writer.write_record([
            key.match_id.to_string(),
            key.generation_timestamp.to_string(),
            variance.to_string(),
            std_dev.to_string(),
            values.len().to_string(),
        ])?;

        variances.push(variance);
        std_devs.push(std_dev);
        counts.push(values.len() as f64);
        generation_timestamps.push(key.generation_timestamp as f64);
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", variances_path.display()))?;
    log::info!("Wrote {}", variances_path.display());

    let mean_var = mean(&variances).ok_or_else(|| eyre!("no measurement groups"))?;
    let mean_std = mean(&std_devs).ok_or_else(|| eyre!("no measurement groups"))?;
    let mean_num = mean(&counts).ok_or_else(|| eyre!("no measurement groups"))?;
    log::info!("Mean variance: {mean_var}");
    log::info!("Mean standard deviation: {mean_std}");
    log::info!("Mean num: {mean_num}");

    let summary_path = output_dir.join(SUMMARY_FILE);
    let mut writer = csv::Writer::from_path(&summary_path)
        .with_context(|| format!("failed to open {}", summary_path.display()))?;
    writer.write_record(["meanVar", "meanStd", "meanNum"])?;
    writer.write_record([
        mean_var.to_string(),
        mean_std.to_string(),
        mean_num.to_string(),
    ])?;
    writer
        .flush()
        .with_context(|| format!("failed to write {}", summary_path.display()))?;
    log::info!("Wrote {}", summary_path.display());

    spread_over_time_chart(
        &generation_timestamps,
        &variances,
        "Processing timestamp variance in ms",
    )?
    .save(
        &to_points(&generation_timestamps, &variances),
        &output_dir.join("processingTimestampVariancesOverTime.svg"),
    )?;
    spread_over_time_chart(
        &generation_timestamps,
        &std_devs,
        "Processing timestamp standard deviation in ms",
    )?
    .save(
        &to_points(&generation_timestamps, &std_devs),
        &output_dir.join("processingTimestampStandardDeviationsOverTime.svg"),
    )?;

    Ok(())
}

/// Density of the per-group spread over match time: x spans the observed
/// generation timestamps, y is clamped at the 99th percentile to keep
/// outlier groups from flattening the chart.
fn spread_over_time_chart(
    generation_timestamps: &[f64],
    values: &[f64],
    y_label: &str,
) -> Result<HeatmapChart> {
    let x_min = generation_timestamps
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    let x_max = generation_timestamps
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let y_max = percentile(values, 99.0).ok_or_else(|| eyre!("no spread values to chart"))?;

    Ok(HeatmapChart {
        x_label: "Match time".to_string(),
        y_label: y_label.to_string(),
        colorbar_label: "Counts in bin".to_string(),
        x_edge_labels: ("Start".to_string(), "End".to_string()),
        x_range: (x_min, x_max),
        y_range: (0.0, y_max),
        bins: (50, 50),
    })
}

fn to_points(xs: &[f64], ys: &[f64]) -> Vec<(f64, f64)> {
    xs.iter().copied().zip(ys.iter().copied()).collect()
}
