//! Per-stream latency summaries and CDF charts.
//!
//! For every configured output stream, reads `<stream>Latencies.csv`,
//! computes the fixed statistic set over the `latencyInMs` column, appends
//! one row to `latencyStats.csv`, and renders a per-stream CDF chart plus a
//! combined chart overlaying every stream.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{eyre, Context, Result};

use crate::chart::{LineChart, Series};
use crate::config::EvaluationConfig;
use crate::ingest::CsvTable;
use crate::stats::{Ecdf, SummaryStats};

pub const LATENCY_STATS_FILE: &str = "latencyStats.csv";
const LATENCY_COLUMN: &str = "latencyInMs";

/// Runs the latency summary pipeline.
pub fn summarize_latencies(
    config: &EvaluationConfig,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let stats_path = output_dir.join(LATENCY_STATS_FILE);
    let mut writer = csv::Writer::from_path(&stats_path)
        .with_context(|| format!("failed to open {}", stats_path.display()))?;
    writer.write_record([
        "streamName",
        "mean",
        "std",
        "var",
        "median",
        "90thPercentile",
        "99thPercentile",
    ])?;

    let mut combined: Vec<Series> = Vec::new();
    let mut max_p99 = 0.0f64;

    for stream in &config.streams {
        let input_path = input_dir.join(format!("{}Latencies.csv", stream.name));
        let table = CsvTable::from_path(&input_path)?;
        let latencies = table.numeric_column(LATENCY_COLUMN)?;

        let stats = SummaryStats::from_samples(&latencies).ok_or_else(|| {
            eyre!(
                "no latency samples for stream {} in {}",
                stream.name,
                input_path.display()
            )
        })?;
        writer.write_record([
            stream.name.as_str(),
            &stats.mean.to_string(),
            &stats.std_dev.to_string(),
            &stats.variance.to_string(),
            &stats.median.to_string(),
            &stats.p90.to_string(),
            &stats.p99.to_string(),
        ])?;

        let ecdf = Ecdf::from_samples(&latencies).ok_or_else(|| {
            eyre!(
                "no latency samples for stream {} in {}",
                stream.name,
                input_path.display()
            )
        })?;
        let series = Series {
            name: stream.name.clone(),
            color: stream.color.clone(),
            points: ecdf.points(),
        };

        cdf_chart(vec![series.clone()], stats.p99, false)
            .save(&output_dir.join(format!("{}LatencyCDF.svg", stream.name)))?;

        combined.push(series);
        max_p99 = max_p99.max(stats.p99);
        log::info!("Summarized {} latency samples for {}", latencies.len(), stream.name);
    }

    writer
        .flush()
        .with_context(|| format!("failed to write {}", stats_path.display()))?;
    log::info!("Wrote {}", stats_path.display());

    cdf_chart(combined, max_p99, true).save(&output_dir.join("AllLatencyCDFs.svg"))?;

    Ok(())
}

fn cdf_chart(series: Vec<Series>, x_max: f64, legend: bool) -> LineChart {
    LineChart {
        x_label: "Latency in ms".to_string(),
        y_label: "P(Latency <= x)".to_string(),
        x_range: (0.0, x_max),
        y_range: Some((0.0, 1.0)),
        x_ticks: None,
        legend,
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EntityStyle;
    use std::io::Write;
    use tempfile::TempDir;

    fn test_config(streams: &[(&str, &str)]) -> EvaluationConfig {
        EvaluationConfig {
            streams: streams
                .iter()
                .map(|(name, color)| EntityStyle {
                    name: name.to_string(),
                    color: color.to_string(),
                })
                .collect(),
            ..EvaluationConfig::default()
        }
    }

    fn write_latencies(dir: &Path, stream: &str, values: &[f64]) {
        let mut file = fs::File::create(dir.join(format!("{stream}Latencies.csv"))).unwrap();
        writeln!(file, "streamName,latencyInMs").unwrap();
        for value in values {
            writeln!(file, "{stream},{value}").unwrap();
        }
    }

    #[test]
    fn test_summary_csv_and_charts() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        write_latencies(input.path(), "kickEvent", &values);

        let config = test_config(&[("kickEvent", "#2CA02C")]);
        summarize_latencies(&config, input.path(), output.path()).unwrap();

        let stats = fs::read_to_string(output.path().join(LATENCY_STATS_FILE)).unwrap();
        let mut lines = stats.lines();
        assert_eq!(
            lines.next().unwrap(),
            "streamName,mean,std,var,median,90thPercentile,99thPercentile"
        );
        let row: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(row[0], "kickEvent");
        assert_eq!(row[1], "5.5");
        assert_eq!(row[3], "8.25");
        assert_eq!(row[4], "5.5");
        assert_eq!(row[5], "9.1");
        assert_eq!(row[6], "9.91");

        assert!(output.path().join("kickEventLatencyCDF.svg").exists());
        assert!(output.path().join("AllLatencyCDFs.svg").exists());
    }

    #[test]
    fn test_missing_input_file_fails() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let config = test_config(&[("kickEvent", "#2CA02C")]);
        assert!(summarize_latencies(&config, input.path(), output.path()).is_err());
    }

    #[test]
    fn test_empty_series_fails_with_stream_name() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_latencies(input.path(), "kickEvent", &[]);
        let config = test_config(&[("kickEvent", "#2CA02C")]);
        let err = summarize_latencies(&config, input.path(), output.path()).unwrap_err();
        assert!(err.to_string().contains("kickEvent"));
    }
}
