//! Cross-run scalability statistics.
//!
//! An evaluation row is a sequence of N simulation runs with 1..=N
//! concurrently simulated matches. Each run leaves a `stats/` directory with
//! a latency summary and a Samza metrics summary; this pipeline pivots those
//! into one (entity x run) matrix per statistic, written as a CSV and drawn
//! as a scalability chart.
//!
//! Entity identity is taken from run 1 and later runs are aligned by row
//! position, not by name. That is a known limitation carried over from the
//! established output format; a run file whose row count differs from run 1
//! fails the pipeline, which keeps every matrix cell filled without changing
//! the alignment semantics.

use std::path::Path;

use color_eyre::eyre::{bail, eyre, Context, Result};

use crate::chart::{LineChart, Series};
use crate::config::EvaluationConfig;
use crate::ingest::CsvTable;

pub const LATENCY_MEASURES: [&str; 6] = [
    "mean",
    "std",
    "var",
    "median",
    "90thPercentile",
    "99thPercentile",
];

pub const SAMZA_METRICS: [&str; 6] = [
    "avgProcessNs",
    "avgWindowNs",
    "avgProcessCallsPerSecondPerContainer",
    "avgWindowCallsPerSecondPerContainer",
    "sumProcessCallsPerSecondPerJob",
    "sumWindowCallsPerSecondPerJob",
];

/// Window-call metrics get a fixed zero-floor y window in the charts; their
/// values are small and the derived window would exaggerate noise.
const ZERO_FLOOR_METRICS: [&str; 2] = [
    "avgWindowCallsPerSecondPerContainer",
    "sumWindowCallsPerSecondPerJob",
];

fn latency_measure_label(measure: &str) -> &str {
    match measure {
        "mean" => "Mean latency in ms",
        "std" => "Latency standard deviation in ms",
        "var" => "Latency variance in ms",
        "median" => "Median latency in ms",
        "90thPercentile" => "90th percentile latency in ms",
        "99thPercentile" => "99th percentile latency in ms",
        _ => measure,
    }
}

fn samza_metric_label(metric: &str) -> &str {
    match metric {
        "avgProcessNs" => "Average duration of a process call in ns",
        "avgWindowNs" => "Average duration of a window call in ns",
        "avgProcessCallsPerSecondPerContainer" => {
            "Average number of process calls per s per container"
        }
        "avgWindowCallsPerSecondPerContainer" => {
            "Average number of window calls per s per container"
        }
        "sumProcessCallsPerSecondPerJob" => "Sum of process calls per s per job",
        "sumWindowCallsPerSecondPerJob" => "Sum of window calls per s per job",
        _ => metric,
    }
}

/// One statistic set pivoted across runs.
struct MatrixSet {
    entity_column: &'static str,
    measures: &'static [&'static str],
    entities: Vec<String>,
    /// values[measure][entity][run - 1]
    values: Vec<Vec<Vec<f64>>>,
}

impl MatrixSet {
    fn new(entity_column: &'static str, measures: &'static [&'static str]) -> Self {
        Self {
            entity_column,
            measures,
            entities: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Folds one run's summary file into the matrix. Run 1 defines the
    /// entity list; later runs contribute by row position.
    fn absorb(&mut self, run: usize, table: &CsvTable) -> Result<()> {
        if run == 1 {
            self.entities = table
                .column(self.entity_column)?
                .into_iter()
                .map(str::to_string)
                .collect();
            self.values = vec![vec![Vec::new(); self.entities.len()]; self.measures.len()];
        } else if table.len() != self.entities.len() {
            bail!(
                "{} has {} rows but run 1 defined {} entities, cannot align by position",
                table.path().display(),
                table.len(),
                self.entities.len()
            );
        }
        for (mi, measure) in self.measures.iter().enumerate() {
            let column = table.numeric_column(measure)?;
            for (ei, value) in column.into_iter().enumerate() {
                self.values[mi][ei].push(value);
            }
        }
        Ok(())
    }

    fn measure_values(&self, mi: usize) -> &[Vec<f64>] {
        &self.values[mi]
    }
}

/// Runs the evaluation-row pipeline over `root` for runs 1..=`max_simulations`.
pub fn build_evaluation_row(
    config: &EvaluationConfig,
    root: &Path,
    max_simulations: usize,
) -> Result<()> {
    if max_simulations == 0 {
        bail!("maxNumberOfSimulations must be at least 1");
    }

    let mut latency = MatrixSet::new("streamName", &LATENCY_MEASURES);
    let mut samza = MatrixSet::new("worker", &SAMZA_METRICS);
    for run in 1..=max_simulations {
        let stats_dir = root.join(run.to_string()).join("stats");
        latency.absorb(run, &CsvTable::from_path(&stats_dir.join("latencyStats.csv"))?)?;
        samza.absorb(run, &CsvTable::from_path(&stats_dir.join("samzaMetrics.csv"))?)?;
        log::info!("Absorbed run {run} of {max_simulations}");
    }

    for (mi, measure) in LATENCY_MEASURES.iter().enumerate() {
        emit_measure(
            &latency,
            mi,
            max_simulations,
            &root.join(format!("{measure}Latencies")),
            latency_measure_label(measure),
            |name| config.stream_color(name).map(str::to_string),
            false,
        )?;
    }
    for (mi, metric) in SAMZA_METRICS.iter().enumerate() {
        emit_measure(
            &samza,
            mi,
            max_simulations,
            &root.join(metric),
            samza_metric_label(metric),
            |name| config.task_color(name).map(str::to_string),
            ZERO_FLOOR_METRICS.contains(metric),
        )?;
    }

    Ok(())
}

fn emit_measure(
    set: &MatrixSet,
    mi: usize,
    runs: usize,
    output_stem: &Path,
    y_label: &str,
    color_of: impl Fn(&str) -> Option<String>,
    zero_floor: bool,
) -> Result<()> {
    let csv_path = output_stem.with_extension("csv");
    let mut writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;

    let mut header = vec![set.entity_column.to_string()];
    header.extend((1..=runs).map(|run| run.to_string()));
    writer.write_record(&header)?;

    let mut series = Vec::with_capacity(set.entities.len());
    let mut max_value = 0.0f64;
    for (ei, entity) in set.entities.iter().enumerate() {
        let per_run = &set.measure_values(mi)[ei];

        let mut record = vec![entity.clone()];
        record.extend(per_run.iter().map(|value| value.to_string()));
        writer.write_record(&record)?;

        let color = color_of(entity)
            .ok_or_else(|| eyre!("no chart color configured for entity {entity}"))?;
        series.push(Series {
            name: entity.clone(),
            color,
            points: per_run
                .iter()
                .enumerate()
                .map(|(run, value)| ((run + 1) as f64, *value))
                .collect(),
        });
        max_value = per_run.iter().copied().fold(max_value, f64::max);
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", csv_path.display()))?;
    log::info!("Wrote {}", csv_path.display());

    let chart = LineChart {
        x_label: "Number of concurrently simulated matches".to_string(),
        y_label: y_label.to_string(),
        x_range: (1.0, runs as f64),
        y_range: zero_floor.then_some((0.0, max_value + 1.0)),
        x_ticks: Some((1..=runs).map(|run| run as f64).collect()),
        legend: true,
        series,
    };
    chart.save(&output_stem.with_extension("svg"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_run(root: &Path, run: usize, latency_rows: &[&str], samza_rows: &[&str]) {
        let stats_dir = root.join(run.to_string()).join("stats");
        fs::create_dir_all(&stats_dir).unwrap();

        let mut file = fs::File::create(stats_dir.join("latencyStats.csv")).unwrap();
        writeln!(
            file,
            "streamName,mean,std,var,median,90thPercentile,99thPercentile"
        )
        .unwrap();
        for row in latency_rows {
            writeln!(file, "{row}").unwrap();
        }

        let mut file = fs::File::create(stats_dir.join("samzaMetrics.csv")).unwrap();
        writeln!(file, "worker,avgProcessNs,avgWindowNs,avgProcessCallsPerSecondPerContainer,avgWindowCallsPerSecondPerContainer,sumProcessCallsPerSecondPerJob,sumWindowCallsPerSecondPerJob").unwrap();
        for row in samza_rows {
            writeln!(file, "{row}").unwrap();
        }
    }

    #[test]
    fn test_matrix_csvs_across_runs() {
        let root = TempDir::new().unwrap();
        write_run(
            root.path(),
            1,
            &["ballObjectState,10,1,1,9,12,15", "kickEvent,20,2,4,19,22,25"],
            &["TimeTask,100,10,5,0.5,50,2"],
        );
        write_run(
            root.path(),
            2,
            &["ballObjectState,11,1,1,10,13,16", "kickEvent,21,2,4,20,23,26"],
            &["TimeTask,110,11,6,0.6,60,3"],
        );

        build_evaluation_row(&EvaluationConfig::default(), root.path(), 2).unwrap();

        let means = fs::read_to_string(root.path().join("meanLatencies.csv")).unwrap();
        let lines: Vec<&str> = means.lines().collect();
        assert_eq!(lines[0], "streamName,1,2");
        assert_eq!(lines[1], "ballObjectState,10,11");
        assert_eq!(lines[2], "kickEvent,20,21");

        let process_ns = fs::read_to_string(root.path().join("avgProcessNs.csv")).unwrap();
        let lines: Vec<&str> = process_ns.lines().collect();
        assert_eq!(lines[0], "worker,1,2");
        assert_eq!(lines[1], "TimeTask,100,110");

        for measure in LATENCY_MEASURES {
            assert!(root.path().join(format!("{measure}Latencies.svg")).exists());
        }
        for metric in SAMZA_METRICS {
            assert!(root.path().join(format!("{metric}.svg")).exists());
        }
    }

    #[test]
    fn test_alignment_is_positional_not_by_name() {
        let root = TempDir::new().unwrap();
        write_run(
            root.path(),
            1,
            &["ballObjectState,10,1,1,9,12,15"],
            &["TimeTask,100,10,5,0.5,50,2"],
        );
        // Run 2 relabels the stream; the value still lands in the
        // ballObjectState row because alignment is by row position.
        write_run(
            root.path(),
            2,
            &["renamedStream,99,1,1,10,13,16"],
            &["TimeTask,110,11,6,0.6,60,3"],
        );

        build_evaluation_row(&EvaluationConfig::default(), root.path(), 2).unwrap();

        let means = fs::read_to_string(root.path().join("meanLatencies.csv")).unwrap();
        assert!(means.lines().any(|line| line == "ballObjectState,10,99"));
    }

    #[test]
    fn test_row_count_mismatch_fails() {
        let root = TempDir::new().unwrap();
        write_run(
            root.path(),
            1,
            &["ballObjectState,10,1,1,9,12,15", "kickEvent,20,2,4,19,22,25"],
            &["TimeTask,100,10,5,0.5,50,2"],
        );
        write_run(
            root.path(),
            2,
            &["ballObjectState,11,1,1,10,13,16"],
            &["TimeTask,110,11,6,0.6,60,3"],
        );

        let err = build_evaluation_row(&EvaluationConfig::default(), root.path(), 2).unwrap_err();
        assert!(err.to_string().contains("align by position"));
    }

    #[test]
    fn test_zero_runs_rejected() {
        let root = TempDir::new().unwrap();
        assert!(build_evaluation_row(&EvaluationConfig::default(), root.path(), 0).is_err());
    }

    #[test]
    fn test_missing_run_directory_fails() {
        let root = TempDir::new().unwrap();
        write_run(
            root.path(),
            1,
            &["ballObjectState,10,1,1,9,12,15"],
            &["TimeTask,100,10,5,0.5,50,2"],
        );
        assert!(build_evaluation_row(&EvaluationConfig::default(), root.path(), 2).is_err());
    }
}
