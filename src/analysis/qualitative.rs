//! Qualitative detection-accuracy graphs.
//!
//! Each event type's stats CSV carries one percentage column per outcome
//! class, flattened row-major over (time threshold, distance threshold).
//! The columns are reshaped into the configured grid and rendered as colored
//! tables next to the input files.

use std::path::Path;

use color_eyre::eyre::{bail, Context, Result};

use crate::chart::{GridChart, OutcomePolarity, QualitativeGrid};
use crate::config::EvaluationConfig;
use crate::ingest::CsvTable;

/// Outcome classes: CSV column, polarity, output file stem.
const OUTCOME_CLASSES: [(&str, OutcomePolarity, &str); 3] = [
    (
        "correctDetectionsPercentage",
        OutcomePolarity::Positive,
        "CorrectDetections",
    ),
    (
        "wrongDetectionsPercentage",
        OutcomePolarity::Negative,
        "WrongDetections",
    ),
    (
        "missedDetectionsPercentage",
        OutcomePolarity::Negative,
        "MissedDetections",
    ),
];

/// Renders the qualitative grids for every configured event type.
///
/// Outputs are written next to the inputs in `stats_dir`, one SVG per
/// (event type, outcome class).
pub fn render_qualitative_graphs(config: &EvaluationConfig, stats_dir: &Path) -> Result<()> {
    let rows = config.grid.time_thresholds.len();
    let cols = config.grid.distance_thresholds.len();
    if rows == 0 || cols == 0 {
        bail!("qualitative grid configuration must declare at least one row and column label");
    }

    for event_type in &config.event_types {
        let input_path = stats_dir.join(format!("{event_type}Stats.csv"));
        let table = CsvTable::from_path(&input_path)?;

        for (column, polarity, stem) in OUTCOME_CLASSES {
            let values = table.numeric_column(column)?;
            let grid = QualitativeGrid::from_flat(&values, rows, cols).with_context(|| {
                format!("column {column} of {}", input_path.display())
            })?;

            let chart = GridChart {
                row_labels: config.grid.time_thresholds.clone(),
                col_labels: config.grid.distance_thresholds.clone(),
                declared_max: config.grid.declared_max,
                polarity,
            };
            chart.save(&grid, &stats_dir.join(format!("{event_type}{stem}.svg")))?;
        }
        log::info!("Rendered qualitative grids for {event_type}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn single_event_config() -> EvaluationConfig {
        EvaluationConfig {
            event_types: vec!["kickEvent".to_string()],
            ..EvaluationConfig::default()
        }
    }

    fn write_stats(dir: &Path, event_type: &str, rows: usize) {
        let mut file = fs::File::create(dir.join(format!("{event_type}Stats.csv"))).unwrap();
        writeln!(
            file,
            "correctDetectionsPercentage,wrongDetectionsPercentage,missedDetectionsPercentage"
        )
        .unwrap();
        for i in 0..rows {
            let v = i as f64 / rows as f64;
            writeln!(file, "{v},{v},{v}").unwrap();
        }
    }

    #[test]
    fn test_renders_three_grids_per_event_type() {
        let dir = TempDir::new().unwrap();
        write_stats(dir.path(), "kickEvent", 30);

        render_qualitative_graphs(&single_event_config(), dir.path()).unwrap();

        for stem in ["CorrectDetections", "WrongDetections", "MissedDetections"] {
            assert!(dir.path().join(format!("kickEvent{stem}.svg")).exists());
        }
    }

    #[test]
    fn test_wrong_row_count_fails_cleanly() {
        for rows in [29, 31] {
            let dir = TempDir::new().unwrap();
            write_stats(dir.path(), "kickEvent", rows);
            let err =
                render_qualitative_graphs(&single_event_config(), dir.path()).unwrap_err();
            assert!(err.to_string().contains("kickEventStats.csv"));
            // No partial grid output for this event type.
            assert!(!dir.path().join("kickEventCorrectDetections.svg").exists());
        }
    }

    #[test]
    fn test_missing_stats_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(render_qualitative_graphs(&single_event_config(), dir.path()).is_err());
    }
}
