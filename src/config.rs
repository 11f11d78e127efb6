//! Evaluation configuration.
//!
//! The entity sets under evaluation and their display attributes (chart
//! colors, grid labels) live here, decoupled from the statistics
//! computation. The built-in defaults cover the standard evaluation setup;
//! a YAML file can override any section.

use std::fs::File;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use log::info;
use serde::Deserialize;

/// A named entity with its chart color.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityStyle {
    pub name: String,
    /// Hex color used for this entity's chart series.
    pub color: String,
}

impl EntityStyle {
    fn new(name: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

/// Qualitative grid shape, labels, and color saturation point.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Row labels, one per time threshold.
    pub time_thresholds: Vec<String>,
    /// Column labels, one per distance threshold.
    pub distance_thresholds: Vec<String>,
    /// Percentage value at which the cell color saturates.
    pub declared_max: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            time_thresholds: ["1 s", "2 s", "3 s", "4 s", "5 s"]
                .map(str::to_string)
                .to_vec(),
            distance_thresholds: ["1 m", "3 m", "5 m", "7 m", "9 m", "No distance threshold"]
                .map(str::to_string)
                .to_vec(),
            declared_max: 1.0,
        }
    }
}

/// Address and query window of the metrics-query endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsEndpoint {
    pub host: String,
    pub port: u16,
    /// PromQL range literal, e.g. "45m".
    pub time_window: String,
}

impl Default for MetricsEndpoint {
    fn default() -> Self {
        Self {
            host: "10.34.58.65".to_string(),
            port: 9090,
            time_window: "45m".to_string(),
        }
    }
}

/// Full evaluation configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Output streams whose latency CSVs are summarized.
    pub streams: Vec<EntityStyle>,
    /// Workers whose logs carry processing-timestamp measurements.
    pub variance_workers: Vec<String>,
    /// Samza tasks shown in the cross-run metric charts.
    pub tasks: Vec<EntityStyle>,
    /// Event types with qualitative detection-accuracy CSVs.
    pub event_types: Vec<String>,
    pub grid: GridConfig,
    pub metrics: MetricsEndpoint,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        // Series colors are the Tableau 10/20 palette.
        Self {
            streams: vec![
                EntityStyle::new("ballObjectState", "#1F77B4"),
                EntityStyle::new("A1FullGameHeatmapStatistics", "#FF7F0E"),
                EntityStyle::new("kickEvent", "#2CA02C"),
                EntityStyle::new("BPassStatistics", "#D62728"),
                EntityStyle::new("passSequenceEvent", "#9467BD"),
            ],
            // PassAndShotDetection, FieldObjectStateGeneration and
            // PassCombinationDetection are excluded: they do not process
            // field object state stream elements.
            variance_workers: [
                "AreaDetectionApplication",
                "DistanceAndSpeedAnalysisApplication",
                "HeatmapApplication",
                "KickoffDetectionApplication",
                "PressingAnalysisApplication",
                "TeamAreaApplication",
                "BallPossessionApplication",
                "KickDetectionApplication",
                "OffsideApplication",
                "SetPlayDetectionApplication",
                "TimeApplication",
            ]
            .map(str::to_string)
            .to_vec(),
            tasks: vec![
                EntityStyle::new("TimeTask", "#1F77B4"),
                EntityStyle::new("FieldObjectStateGenerationTask", "#AEC7E8"),
                EntityStyle::new("DistanceAndSpeedAnalysisTask", "#FF7F0E"),
                EntityStyle::new("PassCombinationDetectionTask", "#FFBB78"),
                EntityStyle::new("PressingAnalysisTask", "#2CA02C"),
                EntityStyle::new("HeatmapTask", "#98DF8A"),
                EntityStyle::new("KickDetectionTask", "#D62728"),
                EntityStyle::new("TeamAreaTask", "#98DF8A"),
                EntityStyle::new("PassAndShotDetectionTask", "#9467BD"),
                EntityStyle::new("SetPlayDetectionTask", "#98DF8A"),
                EntityStyle::new("AreaDetectionTask", "#8C564B"),
                EntityStyle::new("KickoffDetectionTask", "#C49C94"),
                EntityStyle::new("OffsideTask", "#CFECF9"),
                EntityStyle::new("BallPossessionTask", "#F7B6D2"),
            ],
            event_types: [
                "interceptionEvent",
                "successfulPassEvent",
                "freekickEvent",
                "cornerkickEvent",
                "throwinEvent",
                "goalkickEvent",
            ]
            .map(str::to_string)
            .to_vec(),
            grid: GridConfig::default(),
            metrics: MetricsEndpoint::default(),
        }
    }
}

impl EvaluationConfig {
    pub fn stream_color(&self, name: &str) -> Option<&str> {
        lookup_color(&self.streams, name)
    }

    pub fn task_color(&self, name: &str) -> Option<&str> {
        lookup_color(&self.tasks, name)
    }

    /// Loads the YAML override file when given, the built-in defaults
    /// otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => load_config(path),
            None => Ok(Self::default()),
        }
    }
}

fn lookup_color<'a>(entities: &'a [EntityStyle], name: &str) -> Option<&'a str> {
    entities
        .iter()
        .find(|e| e.name == name)
        .map(|e| e.color.as_str())
}

/// Load and parse configuration from a YAML file
pub fn load_config(path: &Path) -> Result<EvaluationConfig> {
    info!("Loading configuration from: {:?}", path);

    let file = File::open(path)
        .with_context(|| format!("failed to open configuration file {}", path.display()))?;

    let config: EvaluationConfig = serde_yaml::from_reader(file)
        .with_context(|| format!("failed to parse configuration file {}", path.display()))?;

    Ok(config)
}
