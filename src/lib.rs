//! # StreamEval - Offline evaluation statistics for streaming pipelines
//!
//! This library post-processes the artifacts of real-time sports analysis
//! evaluation runs (latency CSVs, worker log files, per-run metric
//! snapshots, qualitative detection-accuracy CSVs) into summary CSVs and
//! SVG charts.
//!
//! ## Overview
//!
//! Every pipeline is a linear batch job with the same two-stage shape:
//! ingest tabular or log data into in-memory tables keyed by a named entity
//! (stream, worker, event type, job), aggregate a fixed set of descriptive
//! statistics per entity, and emit summary tables plus charts. There is no
//! shared runtime and no persistence beyond the written output files.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `config`: entity tables, display attributes, and endpoint settings
//! - `stats`: descriptive statistics and the empirical CDF
//! - `ingest`: CSV tables and worker-log scraping
//! - `chart`: SVG line charts, 2-D histograms, and qualitative grids
//! - `analysis`: the five evaluation pipelines, one per binary
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use streameval::{analysis, config::EvaluationConfig};
//!
//! let config = EvaluationConfig::default();
//! analysis::summarize_latencies(&config, Path::new("latencies"), Path::new("stats"))?;
//!
//! // stats/ now contains latencyStats.csv, one CDF chart per stream,
//! // and the combined AllLatencyCDFs.svg chart.
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! The library uses `color_eyre` for error reporting with context. Every
//! pipeline fails hard on the first missing file, malformed field, or
//! inconsistent result set; the error identifies the offending
//! file/line/column/key. There is no partial-success mode.

pub mod analysis;
pub mod chart;
pub mod config;
pub mod ingest;
pub mod stats;
