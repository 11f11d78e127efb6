//! Evaluation pipelines.
//!
//! One module per batch job: ingest the run's artifacts, aggregate
//! descriptive statistics, emit summary CSVs and charts. The pipelines are
//! independent of each other; each binary calls exactly one of them.

pub mod evaluation_row;
pub mod latency;
pub mod processing_timestamp;
pub mod qualitative;
pub mod samza_metrics;

pub use evaluation_row::build_evaluation_row;
pub use latency::summarize_latencies;
pub use processing_timestamp::summarize_processing_timestamps;
pub use qualitative::render_qualitative_graphs;
pub use samza_metrics::fetch_samza_metrics;
