//! Ingestion of evaluation artifacts: delimited tables and worker log files.

pub mod table;
pub mod worker_log;

pub use table::CsvTable;
pub use worker_log::{scrape_worker_log, EventKey, PROCESSING_TIMESTAMP_MARKER};
