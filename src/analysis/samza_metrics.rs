//! Samza runtime metrics collection.
//!
//! Issues six fixed PromQL queries against the metrics-query endpoint and
//! joins the per-job results into one summary CSV. The join is asymmetric by
//! contract: the first query's result set defines the job list; a job
//! missing from a later result set is a hard failure, while jobs that only
//! appear in later result sets are silently dropped.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use color_eyre::eyre::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::config::MetricsEndpoint;

pub const SAMZA_METRICS_FILE: &str = "samzaMetrics.csv";

const SAMZA_METRICS_HEADER: [&str; 7] = [
    "worker",
    "avgProcessNs",
    "avgWindowNs",
    "avgProcessCallsPerSecondPerContainer",
    "avgWindowCallsPerSecondPerContainer",
    "sumProcessCallsPerSecondPerJob",
    "sumWindowCallsPerSecondPerJob",
];

const CONTAINER_METRIC_PREFIX: &str = "samza:org_apache_samza_container_SamzaContainerMetrics:";

/// Metrics-fetch failures, separated by kind so callers and tests can tell
/// a dead endpoint from a schema change from an inconsistent result set.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("query for {metric} failed: {source}")]
    Transport {
        metric: &'static str,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("malformed response for {metric}: {detail}")]
    MalformedResponse {
        metric: &'static str,
        detail: String,
    },
    #[error("job {job} is missing from the {metric} results")]
    MissingJob { job: String, metric: &'static str },
}

// Prometheus query response: data.result[].metric.samza_job / .value[1]
#[derive(Debug, Deserialize)]
struct QueryResponse {
    data: QueryData,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    result: Vec<QueryResult>,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    metric: JobLabel,
    /// [timestamp, stringValue]
    value: (f64, String),
}

#[derive(Debug, Deserialize)]
struct JobLabel {
    samza_job: String,
}

/// Per-job scalar values of one query, in response order.
#[derive(Debug, Clone, Default)]
pub struct JobValues {
    jobs: Vec<String>,
    values: HashMap<String, String>,
}

impl JobValues {
    fn from_results(results: Vec<QueryResult>) -> Self {
        let mut jobs = Vec::with_capacity(results.len());
        let mut values = HashMap::with_capacity(results.len());
        for result in results {
            jobs.push(result.metric.samza_job.clone());
            values.insert(result.metric.samza_job, result.value.1);
        }
        Self { jobs, values }
    }

    pub fn jobs(&self) -> &[String] {
        &self.jobs
    }

    pub fn get(&self, job: &str) -> Option<&str> {
        self.values.get(job).map(String::as_str)
    }

    #[cfg(test)]
    fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            jobs: pairs.iter().map(|(job, _)| job.to_string()).collect(),
            values: pairs
                .iter()
                .map(|(job, value)| (job.to_string(), value.to_string()))
                .collect(),
        }
    }
}

/// Sync client for the metrics-query endpoint.
pub struct MetricsClient {
    agent: ureq::Agent,
    query_url: String,
    time_window: String,
}

impl MetricsClient {
    pub fn new(endpoint: &MetricsEndpoint) -> Self {
        // Bounded timeout: the endpoint lives on the evaluation network and
        // an unreachable host must fail the run, not hang it.
        let agent = ureq::config::Config::builder()
            .http_status_as_error(false) // status codes are checked manually
            .timeout_global(Some(Duration::from_secs(30)))
            .build()
            .new_agent();
        Self {
            agent,
            query_url: format!("http://{}:{}/api/v1/query", endpoint.host, endpoint.port),
            time_window: endpoint.time_window.clone(),
        }
    }

    fn fetch(&self, metric: &'static str, query: &str) -> Result<JobValues, MetricsError> {
        let response = self
            .agent
            .get(&self.query_url)
            .query("query", query)
            .call()
            .map_err(|e| MetricsError::Transport {
                metric,
                source: Box::new(e),
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(MetricsError::MalformedResponse {
                metric,
                detail: format!("HTTP status {status}"),
            });
        }

        let parsed: QueryResponse = response.into_body().read_json().map_err(|e| {
            MetricsError::MalformedResponse {
                metric,
                detail: e.to_string(),
            }
        })?;
        Ok(JobValues::from_results(parsed.data.result))
    }
}

/// Average of a gauge-style container metric over the window, per job.
fn average_query(metric: &str, window: &str) -> String {
    format!("avg(avg_over_time({CONTAINER_METRIC_PREFIX}{metric}[{window}])) by (samza_job)")
}

/// Per-second call rate of a counter-style container metric, per job.
///
/// The rate subtracts the window's starting counter value before dividing.
/// The trailing division by count/2 is unexplained upstream but yields
/// correct per-second rates for arbitrary window lengths.
fn call_rate_query(aggregate: &str, metric: &str, window: &str) -> String {
    let series = format!("{CONTAINER_METRIC_PREFIX}{metric}[{window}]");
    format!(
        "{aggregate}(((sum_over_time({series})-(min_over_time({series})*count_over_time({series})))/count_over_time({series}))/(count_over_time({series})/2)) by (samza_job)"
    )
}

/// The asymmetric join: the first query's jobs define the rows; every later
/// query must cover each of them.
fn join_job_values(fetched: &[(&'static str, JobValues)]) -> Result<Vec<Vec<String>>, MetricsError> {
    let (_, first) = &fetched[0];
    let mut rows = Vec::with_capacity(first.jobs().len());
    for job in first.jobs() {
        let mut row = Vec::with_capacity(fetched.len() + 1);
        row.push(job.clone());
        for (metric, values) in fetched {
            let value = values.get(job).ok_or_else(|| MetricsError::MissingJob {
                job: job.clone(),
                metric: *metric,
            })?;
            row.push(value.to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Runs the metrics-fetch pipeline against the configured endpoint.
pub fn fetch_samza_metrics(endpoint: &MetricsEndpoint, output_dir: &Path) -> Result<()> {
    let client = MetricsClient::new(endpoint);
    let window = client.time_window.clone();

    let queries: [(&'static str, String); 6] = [
        ("avgProcessNs", average_query("process_ns", &window)),
        ("avgWindowNs", average_query("window_ns", &window)),
        (
            "avgProcessCallsPerSecondPerContainer",
            call_rate_query("avg", "process_calls", &window),
        ),
        (
            "avgWindowCallsPerSecondPerContainer",
            call_rate_query("avg", "window_calls", &window),
        ),
        (
            "sumProcessCallsPerSecondPerJob",
            call_rate_query("sum", "process_calls", &window),
        ),
        (
            "sumWindowCallsPerSecondPerJob",
            call_rate_query("sum", "window_calls", &window),
        ),
    ];

    let mut fetched = Vec::with_capacity(queries.len());
    for (metric, query) in queries {
        let values = client.fetch(metric, &query)?;
        log::info!("Fetched {metric} for {} jobs", values.jobs().len());
        fetched.push((metric, values));
    }


    let rows = join_job_values(&fetched)?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;
    let output_path = output_dir.join(SAMZA_METRICS_FILE);
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("failed to open {}", output_path.display()))?;
    writer.write_record(SAMZA_METRICS_HEADER)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", output_path.display()))?;
    log::info!("Wrote {}", output_path.display());

    Ok(())
}
