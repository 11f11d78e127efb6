//! Descriptive statistics over sample series.
//!
//! All aggregates use population semantics (ddof = 0) and percentiles use
//! linear interpolation on the sorted series. Every entry point returns
//! `None` for an empty series; callers turn that into a hard error naming
//! the entity and input file, there is no silent default.

use std::cmp::Ordering;

/// The fixed statistic set reported for one entity's sample series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub mean: f64,
    /// Population standard deviation (ddof = 0).
    pub std_dev: f64,
    /// Population variance (ddof = 0).
    pub variance: f64,
    pub median: f64,
    pub p90: f64,
    pub p99: f64,
}

impl SummaryStats {
    /// Computes the full statistic set from an unsorted series.
    ///
    /// Returns `None` if the series is empty.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let sorted = sorted_copy(samples);
        let mean = mean(samples)?;
        let variance = population_variance(samples)?;
        Some(Self {
            mean,
            std_dev: variance.sqrt(),
            variance,
            median: percentile_sorted(&sorted, 50.0),
            p90: percentile_sorted(&sorted, 90.0),
            p99: percentile_sorted(&sorted, 99.0),
        })
    }
}

/// Empirical cumulative distribution of a sample series.
///
/// X is the series sorted ascending and the paired F value at rank i
/// (0-indexed) is `i / n`. The curve is left-continuous: `F[0] == 0` and
/// `F[n-1] == (n-1)/n`, never 1.0. Downstream chart consumers rely on this
/// exact pairing, so it must not be "corrected" to the `(i+1)/n` convention.
#[derive(Debug, Clone)]
pub struct Ecdf {
    xs: Vec<f64>,
    fs: Vec<f64>,
}

impl Ecdf {
    /// Builds the ECDF from an unsorted series. Returns `None` if empty.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let xs = sorted_copy(samples);
        let n = xs.len() as f64;
        let fs = (0..xs.len()).map(|i| i as f64 / n).collect();
        Some(Self { xs, fs })
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn fs(&self) -> &[f64] {
        &self.fs
    }

    /// (x, F) pairs in ascending x order.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.xs.iter().copied().zip(self.fs.iter().copied()).collect()
    }
}

/// Arithmetic mean. `None` on an empty series.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (ddof = 0). `None` on an empty series.
pub fn population_variance(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    Some(values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (ddof = 0). `None` on an empty series.
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    population_variance(values).map(f64::sqrt)
}

/// Linear-interpolation percentile over an unsorted series.
///
/// `p` is in [0, 100]. `None` on an empty series.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(percentile_sorted(&sorted_copy(values), p))
}

/// Percentile at fractional rank `p/100 * (n-1)`, interpolated between the
/// adjacent sorted samples. Callers must pass a non-empty ascending slice.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}
