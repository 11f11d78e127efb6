//! Worker log scraping for processing-timestamp measurements.
//!
//! Only lines that begin with the exact marker emitted by the stream
//! processing workers are significant. Each such line carries the match id,
//! the generation timestamp of the observed stream element, and the worker's
//! processing timestamp offset in milliseconds.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use color_eyre::eyre::{eyre, Context, Result};
use regex::Regex;

/// Literal prefix of a significant measurement line.
pub const PROCESSING_TIMESTAMP_MARKER: &str =
    "ProcessingTimestampOfTheFieldObjectStateStreamElementForTheBall";

/// Match: "<MARKER> <matchId> <generationTimestamp> <processingTimestamp>"
static MEASUREMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^ProcessingTimestampOfTheFieldObjectStateStreamElementForTheBall\s+(\d+)\s+(\d+)\s+(\S+)",
    )
    .expect("Invalid measurement line regex")
});

/// Identity of one logical stream element, shared across worker logs.
///
/// Ordering is numeric on (match id, generation timestamp). The rendered
/// form pads both fields to 10 digits, so lexicographic order of rendered
/// keys coincides with this ordering; the variance CSV depends on that when
/// rows are emitted in key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKey {
    pub match_id: u64,
    pub generation_timestamp: u64,
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:010}-{:010}", self.match_id, self.generation_timestamp)
    }
}

/// Scrapes one worker log into the shared grouping structure.
///
/// Returns the number of measurement lines found. A line that starts with
/// the marker but does not parse fails the run naming the file and line; a
/// missing log file fails the run.
pub fn scrape_worker_log(
    path: &Path,
    groups: &mut BTreeMap<EventKey, Vec<f64>>,
) -> Result<usize> {
    let file = File::open(path)
        .with_context(|| format!("failed to open worker log {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut matched = 0usize;
    for (i, line) in reader.lines().enumerate() {
        let line =
            line.with_context(|| format!("failed to read worker log {}", path.display()))?;
        if !line.starts_with(PROCESSING_TIMESTAMP_MARKER) {
            continue;
        }
        let caps = MEASUREMENT_LINE.captures(&line).ok_or_else(|| {
            eyre!(
                "malformed measurement line in {} (line {})",
                path.display(),
                i + 1
            )
        })?;
        let key = EventKey {
            match_id: parse_field(&caps[1], "matchId", path, i)?,
            generation_timestamp: parse_field(&caps[2], "generationTimestamp", path, i)?,
        };
        let value: f64 = caps[3].parse().map_err(|_| {
            eyre!(
                "malformed processing timestamp {:?} in {} (line {})",
                &caps[3],
                path.display(),
                i + 1
            )
        })?;
        groups.entry(key).or_default().push(value);
        matched += 1;
    }

    Ok(matched)
}

fn parse_field(token: &str, name: &str, path: &Path, line: usize) -> Result<u64> {
    token.parse().map_err(|_| {
        eyre!(
            "malformed {name} {token:?} in {} (line {})",
            path.display(),
            line + 1
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_key_renders_zero_padded() {
        let key = EventKey {
            match_id: 7,
            generation_timestamp: 42,
        };
        assert_eq!(key.to_string(), "0000000007-0000000042");
    }

    #[test]
    fn test_key_order_matches_lexicographic_rendered_order() {
        let mut keys = Vec::new();
        for match_id in [1u64, 2] {
            for ts in [5u64, 15] {
                keys.push(EventKey {
                    match_id,
                    generation_timestamp: ts,
                });
            }
        }
        let mut numeric = keys.clone();
        numeric.sort();
        let mut rendered: Vec<String> = keys.iter().map(EventKey::to_string).collect();
        rendered.sort();
        let numeric_rendered: Vec<String> = numeric.iter().map(EventKey::to_string).collect();
        assert_eq!(rendered, numeric_rendered);
        // Without padding, "15" would sort before "5" lexicographically.
        assert_eq!(
            numeric[1],
            EventKey {
                match_id: 1,
                generation_timestamp: 15
            }
        );
    }

    #[test]
    fn test_scrape_groups_by_key_and_skips_other_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "some unrelated log line").unwrap();
        writeln!(file, "{PROCESSING_TIMESTAMP_MARKER} 1 100 10.5").unwrap();
        writeln!(file, "{PROCESSING_TIMESTAMP_MARKER} 1 100 11.5").unwrap();
        writeln!(file, "{PROCESSING_TIMESTAMP_MARKER} 1 200 20.0").unwrap();
        writeln!(file, "another unrelated line").unwrap();

        let mut groups = BTreeMap::new();
        let matched = scrape_worker_log(file.path(), &mut groups).unwrap();
        assert_eq!(matched, 3);
        assert_eq!(groups.len(), 2);
        let key = EventKey {
            match_id: 1,
            generation_timestamp: 100,
        };
        assert_eq!(groups[&key], vec![10.5, 11.5]);
    }

    #[test]
    fn test_malformed_marker_line_fails_with_line_number() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{PROCESSING_TIMESTAMP_MARKER} 1 not-a-timestamp 10.5").unwrap();

        let mut groups = BTreeMap::new();
        let err = scrape_worker_log(file.path(), &mut groups).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_missing_log_fails() {
        let mut groups = BTreeMap::new();
        assert!(scrape_worker_log(Path::new("/nonexistent/Worker.log"), &mut groups).is_err());
    }
}
