//! Header-addressed CSV ingestion.
//!
//! The first line of every input file is a header; data fields are addressed
//! positionally by header name. Any malformed record or numeric field fails
//! the whole run with an error naming the file, data row, and column.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, Context, Result};
use csv::StringRecord;

/// An input CSV held fully in memory.
#[derive(Debug, Clone)]
pub struct CsvTable {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl CsvTable {
    /// Reads the whole file. A missing file or unreadable record fails the run.
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .with_context(|| format!("failed to open input CSV {}", path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("failed to read header line of {}", path.display()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.with_context(|| {
                format!("malformed record in {} (data row {})", path.display(), i + 1)
            })?;
            rows.push(record);
        }

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    /// Number of data rows (the header does not count).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.headers.iter().position(|h| h == name).ok_or_else(|| {
            eyre!(
                "column {name} not found in {} (header: {})",
                self.path.display(),
                self.headers.join(",")
            )
        })
    }

    /// All values of a column as text, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, record)| {
                record.get(idx).ok_or_else(|| {
                    eyre!(
                        "row {} of {} has no {name} field",
                        row + 1,
                        self.path.display()
                    )
                })
            })
            .collect()
    }

    /// All values of a column parsed as f64, in row order.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let values = self.column(name)?;
        values
            .iter()
            .enumerate()
            .map(|(row, value)| {
                value.parse::<f64>().map_err(|_| {
                    eyre!(
                        "malformed numeric field {value:?} in column {name} of {} (data row {})",
                        self.path.display(),
                        row + 1
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_columns_by_header_name() {
        let file = write_csv("streamName,latencyInMs\nkickEvent,12.5\nkickEvent,9\n");
        let table = CsvTable::from_path(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("streamName").unwrap(), vec!["kickEvent", "kickEvent"]);
        assert_eq!(table.numeric_column("latencyInMs").unwrap(), vec![12.5, 9.0]);
    }

    #[test]
    fn test_missing_column_names_file() {
        let file = write_csv("a,b\n1,2\n");
        let table = CsvTable::from_path(file.path()).unwrap();
        let err = table.numeric_column("latencyInMs").unwrap_err();
        assert!(err.to_string().contains("latencyInMs"));
    }

    #[test]
    fn test_malformed_numeric_field_fails_with_row() {
        let file = write_csv("latencyInMs\n1.5\nnot-a-number\n");
        let table = CsvTable::from_path(file.path()).unwrap();
        let err = table.numeric_column("latencyInMs").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("not-a-number"));
        assert!(msg.contains("data row 2"));
    }

    #[test]
    fn test_missing_file_fails() {
        assert!(CsvTable::from_path(Path::new("/nonexistent/latencies.csv")).is_err());
    }
}
