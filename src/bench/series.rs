//! Benchmark CSV loading and validation.
//!
//! The lag benchmarks write one row per read with microsecond timestamps:
//!
//! ```text
//! event_time,virtual_event_time,read_time,diff
//! ```
//!
//! Only the columns a report needs are parsed; each must be present, fully
//! numeric, and exactly `expected` rows long.

use crate::error::ReportError;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

pub const DIFF: &str = "diff";
pub const EVENT_TIME: &str = "event_time";
pub const VIRTUAL_EVENT_TIME: &str = "virtual_event_time";
pub const READ_TIME: &str = "read_time";

/// Arithmetic mean; NaN for an empty slice
pub fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Named, immutable sequence of latency samples
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkSeries {
    name: String,
    samples: Vec<f64>,
}

impl BenchmarkSeries {
    pub fn new(name: impl Into<String>, samples: Vec<f64>) -> Self {
        BenchmarkSeries {
            name: name.into(),
            samples,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn mean(&self) -> f64 {
        mean(&self.samples)
    }
}

/// The validated columns of one benchmark file
#[derive(Debug, Clone)]
pub struct BenchmarkTable {
    source: String,
    columns: HashMap<String, Vec<f64>>,
}

impl BenchmarkTable {
    /// Load `required` columns from a CSV file
    pub fn load(path: &Path, required: &[&str], expected: usize) -> Result<Self, ReportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(path.display().to_string(), file, required, expected)
    }

    /// Load `required` columns from any CSV source with a header row
    pub fn from_reader<R: Read>(
        source: impl Into<String>,
        reader: R,
        required: &[&str],
        expected: usize,
    ) -> Result<Self, ReportError> {
        let source = source.into();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|error| ReportError::Csv {
                source_name: source.clone(),
                error,
            })?
            .clone();

        let mut indices = Vec::with_capacity(required.len());
        for &name in required {
            let idx = headers.iter().position(|h| h == name).ok_or_else(|| {
                ReportError::data_format(&source, format!("missing column '{}'", name))
            })?;
            indices.push((name, idx));
        }

        let mut columns: HashMap<String, Vec<f64>> = required
            .iter()
            .map(|&name| (name.to_string(), Vec::with_capacity(expected)))
            .collect();

        for (row, record) in rdr.records().enumerate() {
            let record = record.map_err(|error| ReportError::Csv {
                source_name: source.clone(),
                error,
            })?;
            for &(name, idx) in &indices {
                let cell = record.get(idx).unwrap_or("");
                let value = cell.parse::<f64>().map_err(|_| {
                    ReportError::data_format(
                        &source,
                        format!("row {}: column '{}' is not numeric: '{}'", row + 1, name, cell),
                    )
                })?;
                if let Some(column) = columns.get_mut(name) {
                    column.push(value);
                }
            }
        }

        let rows = columns.values().next().map_or(0, Vec::len);
        if rows != expected {
            return Err(ReportError::data_format(
                &source,
                format!("expected {} samples, found {}", expected, rows),
            ));
        }

        log::debug!("[Bench] {}: {} rows, columns {:?}", source, rows, required);
        Ok(BenchmarkTable { source, columns })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Take a column as a named series
    pub fn series(&self, column: &str, name: impl Into<String>) -> Result<BenchmarkSeries, ReportError> {
        let samples = self.column(column).ok_or_else(|| {
            ReportError::data_format(&self.source, format!("column '{}' was not loaded", column))
        })?;
        Ok(BenchmarkSeries::new(name, samples.to_vec()))
    }

    /// Mean of the element-wise difference `minuend - subtrahend`
    pub fn mean_difference(&self, minuend: &str, subtrahend: &str) -> Result<f64, ReportError> {
        let a = self.column(minuend).ok_or_else(|| {
            ReportError::data_format(&self.source, format!("column '{}' was not loaded", minuend))
        })?;
        let b = self.column(subtrahend).ok_or_else(|| {
            ReportError::data_format(&self.source, format!("column '{}' was not loaded", subtrahend))
        })?;
        let diffs: Vec<f64> = a.iter().zip(b).map(|(x, y)| x - y).collect();
        Ok(mean(&diffs))
    }
}
