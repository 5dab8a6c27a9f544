//! Protein-vector CSV ingestion
//!
//! Rows are comma-separated with no header:
//! - column 0: sequence identifier (ignored)
//! - column 1: family label string
//! - columns 2..: exactly 100 numeric embedding components

use crate::core::types::{Matrix, FEATURE_DIM};
use crate::core::{Result, SvmError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Loaded protein embedding dataset: feature matrix plus the parallel
/// family-label column, in file order
#[derive(Debug, Clone)]
pub struct ProteinDataset {
    features: Matrix,
    labels: Vec<String>,
}

impl ProteinDataset {
    /// Load a dataset from a CSV file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a dataset from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut rows = Vec::new();
        let mut labels = Vec::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (label, features) = Self::parse_data_line(line, line_no + 1)?;
            labels.push(label);
            rows.push(features);
        }

        if rows.is_empty() {
            return Err(SvmError::EmptyDataset);
        }

        Ok(Self {
            features: Matrix::from_rows(rows)?,
            labels,
        })
    }

    fn parse_data_line(line: &str, line_no: usize) -> Result<(String, Vec<f64>)> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        if fields.len() != FEATURE_DIM + 2 {
            return Err(SvmError::DataShape(format!(
                "line {}: expected {} columns (id, family, {} features), got {}",
                line_no,
                FEATURE_DIM + 2,
                FEATURE_DIM,
                fields.len()
            )));
        }

        let label = fields[1].to_string();
        if label.is_empty() {
            return Err(SvmError::Parse(format!("line {line_no}: empty family label")));
        }

        let mut features = Vec::with_capacity(FEATURE_DIM);
        for (col, field) in fields[2..].iter().enumerate() {
            let value = field.parse::<f64>().map_err(|_| {
                SvmError::Parse(format!(
                    "line {}: invalid feature value at column {}: {}",
                    line_no,
                    col + 2,
                    field
                ))
            })?;
            features.push(value);
        }

        Ok((label, features))
    }

    /// Number of examples
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the dataset holds no examples
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The feature matrix, one row per example
    pub fn features(&self) -> &Matrix {
        &self.features
    }

    /// The family label column, parallel to the feature rows
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
