//! Label encoding
//!
//! Stable bijection between family-name strings and dense class ids, plus
//! one-hot expansion into the class-major target block the model consumes.

use crate::core::types::Matrix;
use crate::core::{Result, SvmError};

/// Bidirectional mapping between family names and class ids in
/// `[0, num_classes)`
///
/// Ids are assigned in sorted order of the distinct labels, so the mapping
/// is stable for the lifetime of a run and across runs over the same data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCodec {
    classes: Vec<String>,
}

impl LabelCodec {
    /// Build a codec from a label column
    pub fn fit(labels: &[String]) -> Result<Self> {
        if labels.is_empty() {
            return Err(SvmError::EmptyDataset);
        }

        let mut classes: Vec<String> = labels.to_vec();
        classes.sort();
        classes.dedup();

        Ok(Self { classes })
    }

    /// Rebuild a codec from a previously stored class table
    pub fn from_classes(classes: Vec<String>) -> Self {
        Self { classes }
    }

    /// Number of distinct classes
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// The ordered class table
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Class id for a family name
    pub fn encode(&self, label: &str) -> Result<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map_err(|_| SvmError::UnknownLabel(label.to_string()))
    }

    /// Family name for a class id
    pub fn decode(&self, id: usize) -> Result<&str> {
        self.classes
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| SvmError::InvalidParameter(format!("class id {id} out of range")))
    }

    /// Encode a full label column
    pub fn encode_all(&self, labels: &[String]) -> Result<Vec<usize>> {
        labels.iter().map(|l| self.encode(l)).collect()
    }

    /// One-hot expansion of a batch of class ids, class-major
    pub fn one_hot(&self, ids: &[usize]) -> Matrix {
        one_hot_block(ids, self.num_classes())
    }
}

/// Dense one-hot block of shape (num_classes, batch): column `j` has a
/// single 1.0 in row `ids[j]`
pub fn one_hot_block(ids: &[usize], num_classes: usize) -> Matrix {
    let mut block = Matrix::zeros(num_classes, ids.len());
    for (j, &id) in ids.iter().enumerate() {
        block.set(id, j, 1.0);
    }
    block
}

/// Recover the class id of one-hot column `col` by argmax
pub fn column_argmax(block: &Matrix, col: usize) -> usize {
    let mut best = 0;
    let mut best_value = block.get(0, col);
    for row in 1..block.rows() {
        let value = block.get(row, col);
        if value > best_value {
            best_value = value;
            best = row;
        }
    }
    best
}
