//! Per-class metrics aggregation and report rendering
//!
//! Consumes the accumulated (actual, predicted) records and produces the
//! overall accuracy plus a one-vs-rest breakdown per class. Tallies live in
//! a fixed vector indexed by class id.

use crate::core::types::PredictionRecord;
use crate::core::Result;
use crate::data::LabelCodec;
use std::fmt::Write as _;

/// Confusion counts for one class treated as the positive class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassTally {
    /// Times this class was the actual label
    pub actual_count: usize,
    /// Times this class was the actual label and correctly predicted
    pub correct_count: usize,
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ClassTally {
    /// correct / actual; None when the class never appeared as an actual
    /// label, so callers can render the undefined ratio as 0/0
    pub fn class_accuracy(&self) -> Option<f64> {
        if self.actual_count == 0 {
            None
        } else {
            Some(self.correct_count as f64 / self.actual_count as f64)
        }
    }

    /// True-positive rate: TP / (TP + FN)
    pub fn sensitivity(&self) -> f64 {
        let denominator = self.true_positives + self.false_negatives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// True-negative rate: TN / (FP + TN)
    pub fn specificity(&self) -> f64 {
        let denominator = self.false_positives + self.true_negatives;
        if denominator == 0 {
            0.0
        } else {
            self.true_negatives as f64 / denominator as f64
        }
    }

    /// One-vs-rest accuracy: (TP + TN) / (TP + FP + TN + FN)
    pub fn one_vs_rest_accuracy(&self) -> f64 {
        let total = self.true_positives
            + self.false_positives
            + self.true_negatives
            + self.false_negatives;
        if total == 0 {
            0.0
        } else {
            (self.true_positives + self.true_negatives) as f64 / total as f64
        }
    }
}

/// Aggregated run metrics over all accumulated prediction records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsReport {
    tallies: Vec<ClassTally>,
    total: usize,
    total_correct: usize,
}

impl MetricsReport {
    /// Aggregate records into per-class tallies
    ///
    /// Record order carries no meaning here; only the pair counts matter.
    pub fn from_records(records: &[PredictionRecord], num_classes: usize) -> Self {
        let mut actual = vec![0usize; num_classes];
        let mut predicted = vec![0usize; num_classes];
        let mut correct = vec![0usize; num_classes];
        let mut total_correct = 0;

        for record in records {
            actual[record.actual] += 1;
            predicted[record.predicted] += 1;
            if record.is_correct() {
                correct[record.actual] += 1;
                total_correct += 1;
            }
        }

        let total = records.len();
        let tallies = (0..num_classes)
            .map(|c| {
                let tp = correct[c];
                let fn_ = actual[c] - tp;
                let fp = predicted[c] - tp;
                ClassTally {
                    actual_count: actual[c],
                    correct_count: tp,
                    true_positives: tp,
                    false_positives: fp,
                    true_negatives: total - tp - fp - fn_,
                    false_negatives: fn_,
                }
            })
            .collect();

        Self {
            tallies,
            total,
            total_correct,
        }
    }

    pub fn num_classes(&self) -> usize {
        self.tallies.len()
    }

    /// Total evaluated examples
    pub fn total_examples(&self) -> usize {
        self.total
    }

    /// Per-class tallies, indexed by class id
    pub fn tallies(&self) -> &[ClassTally] {
        &self.tallies
    }

    /// Tally for one class
    ///
    /// # Panics
    /// Panics if the class id is out of range.
    pub fn class(&self, id: usize) -> &ClassTally {
        &self.tallies[id]
    }

    /// Fraction of records where actual == predicted, 0.0 when empty
    pub fn overall_accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.total_correct as f64 / self.total as f64
        }
    }

    /// Render the flat text report
    ///
    /// One tab-separated line per class: label, actual count, correct
    /// count, class accuracy (or 0/0), sensitivity, specificity,
    /// one-vs-rest accuracy; then a summary line with the global
    /// true-positive rate.
    pub fn render(&self, codec: &LabelCodec) -> Result<String> {
        let mut out = String::new();
        let _ = writeln!(out, "accuracy_score: {:.6}", self.overall_accuracy());

        for (id, tally) in self.tallies.iter().enumerate() {
            let label = codec.decode(id)?;
            let accuracy = match tally.class_accuracy() {
                Some(acc) => format!("{acc:.6}"),
                None => "0/0".to_string(),
            };
            let _ = writeln!(
                out,
                "{}\t{}\t{}\t{}\t{:.6}\t{:.6}\t{:.6}",
                label,
                tally.actual_count,
                tally.correct_count,
                accuracy,
                tally.sensitivity(),
                tally.specificity(),
                tally.one_vs_rest_accuracy()
            );
        }

        let _ = writeln!(
            out,
            "total = {} TP_rate = {:.6}",
            self.total,
            self.overall_accuracy()
        );
        Ok(out)
    }
}
