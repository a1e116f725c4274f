//! Confusion matrix and per-class classification metrics.

use std::collections::BTreeSet;

use crate::error::RfError;
use crate::value::ClassLabel;

/// A confusion matrix for multi-class classification.
///
/// Rows and columns follow [`ConfusionMatrix::classes`], the sorted union
/// of true and predicted labels. Entry `[t][p]` counts records with true
/// class `t` predicted as `p`.
#[derive(Debug, Clone)]
pub struct ConfusionMatrix {
    classes: Vec<ClassLabel>,
    matrix: Vec<Vec<usize>>,
}

/// Per-class precision, recall, and F1 score.
#[derive(Debug, Clone)]
pub struct ClassMetrics {
    /// The class label.
    pub class: ClassLabel,
    /// Precision: TP / (TP + FP). 0.0 if no predictions for this class.
    pub precision: f64,
    /// Recall: TP / (TP + FN). 0.0 if no true records for this class.
    pub recall: f64,
    /// F1: 2 * precision * recall / (precision + recall). 0.0 if both are zero.
    pub f1: f64,
    /// Number of true records in this class.
    pub support: usize,
}

impl ConfusionMatrix {
    /// Build a confusion matrix from true and predicted labels.
    ///
    /// Pairs are formed positionally; extra entries in the longer slice
    /// are ignored.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RfError::EmptyEvaluationSet`] | zero labels provided |
    pub fn from_labels(
        true_labels: &[ClassLabel],
        predicted: &[ClassLabel],
    ) -> Result<Self, RfError> {
        if true_labels.is_empty() || predicted.is_empty() {
            return Err(RfError::EmptyEvaluationSet);
        }
        let classes: Vec<ClassLabel> = true_labels
            .iter()
            .chain(predicted)
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let position = |label: &ClassLabel| classes.binary_search(label).unwrap_or_default();

        let mut matrix = vec![vec![0usize; classes.len()]; classes.len()];
        for (t, p) in true_labels.iter().zip(predicted) {
            matrix[position(t)][position(p)] += 1;
        }
        Ok(Self { classes, matrix })
    }

    /// Overall accuracy: proportion of correct predictions.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let correct: usize = (0..self.n_classes()).map(|i| self.matrix[i][i]).sum();
        let total: usize = self.matrix.iter().flat_map(|row| row.iter()).sum();
        if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        }
    }

    /// Per-class precision, recall, F1, and support.
    #[must_use]
    pub fn class_metrics(&self) -> Vec<ClassMetrics> {
        let n = self.n_classes();
        (0..n)
            .map(|c| {
                let tp = self.matrix[c][c];
                let fp: usize = (0..n).filter(|&i| i != c).map(|i| self.matrix[i][c]).sum();
                let fn_: usize = (0..n).filter(|&j| j != c).map(|j| self.matrix[c][j]).sum();
                let support = tp + fn_;
                let precision = if tp + fp == 0 {
                    0.0
                } else {
                    tp as f64 / (tp + fp) as f64
                };
                let recall = if support == 0 {
                    0.0
                } else {
                    tp as f64 / support as f64
                };
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassMetrics {
                    class: self.classes[c].clone(),
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect()
    }

    /// Return the class labels indexing rows and columns.
    #[must_use]
    pub fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }

    /// Return the underlying matrix rows.
    #[must_use]
    pub fn as_rows(&self) -> &[Vec<usize>] {
        &self.matrix
    }

    /// Return the number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}
