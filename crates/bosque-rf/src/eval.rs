//! Accuracy evaluation for the Random Forest ensemble.

use tracing::{debug, instrument};

use crate::confusion::ConfusionMatrix;
use crate::dataset::Record;
use crate::error::RfError;
use crate::forest::Forest;
use crate::trainer::TrainedTree;
use crate::value::ClassLabel;

impl<T: TrainedTree> Forest<T> {
    /// Fraction of `records` whose predicted label equals their own label.
    ///
    /// Always in `[0.0, 1.0]`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RfError::EmptyEvaluationSet`] | `records` is empty |
    /// | [`RfError::EmptyForest`] | the forest has no trees |
    /// | [`RfError::SchemaMismatch`] | a record does not fit the schema |
    #[instrument(skip_all, fields(n_records = records.len(), n_trees = self.n_trees()))]
    pub fn evaluate(&self, records: &[Record]) -> Result<f64, RfError> {
        if records.is_empty() {
            return Err(RfError::EmptyEvaluationSet);
        }
        let predictions = self.predict_batch(records)?;
        let correct = predictions
            .iter()
            .zip(records)
            .filter(|&(predicted, record)| predicted == record.label())
            .count();
        let accuracy = correct as f64 / records.len() as f64;
        debug!(correct, accuracy, "evaluation complete");
        Ok(accuracy)
    }

    /// Confusion matrix of predictions against the records' own labels.
    ///
    /// # Errors
    ///
    /// Same as [`Forest::evaluate`].
    pub fn confusion(&self, records: &[Record]) -> Result<ConfusionMatrix, RfError> {
        if records.is_empty() {
            return Err(RfError::EmptyEvaluationSet);
        }
        let predictions = self.predict_batch(records)?;
        let truth: Vec<ClassLabel> = records.iter().map(|r| r.label().clone()).collect();
        ConfusionMatrix::from_labels(&truth, &predictions)
    }
}
