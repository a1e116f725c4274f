//! Majority-vote prediction for the Random Forest ensemble.

use std::collections::BTreeMap;

use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

use crate::dataset::Record;
use crate::error::RfError;
use crate::forest::Forest;
use crate::trainer::TrainedTree;
use crate::value::ClassLabel;

/// Pick the label with the highest count; among tied labels the smallest.
///
/// The map is scanned in ascending label order and the leader is only
/// replaced on a strictly greater count. `None` when the map is empty.
pub(crate) fn majority<'a>(tally: &BTreeMap<&'a ClassLabel, usize>) -> Option<&'a ClassLabel> {
    let mut best: Option<(&'a ClassLabel, usize)> = None;
    for (&label, &count) in tally {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((label, count)),
        }
    }
    best.map(|(label, _)| label)
}

/// Per-label vote counts for one record, one vote per tree.
#[derive(Debug, Clone)]
pub struct VoteTally<'a> {
    votes: BTreeMap<&'a ClassLabel, usize>,
    winner: &'a ClassLabel,
}

impl<'a> VoteTally<'a> {
    /// Return the winning label: most votes, smallest label on ties.
    #[must_use]
    pub fn winner(&self) -> &'a ClassLabel {
        self.winner
    }

    /// Return how many trees voted for `label`.
    #[must_use]
    pub fn count(&self, label: &ClassLabel) -> usize {
        self.votes.get(label).copied().unwrap_or(0)
    }

    /// Return the total number of votes cast.
    #[must_use]
    pub fn total(&self) -> usize {
        self.votes.values().sum()
    }

    /// Iterate over `(label, votes)` in ascending label order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a ClassLabel, usize)> + '_ {
        self.votes.iter().map(|(&label, &count)| (label, count))
    }
}

impl<T: TrainedTree> Forest<T> {
    /// Collect one vote per tree for `record`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RfError::EmptyForest`] | the forest has no trees |
    /// | [`RfError::SchemaMismatch`] | `record` does not fit the forest's schema |
    pub fn vote(&self, record: &Record) -> Result<VoteTally<'_>, RfError> {
        self.vote_at(record, 0)
    }

    /// Predict the class label for a single record by majority vote.
    ///
    /// # Errors
    ///
    /// Same as [`Forest::vote`].
    pub fn predict(&self, record: &Record) -> Result<ClassLabel, RfError> {
        Ok(self.vote(record)?.winner().clone())
    }

    /// Predict labels for a batch of records in parallel.
    ///
    /// The output has one label per input record, in input order.
    ///
    /// # Errors
    ///
    /// Same as [`Forest::vote`]; a mismatch error names the offending
    /// record's position.
    pub fn predict_batch(&self, records: &[Record]) -> Result<Vec<ClassLabel>, RfError> {
        if self.trees.is_empty() {
            return Err(RfError::EmptyForest);
        }
        records
            .par_iter()
            .enumerate()
            .map(|(i, record)| self.vote_at(record, i).map(|tally| tally.winner().clone()))
            .collect()
    }

    fn vote_at(&self, record: &Record, record_index: usize) -> Result<VoteTally<'_>, RfError> {
        if self.trees.is_empty() {
            return Err(RfError::EmptyForest);
        }
        self.schema.check(record, record_index)?;

        let mut votes = BTreeMap::new();
        for tree in &self.trees {
            *votes.entry(tree.predict(record)).or_insert(0) += 1;
        }
        let winner = majority(&votes).ok_or(RfError::EmptyForest)?;
        Ok(VoteTally { votes, winner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Attribute, Schema};
    use crate::value::Value;

    /// A tree that ignores its input.
    struct Fixed(ClassLabel);

    impl TrainedTree for Fixed {
        fn predict(&self, _record: &Record) -> &ClassLabel {
            &self.0
        }
    }

    /// A tree that answers `low` below a threshold on attribute 0, `high` otherwise.
    struct Stump {
        threshold: f64,
        low: ClassLabel,
        high: ClassLabel,
    }

    impl TrainedTree for Stump {
        fn predict(&self, record: &Record) -> &ClassLabel {
            match record.values()[0].as_number() {
                Some(x) if x <= self.threshold => &self.low,
                _ => &self.high,
            }
        }
    }

    fn label(s: &str) -> ClassLabel {
        ClassLabel::new(s).unwrap()
    }

    fn schema() -> Schema {
        Schema::new(vec![Attribute::numeric("x")], "animal").unwrap()
    }

    fn record(x: f64) -> Record {
        Record::new(vec![Value::Number(x)], label("unknown"))
    }

    fn fixed_forest(labels: &[&str]) -> Forest<Fixed> {
        Forest::from_trees(schema(), labels.iter().map(|&l| Fixed(label(l))).collect())
    }

    #[test]
    fn two_of_three_votes_win() {
        let forest = fixed_forest(&["cat", "cat", "dog"]);
        assert_eq!(forest.predict(&record(1.0)).unwrap(), label("cat"));

        let tally = forest.vote(&record(1.0)).unwrap();
        assert_eq!(tally.count(&label("cat")), 2);
        assert_eq!(tally.count(&label("dog")), 1);
        assert_eq!(tally.count(&label("cow")), 0);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn unanimous_vote() {
        let forest = fixed_forest(&["dog"; 5]);
        for x in [-3.0, 0.0, 8.5] {
            assert_eq!(forest.predict(&record(x)).unwrap(), label("dog"));
        }
    }

    #[test]
    fn tie_goes_to_smallest_label() {
        // Insertion order must not matter.
        for order in [["dog", "cat"], ["cat", "dog"]] {
            let forest = fixed_forest(&order);
            assert_eq!(forest.predict(&record(0.0)).unwrap(), label("cat"));
        }
        let forest = fixed_forest(&["zebra", "emu", "zebra", "emu", "ant"]);
        assert_eq!(forest.predict(&record(0.0)).unwrap(), label("emu"));
    }

    #[test]
    fn repeated_predictions_are_identical() {
        let forest = fixed_forest(&["b", "a", "c", "b", "a", "c"]);
        let records: Vec<Record> = (0..50).map(|i| record(i as f64)).collect();
        let first = forest.predict_batch(&records).unwrap();
        for _ in 0..5 {
            assert_eq!(forest.predict_batch(&records).unwrap(), first);
        }
        assert!(first.iter().all(|l| l.as_str() == "a"));
    }

    #[test]
    fn batch_preserves_length_and_order() {
        let forest = Forest::from_trees(
            schema(),
            (0..3)
                .map(|_| Stump {
                    threshold: 0.0,
                    low: label("neg"),
                    high: label("pos"),
                })
                .collect(),
        );
        let xs = [-1.0, 2.0, -3.0, 4.0, 5.0, -6.0];
        let records: Vec<Record> = xs.iter().map(|&x| record(x)).collect();

        let predictions = forest.predict_batch(&records).unwrap();
        assert_eq!(predictions.len(), records.len());
        for (x, predicted) in xs.iter().zip(&predictions) {
            let expected = if *x <= 0.0 { "neg" } else { "pos" };
            assert_eq!(predicted.as_str(), expected);
        }
    }

    #[test]
    fn empty_batch_gives_empty_output() {
        let forest = fixed_forest(&["cat"]);
        assert!(forest.predict_batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn empty_forest_rejected() {
        let forest = fixed_forest(&[]);
        assert!(matches!(forest.predict(&record(1.0)), Err(RfError::EmptyForest)));
        assert!(matches!(forest.vote(&record(1.0)), Err(RfError::EmptyForest)));
        assert!(matches!(
            forest.predict_batch(&[record(1.0)]),
            Err(RfError::EmptyForest)
        ));
    }

    #[test]
    fn schema_mismatch_names_record() {
        let forest = fixed_forest(&["cat"]);
        let records = vec![
            record(1.0),
            Record::new(vec![Value::from("striped")], label("cat")),
        ];
        let err = forest.predict_batch(&records).unwrap_err();
        assert!(matches!(err, RfError::SchemaMismatch { record_index: 1, .. }));
    }

    #[test]
    fn majority_of_empty_tally_is_none() {
        assert_eq!(majority(&BTreeMap::new()), None);
    }
}
