//! Shuffled train/validation split of a dataset.

use bosque_rf::Dataset;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::IoError;

/// Shuffle a copy of `dataset` and split it into `(train, validation)`.
///
/// The first `floor(train_fraction * len)` shuffled records go to the
/// training set, the rest to validation. Both keep the input schema. The
/// same seed always yields the same split. A fraction of exactly 1 trains
/// on every record and leaves the validation set empty.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::InvalidTrainFraction`] | `train_fraction` is not in (0, 1] |
#[instrument(skip(dataset), fields(n_records = dataset.len()))]
pub fn holdout_split(
    dataset: &Dataset,
    train_fraction: f64,
    seed: u64,
) -> Result<(Dataset, Dataset), IoError> {
    if !(train_fraction > 0.0 && train_fraction <= 1.0) {
        return Err(IoError::InvalidTrainFraction {
            fraction: train_fraction,
        });
    }

    let mut records = dataset.records().to_vec();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    records.shuffle(&mut rng);

    let n_train = (train_fraction * records.len() as f64) as usize;
    let validation = records.split_off(n_train);
    debug!(n_train, n_validation = validation.len(), "holdout split");

    let schema = dataset.schema().clone();
    Ok((
        Dataset::new(schema.clone(), records)?,
        Dataset::new(schema, validation)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bosque_rf::{Attribute, ClassLabel, Record, Schema, Value};

    fn numbered(n: usize) -> Dataset {
        let schema = Schema::new(vec![Attribute::numeric("i")], "class").unwrap();
        let records = (0..n)
            .map(|i| {
                Record::new(
                    vec![Value::Number(i as f64)],
                    ClassLabel::new(if i % 2 == 0 { "even" } else { "odd" }).unwrap(),
                )
            })
            .collect();
        Dataset::new(schema, records).unwrap()
    }

    fn ids(dataset: &Dataset) -> Vec<f64> {
        dataset
            .records()
            .iter()
            .filter_map(|r| r.values()[0].as_number())
            .collect()
    }

    #[test]
    fn sizes_follow_fraction() {
        let (train, validation) = holdout_split(&numbered(150), 0.8, 42).unwrap();
        assert_eq!(train.len(), 120);
        assert_eq!(validation.len(), 30);
    }

    #[test]
    fn partition_covers_every_record_once() {
        let (train, validation) = holdout_split(&numbered(37), 0.5, 1).unwrap();
        let mut all = ids(&train);
        all.extend(ids(&validation));
        all.sort_by(f64::total_cmp);
        let expected: Vec<f64> = (0..37).map(|i| i as f64).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn same_seed_same_split() {
        let data = numbered(50);
        let (a, _) = holdout_split(&data, 0.7, 9).unwrap();
        let (b, _) = holdout_split(&data, 0.7, 9).unwrap();
        let (c, _) = holdout_split(&data, 0.7, 10).unwrap();
        assert_eq!(ids(&a), ids(&b));
        assert_ne!(ids(&a), ids(&c));
    }

    #[test]
    fn records_are_shuffled() {
        let (train, _) = holdout_split(&numbered(100), 0.9, 42).unwrap();
        let in_order: Vec<f64> = (0..90).map(|i| i as f64).collect();
        assert_ne!(ids(&train), in_order);
    }

    #[test]
    fn full_fraction_keeps_every_record_for_training() {
        let (train, validation) = holdout_split(&numbered(25), 1.0, 42).unwrap();
        assert_eq!(train.len(), 25);
        assert!(validation.is_empty());
        let mut all = ids(&train);
        all.sort_by(f64::total_cmp);
        assert_eq!(all, (0..25).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn invalid_fraction_rejected() {
        for fraction in [0.0, 1.0 + f64::EPSILON, -0.5, 1.5, f64::NAN] {
            let err = holdout_split(&numbered(10), fraction, 42).unwrap_err();
            assert!(matches!(err, IoError::InvalidTrainFraction { .. }));
        }
    }
}
