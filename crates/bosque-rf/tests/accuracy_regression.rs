//! Accuracy regression tests for bosque-rf.
//!
//! These tests verify that algorithmic changes do not degrade Random Forest
//! classification accuracy on a deterministic synthetic dataset.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bosque_rf::{
    Attribute, CartTrainer, ClassLabel, Dataset, ForestConfig, Record, Schema, SplitCriterion,
    Value,
};

// ---------------------------------------------------------------------------
// Helper: deterministic synthetic classification dataset
// ---------------------------------------------------------------------------

const CLASSES: [&str; 3] = ["alpha", "beta", "gamma"];
const SITES: [&str; 4] = ["north", "south", "east", "west"];

/// Generate a 300-record, 10-attribute, 3-class classification dataset.
///
/// Attributes f0-f2 are informative (class * 3.0 + noise in [0, 0.5]).
/// Attributes f3-f8 are pure noise in [0, 0.5]. `site` is a categorical
/// attribute drawn independently of the class.
/// Records are assigned round-robin across classes.
fn make_classification() -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let n_records = 300;
    let n_numeric = 9;

    let mut attributes: Vec<Attribute> = (0..n_numeric)
        .map(|f| Attribute::numeric(format!("f{f}")))
        .collect();
    attributes.push(Attribute::categorical("site"));
    let schema = Schema::new(attributes, "class").unwrap();

    let records = (0..n_records)
        .map(|i| {
            let class = i % CLASSES.len();
            let mut values: Vec<Value> = (0..n_numeric)
                .map(|f| {
                    let base = if f < 3 { class as f64 * 3.0 } else { 0.0 };
                    Value::Number(base + rng.r#gen::<f64>() * 0.5)
                })
                .collect();
            values.push(Value::from(SITES[rng.gen_range(0..SITES.len())]));
            Record::new(values, ClassLabel::new(CLASSES[class]).unwrap())
        })
        .collect();
    Dataset::new(schema, records).unwrap()
}

/// Split records by position: even positions train, odd positions validate.
fn even_odd(dataset: &Dataset) -> (Dataset, Vec<Record>) {
    let (train, validation): (Vec<_>, Vec<_>) = dataset
        .records()
        .iter()
        .cloned()
        .enumerate()
        .partition(|(i, _)| i % 2 == 0);
    let train = Dataset::new(
        dataset.schema().clone(),
        train.into_iter().map(|(_, r)| r).collect(),
    )
    .unwrap();
    (train, validation.into_iter().map(|(_, r)| r).collect())
}

// ---------------------------------------------------------------------------
// a) prediction_accuracy_on_training_data
// ---------------------------------------------------------------------------

/// Training accuracy with 50 trees must exceed 0.95.
///
/// Reference: observed training accuracy = 1.0 with seed=42, 50 trees.
#[test]
fn prediction_accuracy_on_training_data() {
    let data = make_classification();
    let forest = ForestConfig::new(50)
        .unwrap()
        .with_seed(42)
        .fit(&data, &CartTrainer::new())
        .unwrap();

    let accuracy = forest.evaluate(data.records()).unwrap();
    assert!(accuracy > 0.95, "training accuracy {accuracy} <= 0.95");
}

// ---------------------------------------------------------------------------
// b) holdout_accuracy_above_threshold
// ---------------------------------------------------------------------------

/// Accuracy on records never seen in training must exceed 0.90.
#[test]
fn holdout_accuracy_above_threshold() {
    let (train, validation) = even_odd(&make_classification());
    let forest = ForestConfig::new(50)
        .unwrap()
        .with_seed(42)
        .fit(&train, &CartTrainer::new())
        .unwrap();

    let accuracy = forest.evaluate(&validation).unwrap();
    assert!(accuracy > 0.90, "holdout accuracy {accuracy} <= 0.90");
}

// ---------------------------------------------------------------------------
// c) feature_subsampling_keeps_accuracy
// ---------------------------------------------------------------------------

/// Considering only 3 of 10 attributes per split must still learn the data.
#[test]
fn feature_subsampling_keeps_accuracy() {
    let (train, validation) = even_odd(&make_classification());
    let forest = ForestConfig::new(50)
        .unwrap()
        .with_seed(42)
        .with_features_per_split(Some(3))
        .fit(&train, &CartTrainer::new())
        .unwrap();

    let accuracy = forest.evaluate(&validation).unwrap();
    assert!(accuracy > 0.90, "subsampled holdout accuracy {accuracy} <= 0.90");
}

// ---------------------------------------------------------------------------
// d) gini_criterion_fits_training_data
// ---------------------------------------------------------------------------

/// Both criteria must fit separable data.
#[test]
fn gini_criterion_fits_training_data() {
    let data = make_classification();
    let trainer = CartTrainer::new().with_criterion(SplitCriterion::Gini);
    let forest = ForestConfig::new(20)
        .unwrap()
        .with_seed(42)
        .fit(&data, &trainer)
        .unwrap();

    let accuracy = forest.evaluate(data.records()).unwrap();
    assert!(accuracy > 0.95, "gini training accuracy {accuracy} <= 0.95");
}

// ---------------------------------------------------------------------------
// e) deterministic_predictions
// ---------------------------------------------------------------------------

/// Same config and seed must produce identical predictions across two independent runs.
#[test]
fn deterministic_predictions() {
    let data = make_classification();
    let config = ForestConfig::new(30)
        .unwrap()
        .with_seed(42)
        .with_features_per_split(Some(2));

    let forest1 = config.fit(&data, &CartTrainer::new()).unwrap();
    let forest2 = config.fit(&data, &CartTrainer::new()).unwrap();

    let preds1 = forest1.predict_batch(data.records()).unwrap();
    let preds2 = forest2.predict_batch(data.records()).unwrap();

    assert_eq!(
        preds1, preds2,
        "predictions differ across runs with the same seed"
    );
}

// ---------------------------------------------------------------------------
// f) ensemble_shape
// ---------------------------------------------------------------------------

/// A forest has exactly as many trees as requested, one prediction per
/// record, and every prediction is a class seen in training.
#[test]
fn ensemble_shape() {
    let data = make_classification();
    let known: Vec<ClassLabel> = CLASSES.iter().map(|&c| ClassLabel::new(c).unwrap()).collect();

    for k in 1..=6 {
        let forest = ForestConfig::new(k)
            .unwrap()
            .with_max_depth(Some(2))
            .fit(&data, &CartTrainer::new())
            .unwrap();
        assert_eq!(forest.n_trees(), k);
        assert!(forest.trees().iter().all(|t| t.depth() <= 2));

        let predictions = forest.predict_batch(data.records()).unwrap();
        assert_eq!(predictions.len(), data.len());
        assert!(predictions.iter().all(|p| known.contains(p)));

        let accuracy = forest.evaluate(data.records()).unwrap();
        assert!((0.0..=1.0).contains(&accuracy));
    }
}

// ---------------------------------------------------------------------------
// g) confusion_matrix_on_holdout
// ---------------------------------------------------------------------------

/// Per-class recall on held-out records must be high for every class.
#[test]
fn confusion_matrix_on_holdout() {
    let (train, validation) = even_odd(&make_classification());
    let forest = ForestConfig::new(30)
        .unwrap()
        .with_seed(7)
        .fit(&train, &CartTrainer::new())
        .unwrap();

    let cm = forest.confusion(&validation).unwrap();
    assert_eq!(cm.n_classes(), 3);
    for metrics in cm.class_metrics() {
        assert_eq!(metrics.support, 50);
        assert!(
            metrics.recall > 0.85,
            "recall for {} is {}",
            metrics.class,
            metrics.recall
        );
    }
}
