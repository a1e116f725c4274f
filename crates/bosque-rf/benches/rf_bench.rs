//! Criterion benchmarks for bosque-rf: Random Forest training and prediction.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bosque_rf::{Attribute, CartTrainer, ClassLabel, Dataset, ForestConfig, Record, Schema, Value};

fn make_classification(n_records: usize, n_features: usize, n_classes: usize, seed: u64) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let attributes = (0..n_features)
        .map(|f| Attribute::numeric(format!("f{f}")))
        .collect();
    let schema = Schema::new(attributes, "class").unwrap();
    let labels: Vec<ClassLabel> = (0..n_classes)
        .map(|c| ClassLabel::new(format!("c{c}")).unwrap())
        .collect();

    let records = (0..n_records)
        .map(|i| {
            let class = i % n_classes;
            let values = (0..n_features)
                .map(|f| {
                    let base = if f < 3 { class as f64 * 3.0 } else { 0.0 };
                    Value::Number(base + rng.r#gen::<f64>() * 0.5)
                })
                .collect();
            Record::new(values, labels[class].clone())
        })
        .collect();
    Dataset::new(schema, records).unwrap()
}

fn bench_rf_train(c: &mut Criterion) {
    let data = make_classification(500, 20, 5, 42);
    let cfg = ForestConfig::new(50).unwrap().with_seed(42);
    let trainer = CartTrainer::new();

    c.bench_function("rf_train_500x20_5class_50trees", |b| {
        b.iter(|| cfg.fit(&data, &trainer).unwrap());
    });
}

fn bench_rf_train_subsampled(c: &mut Criterion) {
    let data = make_classification(500, 20, 5, 42);
    let cfg = ForestConfig::new(50)
        .unwrap()
        .with_seed(42)
        .with_features_per_split(Some(4));
    let trainer = CartTrainer::new();

    c.bench_function("rf_train_500x20_5class_50trees_4feat", |b| {
        b.iter(|| cfg.fit(&data, &trainer).unwrap());
    });
}

fn bench_rf_predict_batch(c: &mut Criterion) {
    let data = make_classification(500, 20, 5, 42);
    let cfg = ForestConfig::new(50).unwrap().with_seed(42);
    let forest = cfg.fit(&data, &CartTrainer::new()).unwrap();

    c.bench_function("rf_predict_batch_500x20_50trees", |b| {
        b.iter(|| forest.predict_batch(data.records()).unwrap());
    });
}

fn bench_single_tree(c: &mut Criterion) {
    // Proxy for split-finding: train a single-tree forest on 500 records.
    let data = make_classification(500, 20, 5, 42);
    let cfg = ForestConfig::new(1).unwrap().with_seed(42);
    let trainer = CartTrainer::new();

    c.bench_function("rf_single_tree_500x20_5class", |b| {
        b.iter(|| cfg.fit(&data, &trainer).unwrap());
    });
}

criterion_group!(
    benches,
    bench_rf_train,
    bench_rf_train_subsampled,
    bench_rf_predict_batch,
    bench_single_tree
);
criterion_main!(benches);
