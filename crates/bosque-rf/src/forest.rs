//! Random Forest training with parallel tree construction.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::config::ForestConfig;
use crate::dataset::{Dataset, Record, Schema};
use crate::error::RfError;
use crate::trainer::{TrainedTree, TreeTrainer};

/// A trained Random Forest ensemble.
///
/// Immutable once built. Safe to share across threads for prediction.
#[derive(Debug, Clone)]
pub struct Forest<T> {
    pub(crate) trees: Vec<T>,
    pub(crate) schema: Schema,
}

impl<T: TrainedTree> Forest<T> {
    /// Assemble a forest from already trained trees.
    ///
    /// The list may be empty; predicting with an empty forest fails with
    /// [`RfError::EmptyForest`].
    #[must_use]
    pub fn from_trees(schema: Schema, trees: Vec<T>) -> Self {
        Self { trees, schema }
    }

    /// Return the trees in training order.
    #[must_use]
    pub fn trees(&self) -> &[T] {
        &self.trees
    }

    /// Return the number of trees in the ensemble.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Return the schema records must match.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// Draw `n_samples` positions uniformly with replacement from `0..n_samples`.
fn bootstrap_sample(n_samples: usize, rng: &mut impl Rng) -> Vec<usize> {
    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
}

/// Train the Random Forest ensemble.
#[instrument(skip_all, fields(n_trees = config.n_trees, n_samples = dataset.len()))]
pub(crate) fn train<T: TreeTrainer>(
    config: &ForestConfig,
    dataset: &Dataset,
    trainer: &T,
) -> Result<Forest<T::Tree>, RfError> {
    if dataset.is_empty() {
        return Err(RfError::EmptyDataset);
    }
    let n_samples = dataset.len();
    let schema = dataset.schema();
    let records = dataset.records();

    let default_class = match &config.default_class {
        Some(class) => class.clone(),
        None => dataset.majority_class().ok_or(RfError::EmptyDataset)?,
    };

    info!(
        n_trees = config.n_trees,
        n_samples,
        n_features = schema.n_features(),
        default_class = %default_class,
        features_per_split = ?config.tree_params.features_per_split,
        "training random forest"
    );

    // Generate per-tree seeds from master RNG before dispatch, so the result
    // does not depend on how rayon schedules the trees.
    let mut master_rng = ChaCha8Rng::seed_from_u64(config.seed);
    let tree_seeds: Vec<u64> = (0..config.n_trees).map(|_| master_rng.r#gen()).collect();

    let params = &config.tree_params;
    let default_class = &default_class;

    let trees: Vec<T::Tree> = tree_seeds
        .into_par_iter()
        .enumerate()
        .map(|(tree_index, seed)| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let indices = bootstrap_sample(n_samples, &mut rng);
            let sample: Vec<&Record> = indices.iter().map(|&i| &records[i]).collect();

            if tracing::enabled!(tracing::Level::DEBUG) {
                let mut distinct = indices.clone();
                distinct.sort_unstable();
                distinct.dedup();
                debug!(tree_index, distinct = distinct.len(), "bootstrap sample drawn");
            }

            trainer.train_tree(schema, &sample, default_class, params, &mut rng)
        })
        .collect::<Result<Vec<_>, RfError>>()?;

    info!(n_trees_trained = trees.len(), "random forest training complete");

    Ok(Forest {
        trees,
        schema: schema.clone(),
    })
}
