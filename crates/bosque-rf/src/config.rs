//! Configuration builder for Random Forest training.

use crate::dataset::Dataset;
use crate::error::RfError;
use crate::forest::Forest;
use crate::trainer::{TreeParams, TreeTrainer};
use crate::value::ClassLabel;

/// Configuration for Random Forest training.
///
/// Construct via [`ForestConfig::new`], then chain `with_*` methods.
/// Everything except `n_trees`, `default_class` and `seed` is forwarded to
/// the tree trainer untouched.
///
/// # Defaults
///
/// | Parameter            | Default                        |
/// |----------------------|--------------------------------|
/// | `default_class`      | majority class of the dataset  |
/// | `max_depth`          | `None`                         |
/// | `purity_threshold`   | 1.0                            |
/// | `min_examples`       | 0                              |
/// | `features_per_split` | `None` (all attributes)        |
/// | `seed`               | 42                             |
#[derive(Debug, Clone)]
pub struct ForestConfig {
    pub(crate) n_trees: usize,
    pub(crate) default_class: Option<ClassLabel>,
    pub(crate) tree_params: TreeParams,
    pub(crate) seed: u64,
}

impl ForestConfig {
    /// Default number of trees, as used by the command-line driver.
    pub const DEFAULT_N_TREES: usize = 10;

    /// Create a new config with the given number of trees.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::InvalidTreeCount`] if `n_trees` is zero.
    pub fn new(n_trees: usize) -> Result<Self, RfError> {
        if n_trees == 0 {
            return Err(RfError::InvalidTreeCount { n_trees });
        }
        Ok(Self {
            n_trees,
            default_class: None,
            tree_params: TreeParams::default(),
            seed: 42,
        })
    }

    // --- Setters ---

    /// Set the fallback class the trainer uses for empty nodes.
    #[must_use]
    pub fn with_default_class(mut self, default_class: ClassLabel) -> Self {
        self.default_class = Some(default_class);
        self
    }

    /// Set the maximum tree depth. `None` means unlimited.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.tree_params.max_depth = max_depth;
        self
    }

    /// Set the majority fraction at which a node stops splitting.
    #[must_use]
    pub fn with_purity_threshold(mut self, purity_threshold: f64) -> Self {
        self.tree_params.purity_threshold = purity_threshold;
        self
    }

    /// Set the node size at or below which a node stops splitting.
    #[must_use]
    pub fn with_min_examples(mut self, min_examples: usize) -> Self {
        self.tree_params.min_examples = min_examples;
        self
    }

    /// Set how many randomly drawn attributes each split considers.
    /// `None` considers all of them (plain bagging).
    #[must_use]
    pub fn with_features_per_split(mut self, features_per_split: Option<usize>) -> Self {
        self.tree_params.features_per_split = features_per_split;
        self
    }

    /// Replace all tree parameters at once.
    #[must_use]
    pub fn with_tree_params(mut self, tree_params: TreeParams) -> Self {
        self.tree_params = tree_params;
        self
    }

    /// Set the random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    // --- Getters ---

    /// Return the number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Return the configured default class, if any.
    #[must_use]
    pub fn default_class(&self) -> Option<&ClassLabel> {
        self.default_class.as_ref()
    }

    /// Return the parameters forwarded to the tree trainer.
    #[must_use]
    pub fn tree_params(&self) -> &TreeParams {
        &self.tree_params
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Train a forest on `dataset` with `trainer`.
    ///
    /// # Errors
    ///
    /// | Variant                  | When                                   |
    /// |--------------------------|----------------------------------------|
    /// | [`RfError::EmptyDataset`] | `dataset` has no records              |
    /// | any trainer error        | the trainer rejected its inputs; returned unchanged |
    pub fn fit<T: TreeTrainer>(
        &self,
        dataset: &Dataset,
        trainer: &T,
    ) -> Result<Forest<T::Tree>, RfError> {
        crate::forest::train(self, dataset, trainer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_trees_rejected() {
        assert!(matches!(
            ForestConfig::new(0),
            Err(RfError::InvalidTreeCount { n_trees: 0 })
        ));
    }

    #[test]
    fn defaults() {
        let config = ForestConfig::new(ForestConfig::DEFAULT_N_TREES).unwrap();
        assert_eq!(config.n_trees(), 10);
        assert_eq!(config.seed(), 42);
        assert!(config.default_class().is_none());
        assert_eq!(config.tree_params(), &TreeParams::default());
    }

    #[test]
    fn setters_forward_to_tree_params() {
        let config = ForestConfig::new(3)
            .unwrap()
            .with_max_depth(Some(4))
            .with_purity_threshold(0.9)
            .with_min_examples(5)
            .with_features_per_split(Some(2))
            .with_seed(7);
        let params = config.tree_params();
        assert_eq!(params.max_depth, Some(4));
        assert!((params.purity_threshold - 0.9).abs() < f64::EPSILON);
        assert_eq!(params.min_examples, 5);
        assert_eq!(params.features_per_split, Some(2));
        assert_eq!(config.seed(), 7);
    }
}
