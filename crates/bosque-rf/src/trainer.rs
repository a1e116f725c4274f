//! The contract between the forest and the tree learner.
//!
//! The forest only ever trains trees through [`TreeTrainer`] and only ever
//! queries them through [`TrainedTree`], so any tree implementation with
//! these two operations can back an ensemble.

use rand_chacha::ChaCha8Rng;

use crate::dataset::{Record, Schema};
use crate::error::RfError;
use crate::value::ClassLabel;

/// Stopping and regularization parameters handed to the tree trainer.
///
/// The forest forwards these verbatim and never interprets them.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeParams {
    /// Maximum tree depth; `None` means unlimited. The root is depth 0.
    pub max_depth: Option<usize>,
    /// Majority-class fraction at which a node stops splitting.
    pub purity_threshold: f64,
    /// Nodes with at most this many records become leaves.
    pub min_examples: usize,
    /// Number of attributes drawn at random as split candidates at each
    /// node; `None` means all attributes are considered.
    pub features_per_split: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            purity_threshold: 1.0,
            min_examples: 0,
            features_per_split: None,
        }
    }
}

/// A trained classifier whose only observable behavior is predicting a label.
pub trait TrainedTree: Send + Sync {
    /// Predict the class label for one record of the training schema.
    fn predict(&self, record: &Record) -> &ClassLabel;
}

/// Something that can grow a [`TrainedTree`] from a sample.
///
/// Implementations must be deterministic for a given `rng` state and must
/// always produce a usable tree for a well-formed, non-empty sample (for
/// example a single leaf on a one-class sample). Errors are returned to the
/// forest caller unchanged.
pub trait TreeTrainer: Sync {
    /// The tree type this trainer produces.
    type Tree: TrainedTree;

    /// Train one tree.
    ///
    /// `sample` is a bootstrap sample of records checked against `schema`;
    /// it may contain the same record several times. `rng` is the tree's
    /// own generator, already advanced past the bootstrap draws.
    ///
    /// # Errors
    ///
    /// Any error the implementation chooses to report, typically invalid
    /// `params`. Third-party trainers wrap foreign errors in
    /// [`RfError::Trainer`].
    fn train_tree(
        &self,
        schema: &Schema,
        sample: &[&Record],
        default_class: &ClassLabel,
        params: &TreeParams,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self::Tree, RfError>;
}
