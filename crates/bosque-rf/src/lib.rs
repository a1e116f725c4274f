//! Random Forest classification: train, predict, evaluate.
//!
//! A forest is trained by drawing one bootstrap sample per tree and handing
//! each sample to a [`TreeTrainer`]. Prediction is a plurality vote over the
//! trees; ties go to the smallest label. Trees are grown in parallel with
//! rayon from per-tree seeds drawn up front, so a fixed seed gives the same
//! forest on any number of threads.
//!
//! [`CartTrainer`] is the bundled tree learner: binary splits on numeric
//! thresholds and categorical equality, chosen by information gain or Gini
//! decrease over an optional random subset of attributes per node.

mod config;
mod confusion;
mod dataset;
mod error;
mod eval;
mod forest;
mod node;
mod predict;
mod split;
mod trainer;
mod tree;
mod value;

pub use config::ForestConfig;
pub use confusion::{ClassMetrics, ConfusionMatrix};
pub use dataset::{Attribute, Dataset, Record, Schema};
pub use error::RfError;
pub use forest::Forest;
pub use node::{FeatureIndex, Impurity, Node, NodeIndex, SplitTest};
pub use predict::VoteTally;
pub use split::SplitCriterion;
pub use trainer::{TrainedTree, TreeParams, TreeTrainer};
pub use tree::{CartTrainer, DecisionTree};
pub use value::{AttributeKind, ClassLabel, Value};
