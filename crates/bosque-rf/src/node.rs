use std::fmt;

use crate::dataset::Record;
use crate::value::{ClassLabel, Value};

/// Zero-based feature attribute index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureIndex(usize);

impl FeatureIndex {
    /// Create a new feature index from a zero-based attribute position.
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based attribute index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FeatureIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index into a `Vec<Node>` arena, identifying a specific node in a decision tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Create a new node index from a zero-based arena position.
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Criterion-agnostic impurity value (Gini or Entropy).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Impurity(f64);

impl Impurity {
    /// Create a new impurity value.
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw impurity value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Impurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// The test applied at a split node. A record that passes goes left.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitTest {
    /// Numeric attribute: `value <= threshold`.
    Threshold(f64),
    /// Categorical attribute: `value == category`.
    Equals(String),
}

impl SplitTest {
    /// Return `true` when `value` passes the test.
    ///
    /// A value of the other kind never passes.
    #[must_use]
    pub fn passes(&self, value: &Value) -> bool {
        match (self, value) {
            (SplitTest::Threshold(t), Value::Number(x)) => x <= t,
            (SplitTest::Equals(c), Value::Category(v)) => c == v,
            _ => false,
        }
    }
}

impl fmt::Display for SplitTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitTest::Threshold(t) => write!(f, "<= {t}"),
            SplitTest::Equals(c) => write!(f, "== {c:?}"),
        }
    }
}

/// A node in a decision tree arena.
///
/// Trees are stored as `Vec<Node>` where children are referenced by
/// [`NodeIndex`] rather than pointers.
#[derive(Debug, Clone)]
pub enum Node {
    /// An interior split node.
    Split {
        /// Attribute tested at this node.
        feature: FeatureIndex,
        /// The test; passing records go left.
        test: SplitTest,
        /// Index of the left child node.
        left: NodeIndex,
        /// Index of the right child node.
        right: NodeIndex,
        /// Impurity at this node before splitting.
        impurity: Impurity,
        /// Number of training records that reached this node.
        n_samples: usize,
        /// Weighted decrease in impurity from this split.
        impurity_decrease: f64,
    },
    /// A terminal leaf node.
    Leaf {
        /// Predicted class.
        label: ClassLabel,
        /// Impurity at this leaf.
        impurity: Impurity,
        /// Number of training records in this leaf.
        n_samples: usize,
    },
}

impl Node {
    /// Return the impurity at this node (before splitting for interior nodes).
    #[must_use]
    pub fn impurity(&self) -> Impurity {
        match self {
            Node::Split { impurity, .. } | Node::Leaf { impurity, .. } => *impurity,
        }
    }

    /// Return the number of training records that reached this node.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        match self {
            Node::Split { n_samples, .. } | Node::Leaf { n_samples, .. } => *n_samples,
        }
    }

    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// For a split node, return the child `record` descends into.
    pub(crate) fn child_for(&self, record: &Record) -> Option<NodeIndex> {
        match self {
            Node::Leaf { .. } => None,
            Node::Split {
                feature,
                test,
                left,
                right,
                ..
            } => {
                if test.passes(record.value(*feature)) {
                    Some(*left)
                } else {
                    Some(*right)
                }
            }
        }
    }
}
