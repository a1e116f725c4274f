use std::collections::BTreeSet;

use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::{
    RfError,
    dataset::{Record, Schema},
    node::{Impurity, Node, NodeIndex},
    split::{SplitCriterion, find_best_split},
    trainer::{TrainedTree, TreeParams, TreeTrainer},
    value::ClassLabel,
};

/// Reference tree learner: greedy, top-down decision-tree induction.
///
/// Construct via [`CartTrainer::new`], then chain `with_*` methods.
///
/// A node becomes a leaf when it is empty (predicts the default class),
/// when it reached `max_depth`, when its majority class makes up at least
/// `purity_threshold` of its records, when it holds at most `min_examples`
/// records, or when no candidate attribute separates it. Leaves predict
/// the node's majority class, the smallest label on ties.
///
/// # Defaults
///
/// | Parameter   | Default   |
/// |-------------|-----------|
/// | `criterion` | `Entropy` |
#[derive(Debug, Clone, Default)]
pub struct CartTrainer {
    criterion: SplitCriterion,
}

impl CartTrainer {
    /// Create a new trainer with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the split quality criterion.
    #[must_use]
    pub fn with_criterion(mut self, criterion: SplitCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Return the split criterion.
    #[must_use]
    pub fn criterion(&self) -> SplitCriterion {
        self.criterion
    }
}

impl TreeTrainer for CartTrainer {
    type Tree = DecisionTree;

    /// Grow a decision tree on `sample`.
    ///
    /// An empty sample yields a single leaf predicting `default_class`.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`RfError::InvalidMaxDepth`] | `max_depth` is `Some(0)` |
    /// | [`RfError::InvalidPurityThreshold`] | `purity_threshold` is not in (0.0, 1.0] |
    /// | [`RfError::InvalidFeaturesPerSplit`] | `features_per_split` is 0 or exceeds the attribute count |
    #[instrument(skip_all, fields(n_samples = sample.len()))]
    fn train_tree(
        &self,
        schema: &Schema,
        sample: &[&Record],
        default_class: &ClassLabel,
        params: &TreeParams,
        rng: &mut ChaCha8Rng,
    ) -> Result<DecisionTree, RfError> {
        // --- Validate params ---
        if let Some(d) = params.max_depth
            && d == 0
        {
            return Err(RfError::InvalidMaxDepth { max_depth: 0 });
        }

        let threshold = params.purity_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(RfError::InvalidPurityThreshold { threshold });
        }

        let n_features = schema.n_features();
        let features_per_split = params.features_per_split.unwrap_or(n_features);
        if features_per_split == 0 || features_per_split > n_features {
            return Err(RfError::InvalidFeaturesPerSplit {
                features_per_split,
                n_features,
            });
        }

        // --- Class index ---
        let classes: Vec<ClassLabel> = sample
            .iter()
            .map(|r| r.label().clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let labels: Vec<usize> = sample
            .iter()
            .map(|r| classes.binary_search(r.label()).unwrap_or_default())
            .collect();

        let mut builder = TreeBuilder {
            schema,
            records: sample,
            labels: &labels,
            classes: &classes,
            default_class,
            params,
            criterion: self.criterion,
            features_per_split,
            arena: Vec::new(),
        };

        let sample_indices: Vec<usize> = (0..sample.len()).collect();
        let root = builder.grow(&sample_indices, 0, rng);
        let nodes = builder.arena;

        debug!(
            root_index = root.index(),
            n_nodes = nodes.len(),
            n_classes = classes.len(),
            "decision tree built"
        );

        Ok(DecisionTree { nodes, n_features })
    }
}

/// State shared by every recursive step of one tree's construction.
struct TreeBuilder<'a> {
    schema: &'a Schema,
    records: &'a [&'a Record],
    labels: &'a [usize],
    classes: &'a [ClassLabel],
    default_class: &'a ClassLabel,
    params: &'a TreeParams,
    criterion: SplitCriterion,
    features_per_split: usize,
    arena: Vec<Node>,
}

impl TreeBuilder<'_> {
    /// Recursively build the subtree for `sample_indices`.
    ///
    /// Returns the [`NodeIndex`] of the node just created in the arena.
    fn grow(&mut self, sample_indices: &[usize], depth: usize, rng: &mut ChaCha8Rng) -> NodeIndex {
        let n_samples = sample_indices.len();
        if n_samples == 0 {
            return self.push(Node::Leaf {
                label: self.default_class.clone(),
                impurity: Impurity::new(0.0),
                n_samples,
            });
        }

        let mut class_counts = vec![0usize; self.classes.len()];
        for &si in sample_indices {
            class_counts[self.labels[si]] += 1;
        }
        let impurity = self.criterion.impurity(&class_counts, n_samples);

        // First maximum wins: classes are sorted, so ties go to the smaller label.
        let (majority, majority_count) = class_counts.iter().enumerate().fold(
            (0usize, 0usize),
            |best, (idx, &count)| if count > best.1 { (idx, count) } else { best },
        );
        let purity = majority_count as f64 / n_samples as f64;

        let leaf = Node::Leaf {
            label: self.classes[majority].clone(),
            impurity,
            n_samples,
        };

        // Stopping conditions → leaf.
        let depth_exceeded = self.params.max_depth.is_some_and(|max_d| depth >= max_d);
        let too_few = n_samples <= self.params.min_examples;
        let pure_enough = purity >= self.params.purity_threshold;
        if depth_exceeded || too_few || pure_enough {
            return self.push(leaf);
        }

        let Some(split) = find_best_split(
            self.schema,
            self.records,
            self.labels,
            sample_indices,
            self.classes.len(),
            &self.criterion,
            self.features_per_split,
            rng,
        ) else {
            return self.push(leaf);
        };

        // Arena pattern: reserve index, recurse, then overwrite with the split.
        let node_idx = self.push(leaf);
        let left = self.grow(&split.left_indices, depth + 1, rng);
        let right = self.grow(&split.right_indices, depth + 1, rng);

        self.arena[node_idx.index()] = Node::Split {
            feature: split.feature,
            test: split.test,
            left,
            right,
            impurity,
            n_samples,
            impurity_decrease: split.impurity_decrease,
        };

        node_idx
    }

    fn push(&mut self, node: Node) -> NodeIndex {
        self.arena.push(node);
        NodeIndex::new(self.arena.len() - 1)
    }
}

/// A fitted decision tree.
///
/// Stored as an arena-based `Vec<Node>` with index references; the root
/// is at index 0.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_features: usize,
}

impl DecisionTree {
    /// Return the nodes in arena order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return the number of feature attributes the tree was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Return the total number of nodes in the tree (both splits and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the maximum depth of the tree.
    ///
    /// A single-node tree (just a root leaf) has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }

        // BFS: (node_index, current_depth)
        let mut max_depth = 0usize;
        let mut queue = std::collections::VecDeque::new();
        queue.push_back((0usize, 0usize));

        while let Some((node_idx, d)) = queue.pop_front() {
            match &self.nodes[node_idx] {
                Node::Leaf { .. } => max_depth = max_depth.max(d),
                Node::Split { left, right, .. } => {
                    queue.push_back((left.index(), d + 1));
                    queue.push_back((right.index(), d + 1));
                }
            }
        }

        max_depth
    }

    /// Traverse the tree from the root and return the arena index of the leaf.
    fn traverse(&self, record: &Record) -> usize {
        let mut idx = 0usize;
        while let Some(child) = self.nodes[idx].child_for(record) {
            idx = child.index();
        }
        idx
    }
}

impl TrainedTree for DecisionTree {
    /// Predict the class label for a single record.
    ///
    /// The record must match the training schema; the forest checks this
    /// before asking its trees.
    fn predict(&self, record: &Record) -> &ClassLabel {
        match &self.nodes[self.traverse(record)] {
            Node::Leaf { label, .. } => label,
            Node::Split { .. } => unreachable!("traverse always ends at a leaf"),
        }
    }
}
