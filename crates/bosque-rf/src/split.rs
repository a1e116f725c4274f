use std::collections::BTreeMap;

use rand::Rng;

use crate::dataset::{Record, Schema};
use crate::node::{FeatureIndex, Impurity, SplitTest};
use crate::value::AttributeKind;

/// Criterion for measuring the quality of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitCriterion {
    /// Gini impurity: 1 - Σ(p_i²)
    Gini,
    /// Information entropy: -Σ(p_i · ln(p_i))
    #[default]
    Entropy,
}

impl SplitCriterion {
    /// Compute the impurity of a node from its class counts.
    ///
    /// Returns [`Impurity::new(0.0)`] when `n_samples` is zero (pure node).
    ///
    /// For `Gini`: `1 - Σ(p_i²)` where `p_i = count_i / n_samples`.
    /// For `Entropy`: `-Σ(p_i · ln(p_i))` summed only over classes where `p_i > 0`.
    #[must_use]
    pub fn impurity(&self, class_counts: &[usize], n_samples: usize) -> Impurity {
        if n_samples == 0 {
            return Impurity::new(0.0);
        }
        let n = n_samples as f64;
        let value = match self {
            SplitCriterion::Gini => {
                let sum_sq: f64 = class_counts
                    .iter()
                    .map(|&c| {
                        let p = c as f64 / n;
                        p * p
                    })
                    .sum();
                1.0 - sum_sq
            }
            SplitCriterion::Entropy => {
                -class_counts
                    .iter()
                    .filter(|&&c| c > 0)
                    .map(|&c| {
                        let p = c as f64 / n;
                        p * p.ln()
                    })
                    .sum::<f64>()
            }
        };
        Impurity::new(value)
    }
}

/// Result of finding the best split for a node.
#[derive(Debug, Clone)]
pub(crate) struct SplitResult {
    /// Attribute used for the split.
    pub(crate) feature: FeatureIndex,
    /// Test applied to the attribute.
    pub(crate) test: SplitTest,
    /// Weighted impurity decrease from this split.
    pub(crate) impurity_decrease: f64,
    /// Sample positions going to the left child.
    pub(crate) left_indices: Vec<usize>,
    /// Sample positions going to the right child.
    pub(crate) right_indices: Vec<usize>,
}

/// Pick `take` distinct attribute positions out of `n_features`.
///
/// Partial Fisher-Yates: only the first `take` positions are shuffled.
/// With `take == n_features` no randomness is consumed.
pub(crate) fn select_features(n_features: usize, take: usize, rng: &mut impl Rng) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n_features).collect();
    if take >= n_features {
        return order;
    }
    for i in 0..take {
        let j = rng.gen_range(i..n_features);
        order.swap(i, j);
    }
    order.truncate(take);
    order
}

/// Find the best split among a random subset of attributes.
///
/// `records` is the tree's training sample; `labels[i]` is the class
/// index of `records[i]`; `sample_indices` are the positions that reached
/// the current node.
///
/// Numeric attributes are sorted and scanned left to right with
/// incremental class counts; thresholds sit halfway between consecutive
/// distinct values. Categorical attributes try one equality test per
/// category seen at the node, in category order. The first split with the
/// largest weighted impurity decrease wins.
///
/// Returns `None` when no attribute separates the node (every candidate
/// attribute is constant over `sample_indices`).
#[allow(clippy::too_many_arguments)]
pub(crate) fn find_best_split(
    schema: &Schema,
    records: &[&Record],
    labels: &[usize],
    sample_indices: &[usize],
    n_classes: usize,
    criterion: &SplitCriterion,
    features_per_split: usize,
    rng: &mut impl Rng,
) -> Option<SplitResult> {
    let n_samples = sample_indices.len();
    if n_samples < 2 {
        return None;
    }

    let mut parent_counts = vec![0usize; n_classes];
    for &si in sample_indices {
        parent_counts[labels[si]] += 1;
    }
    let parent_impurity = criterion.impurity(&parent_counts, n_samples);

    let weighted_decrease = |left: &[usize], n_left: usize, right: &[usize]| -> f64 {
        let n_right = n_samples - n_left;
        (n_samples as f64) * parent_impurity.value()
            - (n_left as f64) * criterion.impurity(left, n_left).value()
            - (n_right as f64) * criterion.impurity(right, n_right).value()
    };

    let mut best_decrease = f64::NEG_INFINITY;
    let mut best: Option<(FeatureIndex, SplitTest)> = None;

    for feat_idx in select_features(schema.n_features(), features_per_split, rng) {
        let feature = FeatureIndex::new(feat_idx);
        match schema.attribute(feature).kind() {
            AttributeKind::Numeric => {
                let mut sorted: Vec<(f64, usize)> = sample_indices
                    .iter()
                    .filter_map(|&si| records[si].value(feature).as_number().map(|x| (x, si)))
                    .collect();
                sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

                let mut left_counts = vec![0usize; n_classes];
                let mut right_counts = parent_counts.clone();

                for i in 0..sorted.len().saturating_sub(1) {
                    let (val_i, si) = sorted[i];
                    let class_i = labels[si];
                    left_counts[class_i] += 1;
                    right_counts[class_i] -= 1;

                    let val_next = sorted[i + 1].0;
                    if val_i == val_next {
                        continue;
                    }

                    let decrease = weighted_decrease(&left_counts, i + 1, &right_counts);
                    if decrease > best_decrease {
                        best_decrease = decrease;
                        best = Some((feature, SplitTest::Threshold(midpoint(val_i, val_next))));
                    }
                }
            }
            AttributeKind::Categorical => {
                let mut per_category: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
                for &si in sample_indices {
                    if let Some(category) = records[si].value(feature).as_category() {
                        per_category
                            .entry(category)
                            .or_insert_with(|| vec![0usize; n_classes])[labels[si]] += 1;
                    }
                }
                if per_category.len() < 2 {
                    continue;
                }

                for (category, left_counts) in &per_category {
                    let n_left: usize = left_counts.iter().sum();
                    let right_counts: Vec<usize> = parent_counts
                        .iter()
                        .zip(left_counts)
                        .map(|(p, l)| p - l)
                        .collect();

                    let decrease = weighted_decrease(left_counts, n_left, &right_counts);
                    if decrease > best_decrease {
                        best_decrease = decrease;
                        best = Some((feature, SplitTest::Equals((*category).to_string())));
                    }
                }
            }
        }
    }

    let (feature, test) = best?;

    let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = sample_indices
        .iter()
        .copied()
        .partition(|&si| test.passes(records[si].value(feature)));
    if left_indices.is_empty() || right_indices.is_empty() {
        return None;
    }

    Some(SplitResult {
        feature,
        test,
        impurity_decrease: best_decrease,
        left_indices,
        right_indices,
    })
}

/// Threshold between two distinct sorted values `lo < hi`.
///
/// Always satisfies `lo <= t < hi`, so `x <= t` sends `lo` left and `hi`
/// right even for adjacent floats or values near `f64::MAX`.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo + (hi - lo) / 2.0;
    if mid < hi { mid } else { lo }
}
