/// Errors from Random Forest operations.
#[derive(Debug, thiserror::Error)]
pub enum RfError {
    /// Returned when n_trees is zero.
    #[error("n_trees must be at least 1, got {n_trees}")]
    InvalidTreeCount {
        /// The invalid n_trees value provided.
        n_trees: usize,
    },

    /// Returned when max_depth is zero.
    #[error("max_depth must be at least 1, got {max_depth}")]
    InvalidMaxDepth {
        /// The invalid max_depth value provided.
        max_depth: usize,
    },

    /// Returned when the purity threshold is not in (0.0, 1.0].
    #[error("purity_threshold must be in (0.0, 1.0], got {threshold}")]
    InvalidPurityThreshold {
        /// The invalid threshold provided.
        threshold: f64,
    },

    /// Returned when features_per_split is zero or exceeds n_features.
    #[error("features_per_split is {features_per_split}, but must be in [1, {n_features}]")]
    InvalidFeaturesPerSplit {
        /// The requested number of candidate attributes per split.
        features_per_split: usize,
        /// The number of feature attributes in the schema.
        n_features: usize,
    },

    /// Returned when training is requested on a dataset with zero records.
    #[error("training dataset has zero records")]
    EmptyDataset,

    /// Returned when accuracy is requested over zero records.
    #[error("cannot evaluate accuracy over zero records")]
    EmptyEvaluationSet,

    /// Returned when prediction is requested from a forest with no trees.
    #[error("forest has no trees, majority vote is undefined")]
    EmptyForest,

    /// Returned when a schema declares no feature attributes.
    #[error("schema has no feature attributes")]
    ZeroFeatures,

    /// Returned when an attribute name appears twice in a schema.
    #[error("attribute {name:?} is declared more than once")]
    DuplicateAttribute {
        /// The repeated attribute name.
        name: String,
    },

    /// Returned when a raw record has no value for the target attribute.
    #[error("record has no value for target attribute {target:?}")]
    MissingTarget {
        /// Name of the target attribute.
        target: String,
    },

    /// Returned when a raw record has no value for a declared feature attribute.
    #[error("record has no value for attribute {name:?}")]
    MissingAttribute {
        /// Name of the missing attribute.
        name: String,
    },

    /// Returned when a class label is the empty string.
    #[error("class label must not be empty")]
    EmptyLabel,

    /// Returned when a numeric value is NaN or infinite.
    #[error("non-finite value for attribute {name:?}")]
    NonFiniteValue {
        /// Name of the offending attribute.
        name: String,
    },

    /// Returned when a record does not fit the schema it is checked against.
    #[error("record {record_index} does not match the schema: {reason}")]
    SchemaMismatch {
        /// The zero-based index of the offending record.
        record_index: usize,
        /// Human-readable description of the mismatch.
        reason: String,
    },

    /// Returned by third-party tree trainers that fail for their own reasons.
    #[error("tree trainer failed")]
    Trainer {
        /// The trainer's own error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
