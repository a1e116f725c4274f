//! Domain types for bosque-io.

use serde::Serialize;

use crate::IoError;

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The forest setting varied by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SweepParameter {
    /// Number of trees in the ensemble.
    NTrees,
    /// Maximum depth of each tree.
    MaxDepth,
    /// Attributes considered per split.
    FeaturesPerSplit,
}

impl std::fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SweepParameter::NTrees => "n-trees",
            SweepParameter::MaxDepth => "max-depth",
            SweepParameter::FeaturesPerSplit => "features-per-split",
        })
    }
}

/// Accuracy of one forest trained at one sweep value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint {
    /// The parameter value; `None` means unlimited (max depth) or all
    /// attributes (features per split).
    pub value: Option<usize>,
    /// Accuracy on the training records.
    pub train_accuracy: f64,
    /// Accuracy on the held-out records.
    pub validation_accuracy: f64,
}

/// Results of training one forest per value of a single parameter.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    /// The varied parameter.
    pub parameter: SweepParameter,
    /// Master seed shared by every forest in the sweep.
    pub seed: u64,
    /// Number of training records.
    pub n_train: usize,
    /// Number of validation records.
    pub n_validation: usize,
    /// One entry per swept value, in the order given.
    pub points: Vec<SweepPoint>,
}

impl SweepReport {
    /// Return the point with the highest validation accuracy, the first on ties.
    #[must_use]
    pub fn best(&self) -> Option<&SweepPoint> {
        self.points.iter().fold(None, |best, p| match best {
            Some(b) if b.validation_accuracy >= p.validation_accuracy => Some(b),
            _ => Some(p),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experiment_name_valid() {
        let name = ExperimentName::new("iris-depth_01".to_string());
        assert!(name.is_ok());
        assert_eq!(name.unwrap().as_str(), "iris-depth_01");
    }

    #[test]
    fn experiment_name_rejects_empty() {
        let name = ExperimentName::new(String::new());
        assert!(matches!(name, Err(IoError::InvalidExperimentName { .. })));
    }

    #[test]
    fn experiment_name_rejects_special_chars() {
        let name = ExperimentName::new("../escape".to_string());
        assert!(matches!(name, Err(IoError::InvalidExperimentName { .. })));
    }

    #[test]
    fn sweep_parameter_serializes_like_its_flag() {
        let json = serde_json::to_string(&SweepParameter::FeaturesPerSplit).unwrap();
        assert_eq!(json, "\"features-per-split\"");
        assert_eq!(SweepParameter::NTrees.to_string(), "n-trees");
    }

    #[test]
    fn best_point_prefers_first_on_ties() {
        let point = |value, validation_accuracy| SweepPoint {
            value,
            train_accuracy: 1.0,
            validation_accuracy,
        };
        let report = SweepReport {
            parameter: SweepParameter::MaxDepth,
            seed: 42,
            n_train: 120,
            n_validation: 30,
            points: vec![point(Some(1), 0.6), point(Some(3), 0.9), point(None, 0.9)],
        };
        assert_eq!(report.best().and_then(|p| p.value), Some(3));
    }
}
