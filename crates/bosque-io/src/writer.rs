//! JSON result writer for evaluation and sweep outputs.

use std::fs;
use std::path::{Path, PathBuf};

use bosque_rf::ConfusionMatrix;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{ExperimentName, SweepPoint, SweepReport};

/// Writes experiment results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_evaluate.json` and
/// `{experiment}_sweep.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Write a parameter sweep to `{experiment}_sweep.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all, fields(parameter = %report.parameter, n_points = report.points.len()))]
    pub fn write_sweep(&self, report: &SweepReport) -> Result<PathBuf, IoError> {
        let path = self.path_for("sweep");
        let artifact = SweepArtifact {
            experiment: self.experiment.as_str(),
            best: report.best(),
            report,
        };
        write_json(&path, &artifact)?;
        info!(path = %path.display(), "sweep result written");
        Ok(path)
    }

    /// Write holdout accuracies and a confusion matrix to
    /// `{experiment}_evaluate.json`.
    ///
    /// `validation_accuracy` is `None` when the forest was trained on every
    /// record; `confusion` then describes the training records and the
    /// file says so in `confusion_set`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_evaluation(
        &self,
        train_accuracy: f64,
        validation_accuracy: Option<f64>,
        confusion: &ConfusionMatrix,
    ) -> Result<PathBuf, IoError> {
        let path = self.path_for("evaluate");

        let class_metrics: Vec<ClassEntry> = confusion
            .class_metrics()
            .into_iter()
            .map(|m| ClassEntry {
                class: m.class.to_string(),
                precision: m.precision,
                recall: m.recall,
                f1: m.f1,
                support: m.support,
            })
            .collect();

        let artifact = EvaluateArtifact {
            experiment: self.experiment.as_str(),
            train_accuracy,
            validation_accuracy,
            confusion_set: if validation_accuracy.is_some() {
                "validation"
            } else {
                "training"
            },
            classes: confusion.classes().iter().map(|c| c.as_str()).collect(),
            confusion_matrix: confusion.as_rows(),
            class_metrics,
        };
        write_json(&path, &artifact)?;
        info!(path = %path.display(), "evaluation result written");
        Ok(path)
    }

    fn path_for(&self, kind: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{kind}.json", self.experiment.as_str()))
    }
}

fn write_json(path: &Path, artifact: &impl Serialize) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, json).map_err(|e| IoError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct SweepArtifact<'a> {
    experiment: &'a str,
    best: Option<&'a SweepPoint>,
    #[serde(flatten)]
    report: &'a SweepReport,
}

#[derive(Serialize)]
struct EvaluateArtifact<'a> {
    experiment: &'a str,
    train_accuracy: f64,
    validation_accuracy: Option<f64>,
    confusion_set: &'static str,
    classes: Vec<&'a str>,
    confusion_matrix: &'a [Vec<usize>],
    class_metrics: Vec<ClassEntry>,
}

#[derive(Serialize)]
struct ClassEntry {
    class: String,
    precision: f64,
    recall: f64,
    f1: f64,
    support: usize,
}
