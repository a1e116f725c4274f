//! I/O error types for bosque-io.

use std::path::PathBuf;

use bosque_rf::RfError;

/// Errors from file I/O, CSV parsing, dataset splitting, and report writing.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the target column is not among the file's columns.
    #[error("target column \"{target}\" not found in {path}")]
    MissingTargetColumn {
        /// Path to the CSV file.
        path: PathBuf,
        /// The requested target column.
        target: String,
    },

    /// Returned when the file has no columns besides the target.
    #[error("no feature columns in {path}")]
    NoFeatureColumns {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when every data row was skipped or there were none.
    #[error("no usable rows in {path} ({skipped} skipped)")]
    NoUsableRows {
        /// Path to the CSV file.
        path: PathBuf,
        /// Number of rows dropped during cleaning.
        skipped: usize,
    },

    /// Returned when the data violates a dataset invariant.
    #[error(transparent)]
    Dataset(#[from] RfError),

    /// Returned when the holdout fraction is not in (0, 1].
    #[error("invalid train fraction {fraction}: must be in (0, 1]")]
    InvalidTrainFraction {
        /// The rejected fraction.
        fraction: f64,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result cannot be serialized.
    #[error("cannot serialize result for {path}")]
    Serialize {
        /// Destination path.
        path: PathBuf,
        /// Underlying serialization error.
        source: serde_json::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
