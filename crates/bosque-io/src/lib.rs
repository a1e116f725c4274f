//! File I/O, holdout splitting, and JSON reports for the bosque pipeline.

mod domain;
mod error;
mod holdout;
mod reader;
mod writer;

pub use domain::{ExperimentName, SweepParameter, SweepPoint, SweepReport};
pub use error::IoError;
pub use holdout::holdout_split;
pub use reader::RecordReader;
pub use writer::ResultWriter;
