//! CSV record reader with row cleaning and column kind inference.

use std::path::{Path, PathBuf};

use bosque_rf::{Attribute, AttributeKind, ClassLabel, Dataset, Record, Schema, Value};
use csv::StringRecord;
use tracing::{debug, info, instrument, warn};

use crate::IoError;

/// Reads a labeled dataset from a delimited text file.
///
/// The first row is the header unless column names are supplied with
/// [`RecordReader::with_column_names`]. Every column other than the target
/// becomes a feature attribute, in file order.
///
/// Rows that are blank, have the wrong number of columns, or contain an
/// empty cell are skipped and counted. A feature column is numeric when
/// every kept row holds a finite number in it, categorical otherwise.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::MissingTargetColumn`] | No column is named like the target |
/// | [`IoError::NoFeatureColumns`] | The target is the only column |
/// | [`IoError::NoUsableRows`] | Zero rows left after cleaning |
/// | [`IoError::Dataset`] | Duplicate column names or an empty label |
#[derive(Debug, Clone)]
pub struct RecordReader {
    path: PathBuf,
    target: String,
    column_names: Option<Vec<String>>,
    delimiter: u8,
}

impl RecordReader {
    /// Create a reader for `path` predicting the column named `target`.
    pub fn new(path: &Path, target: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            target: target.into(),
            column_names: None,
            delimiter: b',',
        }
    }

    /// Treat the file as headerless and use these column names instead.
    #[must_use]
    pub fn with_column_names(mut self, column_names: Vec<String>) -> Self {
        self.column_names = Some(column_names);
        self
    }

    /// Set the field delimiter (default `,`).
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read, clean, and type the file into a [`Dataset`].
    #[instrument(skip(self), fields(path = %self.path.display(), target = %self.target))]
    pub fn read(&self) -> Result<Dataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so short or long rows reach the cleaning step
        // instead of failing the whole read.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(self.column_names.is_none())
            .flexible(true)
            .trim(csv::Trim::All)
            .delimiter(self.delimiter)
            .from_reader(file);

        let columns: Vec<String> = match &self.column_names {
            Some(names) => names.clone(),
            None => rdr
                .headers()
                .map_err(|e| self.parse_error(e))?
                .iter()
                .map(String::from)
                .collect(),
        };
        debug!(n_columns = columns.len(), "resolved column names");

        let target_col = columns
            .iter()
            .position(|c| *c == self.target)
            .ok_or_else(|| IoError::MissingTargetColumn {
                path: self.path.clone(),
                target: self.target.clone(),
            })?;
        if columns.len() < 2 {
            return Err(IoError::NoFeatureColumns {
                path: self.path.clone(),
            });
        }

        let mut rows: Vec<StringRecord> = Vec::new();
        let mut skipped = 0usize;
        for result in rdr.records() {
            let row = result.map_err(|e| self.parse_error(e))?;
            if row.len() != columns.len() || row.iter().any(str::is_empty) {
                skipped += 1;
                continue;
            }
            rows.push(row);
        }
        if skipped > 0 {
            warn!(skipped, "skipped blank, short, or incomplete rows");
        }
        if rows.is_empty() {
            return Err(IoError::NoUsableRows {
                path: self.path.clone(),
                skipped,
            });
        }

        let feature_cols: Vec<usize> = (0..columns.len()).filter(|&c| c != target_col).collect();
        let attributes: Vec<Attribute> = feature_cols
            .iter()
            .map(|&c| {
                let numeric = rows.iter().all(|row| parse_finite(&row[c]).is_some());
                if numeric {
                    Attribute::numeric(columns[c].as_str())
                } else {
                    Attribute::categorical(columns[c].as_str())
                }
            })
            .collect();
        let schema = Schema::new(attributes, self.target.as_str())?;

        let records = rows
            .iter()
            .map(|row| -> Result<Record, IoError> {
                let values = feature_cols
                    .iter()
                    .zip(schema.attributes())
                    .map(|(&c, attribute)| match attribute.kind() {
                        AttributeKind::Numeric => {
                            Value::Number(parse_finite(&row[c]).unwrap_or_default())
                        }
                        AttributeKind::Categorical => Value::from(&row[c]),
                    })
                    .collect();
                Ok(Record::new(values, ClassLabel::new(&row[target_col])?))
            })
            .collect::<Result<Vec<Record>, IoError>>()?;

        let dataset = Dataset::new(schema, records)?;
        info!(
            n_records = dataset.len(),
            n_features = dataset.schema().n_features(),
            n_classes = dataset.class_counts().len(),
            skipped,
            "dataset loaded"
        );
        Ok(dataset)
    }

    fn parse_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|x| x.is_finite())
}
