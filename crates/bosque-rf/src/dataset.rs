//! Typed records and datasets.
//!
//! A [`Schema`] fixes the feature attributes (name and kind, in order) and
//! the name of the target attribute. Records carry their feature values in
//! schema order plus the class label, so nothing downstream looks values up
//! by name. Raw name → value maps are converted exactly once, at the
//! ingestion boundary, by [`Schema::record_from_map`].

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::RfError;
use crate::node::FeatureIndex;
use crate::value::{AttributeKind, ClassLabel, Value};

/// A named feature attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    kind: AttributeKind,
}

impl Attribute {
    /// Create a numeric attribute.
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Numeric,
        }
    }

    /// Create a categorical attribute.
    pub fn categorical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Categorical,
        }
    }

    /// Return the attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the attribute kind.
    #[must_use]
    pub fn kind(&self) -> AttributeKind {
        self.kind
    }
}

/// Attribute layout shared by every record of a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    attributes: Vec<Attribute>,
    target: String,
}

impl Schema {
    /// Create a schema from feature attributes and the target attribute name.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RfError::ZeroFeatures`] | `attributes` is empty |
    /// | [`RfError::DuplicateAttribute`] | a name repeats, or a feature is named like the target |
    pub fn new(attributes: Vec<Attribute>, target: impl Into<String>) -> Result<Self, RfError> {
        let target = target.into();
        if attributes.is_empty() {
            return Err(RfError::ZeroFeatures);
        }
        let mut seen: HashSet<&str> = HashSet::with_capacity(attributes.len() + 1);
        seen.insert(&target);
        for attribute in &attributes {
            if !seen.insert(&attribute.name) {
                return Err(RfError::DuplicateAttribute {
                    name: attribute.name.clone(),
                });
            }
        }
        Ok(Self { attributes, target })
    }

    /// Return the feature attributes in order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Return the attribute at `index`.
    #[must_use]
    pub fn attribute(&self, index: FeatureIndex) -> &Attribute {
        &self.attributes[index.index()]
    }

    /// Return the target attribute name.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Return the number of feature attributes.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.attributes.len()
    }

    /// Return the position of a feature attribute by name.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<FeatureIndex> {
        self.attributes
            .iter()
            .position(|a| a.name == name)
            .map(FeatureIndex::new)
    }

    /// Build a typed record from a name → value map.
    ///
    /// The target value becomes the class label (numbers are rendered with
    /// their `Display` form). Entries for names outside the schema are
    /// ignored.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RfError::MissingTarget`] | no value for the target |
    /// | [`RfError::MissingAttribute`] | no value for a feature attribute |
    /// | [`RfError::SchemaMismatch`] | a value has the wrong kind |
    /// | [`RfError::NonFiniteValue`] | a numeric value is NaN or infinite |
    /// | [`RfError::EmptyLabel`] | the target value is an empty string |
    pub fn record_from_map(&self, raw: &HashMap<String, Value>) -> Result<Record, RfError> {
        let label = raw
            .get(&self.target)
            .ok_or_else(|| RfError::MissingTarget {
                target: self.target.clone(),
            })?;
        let label = ClassLabel::new(label.to_string())?;

        let values = self
            .attributes
            .iter()
            .map(|attribute| {
                raw.get(&attribute.name)
                    .cloned()
                    .ok_or_else(|| RfError::MissingAttribute {
                        name: attribute.name.clone(),
                    })
            })
            .collect::<Result<Vec<Value>, RfError>>()?;

        let record = Record::new(values, label);
        self.check(&record, 0)?;
        Ok(record)
    }

    /// Check that a record fits this schema.
    ///
    /// `record_index` is only used to label the error.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::SchemaMismatch`] on a wrong value count or kind and
    /// [`RfError::NonFiniteValue`] on a NaN or infinite number.
    pub fn check(&self, record: &Record, record_index: usize) -> Result<(), RfError> {
        if record.values.len() != self.attributes.len() {
            return Err(RfError::SchemaMismatch {
                record_index,
                reason: format!(
                    "{} values, expected {}",
                    record.values.len(),
                    self.attributes.len()
                ),
            });
        }
        for (attribute, value) in self.attributes.iter().zip(&record.values) {
            if value.kind() != attribute.kind {
                return Err(RfError::SchemaMismatch {
                    record_index,
                    reason: format!(
                        "attribute {:?} is {}, got a {} value",
                        attribute.name,
                        attribute.kind,
                        value.kind()
                    ),
                });
            }
            if let Value::Number(x) = value
                && !x.is_finite()
            {
                return Err(RfError::NonFiniteValue {
                    name: attribute.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// One labeled example: feature values in schema order and its class.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<Value>,
    label: ClassLabel,
}

impl Record {
    /// Create a record. It is checked against a schema when it enters a
    /// [`Dataset`] or reaches a forest.
    pub fn new(values: Vec<Value>, label: ClassLabel) -> Self {
        Self { values, label }
    }

    /// Return all feature values in schema order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Return the feature value at `index`.
    #[must_use]
    pub fn value(&self, index: FeatureIndex) -> &Value {
        &self.values[index.index()]
    }

    /// Return the class label.
    #[must_use]
    pub fn label(&self) -> &ClassLabel {
        &self.label
    }
}

/// An ordered, schema-checked collection of records.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Schema,
    records: Vec<Record>,
}

impl Dataset {
    /// Create a dataset, checking every record against `schema`.
    ///
    /// An empty record list is allowed.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`Schema::check`].
    pub fn new(schema: Schema, records: Vec<Record>) -> Result<Self, RfError> {
        for (i, record) in records.iter().enumerate() {
            schema.check(record, i)?;
        }
        Ok(Self { schema, records })
    }

    /// Return the schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Return the records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consume the dataset and return its records.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Return the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return `true` when the dataset has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count records per class label.
    #[must_use]
    pub fn class_counts(&self) -> BTreeMap<&ClassLabel, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.label()).or_insert(0) += 1;
        }
        counts
    }

    /// Return the most common class, the smallest label on ties.
    ///
    /// `None` for an empty dataset.
    #[must_use]
    pub fn majority_class(&self) -> Option<ClassLabel> {
        crate::predict::majority(&self.class_counts()).cloned()
    }
}
