//! Attribute values and class labels.

use std::fmt;

use crate::error::RfError;

/// Kind of a feature attribute, fixed by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// Finite floating-point values.
    Numeric,
    /// Free-form string categories.
    Categorical,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKind::Numeric => f.write_str("numeric"),
            AttributeKind::Categorical => f.write_str("categorical"),
        }
    }
}

/// A single feature value of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A finite number.
    Number(f64),
    /// A category name.
    Category(String),
}

impl Value {
    /// Return the kind this value belongs to.
    #[must_use]
    pub fn kind(&self) -> AttributeKind {
        match self {
            Value::Number(_) => AttributeKind::Numeric,
            Value::Category(_) => AttributeKind::Categorical,
        }
    }

    /// Return the number, if this is a numeric value.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(x) => Some(*x),
            Value::Category(_) => None,
        }
    }

    /// Return the category name, if this is a categorical value.
    #[must_use]
    pub fn as_category(&self) -> Option<&str> {
        match self {
            Value::Number(_) => None,
            Value::Category(c) => Some(c),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Category(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Category(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(x) => write!(f, "{x}"),
            Value::Category(c) => f.write_str(c),
        }
    }
}

/// A class label, the value of the target attribute.
///
/// Labels are compared and ordered as plain strings. The ordering decides
/// vote ties: among equally voted labels the smallest one wins.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ClassLabel(String);

impl ClassLabel {
    /// Create a class label from a non-empty string.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::EmptyLabel`] if `label` is empty.
    pub fn new(label: impl Into<String>) -> Result<Self, RfError> {
        let label = label.into();
        if label.is_empty() {
            return Err(RfError::EmptyLabel);
        }
        Ok(Self(label))
    }

    /// Return the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_label_rejected() {
        assert!(matches!(ClassLabel::new(""), Err(RfError::EmptyLabel)));
    }

    #[test]
    fn labels_order_lexicographically() {
        let cat = ClassLabel::new("cat").unwrap();
        let dog = ClassLabel::new("dog").unwrap();
        assert!(cat < dog);
        assert_eq!(format!("{cat}"), "cat");
    }

    #[test]
    fn value_kinds() {
        assert_eq!(Value::from(1.5).kind(), AttributeKind::Numeric);
        assert_eq!(Value::from("red").kind(), AttributeKind::Categorical);
        assert_eq!(Value::from(2.0).as_number(), Some(2.0));
        assert_eq!(Value::from("red").as_category(), Some("red"));
        assert_eq!(Value::from("red").as_number(), None);
    }
}
