//! Rows and the schemas that bind them.
//!
//! A [`Row`] is an ordered list of `(field, value)` pairs where every value is
//! an opaque string. A [`Schema`] is the ordered list of field names a table
//! was created with; its first field is the primary key.

use serde::ser::{Serialize, Serializer};

use crate::error::{StoreError, StoreResult};

/// Ordered field names of a table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<String>,
}

impl Schema {
    /// Build a schema from field names.
    ///
    /// Fails if there are no fields, a name is blank, or a name repeats.
    pub fn new<I, S>(fields: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.is_empty() {
            return Err(StoreError::InvalidSchema("schema has no fields".into()));
        }
        for (i, field) in fields.iter().enumerate() {
            if field.trim().is_empty() {
                return Err(StoreError::InvalidSchema(format!(
                    "field {i} has an empty name"
                )));
            }
            if fields[..i].contains(field) {
                return Err(StoreError::InvalidSchema(format!(
                    "duplicate field name: {field}"
                )));
            }
        }
        Ok(Self { fields })
    }

    /// Derive the schema from an example row: its field names, in order.
    pub fn from_sample(sample: &Row) -> StoreResult<Self> {
        Self::new(sample.names())
    }

    /// Field names in order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of fields.
    pub(crate) fn len(&self) -> usize {
        self.fields.len()
    }

    /// Name of the primary-key field.
    pub fn primary_key(&self) -> &str {
        &self.fields[0]
    }

    /// Column index of `field`, if present.
    pub fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }

    /// Whether `header` names exactly these fields in this order.
    pub fn matches<S: AsRef<str>>(&self, header: &[S]) -> bool {
        self.fields.len() == header.len()
            && self
                .fields
                .iter()
                .zip(header)
                .all(|(field, name)| field == name.as_ref())
    }

    /// Pair raw column values with the field names.
    ///
    /// The caller guarantees `values.len() == self.len()`.
    pub(crate) fn hydrate(&self, values: Vec<String>) -> Row {
        Row {
            fields: self.fields.iter().cloned().zip(values).collect(),
        }
    }
}

/// One record: field names mapped to string values, in schema order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Row::set`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Set `field` to `value`.
    ///
    /// An existing field keeps its position; a new field is appended.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Value of `field`, if the row has it.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// The primary-key value: the first field's value.
    pub fn key(&self) -> Option<&str> {
        self.fields.first().map(|(_, value)| value.as_str())
    }

    /// Field names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Values in order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }

    /// `(field, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
