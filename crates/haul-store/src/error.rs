use std::path::PathBuf;

/// Errors from record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A row with the same primary key is already stored.
    #[error("{table} with id {key} already exists")]
    DuplicateKey { table: String, key: String },

    /// The file header does not match the declared schema.
    #[error("{table} header {found:?} does not match schema {expected:?}")]
    SchemaMismatch {
        table: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// The queried field is not part of the schema.
    #[error("field '{field}' not found in {table} schema")]
    FieldNotFound { table: String, field: String },

    /// The table file exists but has no header line.
    #[error("{table} file has no header")]
    MissingHeader { table: String },

    /// The declared schema is unusable.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// The table path does not name a csv file.
    #[error("invalid table path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// A row handed to the store does not carry the schema's fields in order.
    #[error("{table} row fields {found:?} do not match schema {expected:?}")]
    RowShape {
        table: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A stored row has the wrong number of fields.
    #[error("{table} line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        table: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A field value could not be converted to its typed form.
    #[error("cannot decode field '{field}': {reason}")]
    Decode { field: String, reason: String },

    /// The table lock was poisoned by a panicking holder.
    #[error("table lock poisoned")]
    LockPoisoned,

    /// Failure reading or writing the delimited file.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error from the underlying file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Build a [`StoreError::Decode`] for `field`.
    pub fn decode(field: &str, reason: impl Into<String>) -> Self {
        Self::Decode {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for integrity violations that must never be retried.
    pub fn is_integrity_violation(&self) -> bool {
        matches!(
            self,
            Self::DuplicateKey { .. }
                | Self::SchemaMismatch { .. }
                | Self::FieldNotFound { .. }
                | Self::MissingHeader { .. }
                | Self::MalformedRow { .. }
        )
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
