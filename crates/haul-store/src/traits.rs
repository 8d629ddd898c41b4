//! The [`Record`] trait implemented by typed entities.

use crate::error::StoreResult;
use crate::row::Row;

/// A typed entity that persists as one [`Row`].
///
/// Implementations must satisfy these invariants:
/// - `to_row` emits the same field names, in the same order, as `sample`.
/// - The first field is the entity's primary key.
/// - `from_row(&r.to_row())` reproduces `r`.
pub trait Record: Sized {
    /// Entity name used in log lines and error messages.
    const NAME: &'static str;

    /// An example row whose field names define the table schema.
    fn sample() -> Row;

    /// Serialize into a row.
    fn to_row(&self) -> Row;

    /// Rebuild from a row read out of the store.
    ///
    /// Returns [`StoreError::Decode`](crate::StoreError::Decode) when a field
    /// is missing or holds a value of the wrong form.
    fn from_row(row: &Row) -> StoreResult<Self>;
}
