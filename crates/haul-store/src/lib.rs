//! Schema-bound flat-file record storage for Haul.
//!
//! Every entity table in Haul is a single comma-delimited file: a header line
//! naming the fields, then one line per row. The first field of the schema is
//! the primary key. This crate owns that file format and the operations over
//! it; typed entities plug in through the [`Record`] trait.
//!
//! # Operations
//!
//! - [`RecordStore::open`] -- bind a handle to a file and a declared schema,
//!   creating a header-only file when none exists
//! - [`RecordStore::add`] -- append a row, rejecting duplicate primary keys
//! - [`RecordStore::find_by_id`] -- exact primary-key lookup
//! - [`RecordStore::find_by_field`] -- trimmed, case-insensitive field scan
//! - [`RecordStore::update`] / [`RecordStore::delete`] -- whole-row replace or
//!   removal by primary key
//!
//! # Design Rules
//!
//! 1. Primary keys are unique within a table.
//! 2. The on-disk header must equal the declared schema. This is checked
//!    before every read and mutation; a mismatch is fatal.
//! 3. Every row has exactly as many fields as the schema.
//! 4. There is no partial-field update: rows are replaced or removed whole.
//! 5. Every call re-reads the file. Nothing is cached, so results always
//!    reflect the last committed write, at O(n) per call.
//! 6. One writer per table. Within a process, share one [`RecordStore`] and
//!    use [`RecordStore::exclusive`] for read-modify-write sequences.

pub mod codec;
pub mod error;
pub mod row;
pub mod table;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use codec::Coded;
pub use error::{StoreError, StoreResult};
pub use row::{Row, Schema};
pub use table::{RecordStore, TableFile, TableSession};
pub use traits::Record;
