//! The flat-file table and its handles.
//!
//! [`TableFile`] performs the file work: every operation re-reads the whole
//! file and checks its header against the declared schema, and `update` and
//! `delete` rewrite the whole file through a temporary file that is renamed
//! over the table file. [`RecordStore`] is the shareable handle that serializes
//! those operations behind a mutex, and [`TableSession`] keeps that mutex
//! held across several operations.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::row::{Row, Schema};
use crate::traits::Record;

/// Raw column values of one stored row, in schema order.
type RawRow = Vec<String>;

/// A schema-bound table file.
///
/// `TableFile` does no synchronization of its own. It is reached through a
/// [`RecordStore`] (one operation per lock) or a [`TableSession`] (many
/// operations per lock).
pub struct TableFile {
    path: PathBuf,
    schema: Schema,
    name: String,
}

impl TableFile {
    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The declared schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Entity name used in logs and errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append `row`.
    ///
    /// Fails with [`StoreError::DuplicateKey`] if a row with the same primary
    /// key is already stored; the file is left untouched.
    pub fn add(&self, row: &Row) -> StoreResult<()> {
        let rows = self.load()?;
        let key = self.key_of(row)?;
        if rows.iter().any(|existing| existing[0] == key) {
            warn!(table = %self.name, field = self.schema.primary_key(), key, "duplicate key");
            return Err(StoreError::DuplicateKey {
                table: self.name.clone(),
                key: key.to_string(),
            });
        }

        let mut file = OpenOptions::new().read(true).append(true).open(&self.path)?;
        if !ends_with_newline(&mut file)? {
            file.write_all(b"\n")?;
        }
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(row.values())?;
        writer.flush()?;

        info!(table = %self.name, key, "added row");
        Ok(())
    }

    /// The row whose primary key equals `id` exactly, or `None`.
    pub fn find_by_id(&self, id: &str) -> StoreResult<Option<Row>> {
        let found = self
            .load()?
            .into_iter()
            .find(|values| values[0] == id)
            .map(|values| self.schema.hydrate(values));
        debug!(table = %self.name, id, found = found.is_some(), "find by id");
        Ok(found)
    }

    /// Every row whose `field` equals `value`, ignoring case and surrounding
    /// whitespace on both sides. Rows come back in file order.
    pub fn find_by_field(&self, field: &str, value: &str) -> StoreResult<Vec<Row>> {
        let rows = self.load()?;
        let index = self
            .schema
            .position(field)
            .ok_or_else(|| StoreError::FieldNotFound {
                table: self.name.clone(),
                field: field.to_string(),
            })?;

        let wanted = normalize(value);
        let matched: Vec<Row> = rows
            .into_iter()
            .filter(|values| normalize(&values[index]) == wanted)
            .map(|values| self.schema.hydrate(values))
            .collect();
        debug!(table = %self.name, field, value, matched = matched.len(), "find by field");
        Ok(matched)
    }

    /// Every stored row in file order.
    pub fn rows(&self) -> StoreResult<Vec<Row>> {
        Ok(self
            .load()?
            .into_iter()
            .map(|values| self.schema.hydrate(values))
            .collect())
    }

    /// Replace the stored row that shares `row`'s primary key.
    ///
    /// Returns `false` without touching the file when no such row exists.
    pub fn update(&self, row: &Row) -> StoreResult<bool> {
        let mut rows = self.load()?;
        let key = self.key_of(row)?;
        let Some(slot) = rows.iter_mut().find(|existing| existing[0] == key) else {
            warn!(table = %self.name, key, "update skipped: no row with this id");
            return Ok(false);
        };
        *slot = row.values().map(str::to_string).collect();

        self.rewrite(&rows)?;
        info!(table = %self.name, key, "updated row");
        Ok(true)
    }

    /// Remove the stored row that shares `row`'s primary key.
    ///
    /// Returns `false` without touching the file when no such row exists.
    pub fn delete(&self, row: &Row) -> StoreResult<bool> {
        let mut rows = self.load()?;
        let key = self.key_of(row)?;
        let before = rows.len();
        rows.retain(|existing| existing[0] != key);
        if rows.len() == before {
            warn!(table = %self.name, key, "delete skipped: no row with this id");
            return Ok(false);
        }

        self.rewrite(&rows)?;
        info!(table = %self.name, key, "deleted row");
        Ok(true)
    }

    // ---------------------------------------------------------------
    // File access
    // ---------------------------------------------------------------

    /// Write a header-only file, creating parent directories as needed.
    fn create(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(self.schema.fields())?;
        writer.flush()?;

        info!(table = %self.name, path = %self.path.display(), "created table");
        Ok(())
    }

    /// Read every data row after checking the header against the schema.
    fn load(&self) -> StoreResult<Vec<RawRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;
        let mut records = reader.records();

        let header: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(str::to_string).collect(),
            None => {
                return Err(StoreError::MissingHeader {
                    table: self.name.clone(),
                })
            }
        };
        if !self.schema.matches(&header) {
            return Err(StoreError::SchemaMismatch {
                table: self.name.clone(),
                expected: self.schema.fields().to_vec(),
                found: header,
            });
        }

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            if record.len() != self.schema.len() {
                return Err(StoreError::MalformedRow {
                    table: self.name.clone(),
                    line: record.position().map_or(0, |p| p.line()),
                    expected: self.schema.len(),
                    found: record.len(),
                });
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(table = %self.name, rows = rows.len(), "loaded table");
        Ok(rows)
    }

    /// Replace the file with the header plus `rows`, all at once.
    fn rewrite(&self, rows: &[RawRow]) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir)?;
        {
            let mut writer = csv::Writer::from_writer(staged.as_file_mut());
            writer.write_record(self.schema.fields())?;
            for values in rows {
                writer.write_record(values)?;
            }
            writer.flush()?;
        }
        let permissions = fs::metadata(&self.path)?.permissions();
        staged.as_file().set_permissions(permissions)?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|e| e.error)?;

        debug!(table = %self.name, rows = rows.len(), "rewrote table");
        Ok(())
    }

    /// Check `row` against the schema and return its primary key.
    fn key_of<'r>(&self, row: &'r Row) -> StoreResult<&'r str> {
        if !self.schema.matches(&row.names().collect::<Vec<_>>()) {
            return Err(StoreError::RowShape {
                table: self.name.clone(),
                expected: self.schema.fields().to_vec(),
                found: row.names().map(str::to_string).collect(),
            });
        }
        row.get(self.schema.primary_key())
            .ok_or_else(|| StoreError::RowShape {
                table: self.name.clone(),
                expected: self.schema.fields().to_vec(),
                found: Vec::new(),
            })
    }
}

/// Whether `file` is empty or its last byte is a line feed.
fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Shareable handle to one table.
///
/// Each call takes the handle's lock, performs a full read (and, for
/// mutations, a full write) of the file, and releases the lock before
/// returning. Nothing is cached between calls.
///
/// Keep one `RecordStore` per table file in a process and share it (e.g.
/// behind an `Arc`). Two handles on the same file do not coordinate, and
/// nothing coordinates across processes: run a single writer per table.
pub struct RecordStore {
    table: TableFile,
    lock: Mutex<()>,
}

impl RecordStore {
    /// Bind a handle to `path` with the schema given by `sample`'s fields.
    ///
    /// Creates a header-only file when `path` does not exist. An existing
    /// file is not inspected here; its header is checked by every later
    /// operation.
    pub fn open(
        path: impl AsRef<Path>,
        sample: &Row,
        name: impl Into<String>,
    ) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
            return Err(StoreError::InvalidPath(path));
        }
        let table = TableFile {
            path,
            schema: Schema::from_sample(sample)?,
            name: name.into(),
        };
        if !table.path.exists() {
            table.create()?;
        }
        debug!(table = %table.name, path = %table.path.display(), "opened table");

        Ok(Self {
            table,
            lock: Mutex::new(()),
        })
    }

    /// Open the table for a [`Record`] type.
    pub fn open_for<R: Record>(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open(path, &R::sample(), R::NAME)
    }

    /// Hold the table lock until the returned session is dropped.
    ///
    /// Use this for read-modify-write sequences that must not interleave
    /// with other callers of this handle.
    pub fn exclusive(&self) -> StoreResult<TableSession<'_>> {
        let guard = self.lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(TableSession {
            table: &self.table,
            _guard: guard,
        })
    }

    /// See [`TableFile::add`].
    pub fn add(&self, row: &Row) -> StoreResult<()> {
        self.exclusive()?.add(row)
    }

    /// See [`TableFile::find_by_id`].
    pub fn find_by_id(&self, id: &str) -> StoreResult<Option<Row>> {
        self.exclusive()?.find_by_id(id)
    }

    /// See [`TableFile::find_by_field`].
    pub fn find_by_field(&self, field: &str, value: &str) -> StoreResult<Vec<Row>> {
        self.exclusive()?.find_by_field(field, value)
    }

    /// See [`TableFile::rows`].
    pub fn rows(&self) -> StoreResult<Vec<Row>> {
        self.exclusive()?.rows()
    }

    /// See [`TableFile::update`].
    pub fn update(&self, row: &Row) -> StoreResult<bool> {
        self.exclusive()?.update(row)
    }

    /// See [`TableFile::delete`].
    pub fn delete(&self, row: &Row) -> StoreResult<bool> {
        self.exclusive()?.delete(row)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        self.table.path()
    }

    /// The declared schema.
    pub fn schema(&self) -> &Schema {
        self.table.schema()
    }

    /// Entity name used in logs and errors.
    pub fn name(&self) -> &str {
        self.table.name()
    }
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("name", &self.table.name)
            .field("path", &self.table.path)
            .field("fields", &self.table.schema.fields())
            .finish()
    }
}

/// Exclusive access to a table for the lifetime of the session.
pub struct TableSession<'a> {
    table: &'a TableFile,
    _guard: MutexGuard<'a, ()>,
}

impl Deref for TableSession<'_> {
    type Target = TableFile;

    fn deref(&self) -> &TableFile {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn customer(id: &str, name: &str, city: &str) -> Row {
        Row::new()
            .with("id", id)
            .with("name", name)
            .with("city", city)
    }

    fn sample() -> Row {
        customer("", "", "")
    }

    fn temp_store() -> (tempfile::TempDir, RecordStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("customer.csv"), &sample(), "Customer").unwrap();
        (dir, store)
    }

    fn ids(rows: &[Row]) -> Vec<String> {
        rows.iter()
            .map(|row| row.key().unwrap_or_default().to_string())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Open / bootstrap
    // -----------------------------------------------------------------------

    #[test]
    fn open_creates_header_only_file() {
        let (_dir, store) = temp_store();
        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(text.trim_end(), "id,name,city");
        assert!(store.rows().unwrap().is_empty());
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/customer.csv");
        RecordStore::open(&path, &sample(), "Customer").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn open_rejects_non_csv_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = RecordStore::open(dir.path().join("customer.txt"), &sample(), "Customer").unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath(_)));
    }

    #[test]
    fn open_rejects_empty_sample() {
        let dir = tempfile::tempdir().unwrap();
        let err = RecordStore::open(dir.path().join("t.csv"), &Row::new(), "T").unwrap_err();
        assert!(matches!(err, StoreError::InvalidSchema(_)));
    }

    #[test]
    fn open_keeps_existing_rows() {
        let (dir, store) = temp_store();
        store.add(&customer("c1", "Anna", "Lerum")).unwrap();
        drop(store);

        let reopened = RecordStore::open(dir.path().join("customer.csv"), &sample(), "Customer").unwrap();
        assert_eq!(reopened.rows().unwrap().len(), 1);
    }

    // -----------------------------------------------------------------------
    // Schema integrity
    // -----------------------------------------------------------------------

    #[test]
    fn mismatched_header_is_fatal_for_every_operation() {
        let (dir, store) = temp_store();
        store.add(&customer("c1", "Anna", "Lerum")).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let other = Row::new().with("id", "").with("city", "").with("name", "");
        let wrong = RecordStore::open(dir.path().join("customer.csv"), &other, "Customer").unwrap();
        let row = Row::new().with("id", "c2").with("city", "Malmo").with("name", "Bo");

        assert!(matches!(wrong.find_by_id("c1"), Err(StoreError::SchemaMismatch { .. })));
        assert!(matches!(wrong.find_by_field("city", "Lerum"), Err(StoreError::SchemaMismatch { .. })));
        assert!(matches!(wrong.rows(), Err(StoreError::SchemaMismatch { .. })));
        assert!(matches!(wrong.add(&row), Err(StoreError::SchemaMismatch { .. })));
        assert!(matches!(wrong.update(&row), Err(StoreError::SchemaMismatch { .. })));
        assert!(matches!(wrong.delete(&row), Err(StoreError::SchemaMismatch { .. })));

        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn extra_header_column_is_a_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customer.csv");
        fs::write(&path, "id,name,city,country\n").unwrap();
        let store = RecordStore::open(&path, &sample(), "Customer").unwrap();
        let err = store.find_by_id("c1").unwrap_err();
        assert!(err.is_integrity_violation());
        assert!(matches!(err, StoreError::SchemaMismatch { found, .. } if found.len() == 4));
    }

    #[test]
    fn empty_file_has_no_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customer.csv");
        fs::write(&path, "").unwrap();
        let store = RecordStore::open(&path, &sample(), "Customer").unwrap();
        assert!(matches!(store.rows(), Err(StoreError::MissingHeader { .. })));
    }

    #[test]
    fn short_stored_row_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customer.csv");
        fs::write(&path, "id,name,city\nc1,Anna,Lerum\nc2,Bo\n").unwrap();
        let store = RecordStore::open(&path, &sample(), "Customer").unwrap();
        let err = store.find_by_id("c1").unwrap_err();
        assert!(matches!(
            err,
            StoreError::MalformedRow { line: 3, expected: 3, found: 2, .. }
        ));
    }

    #[test]
    fn add_after_header_without_line_break() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customer.csv");
        fs::write(&path, "id,name,city").unwrap();
        let store = RecordStore::open(&path, &sample(), "Customer").unwrap();

        store.add(&customer("c1", "Anna", "Lerum")).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "id,name,city\nc1,Anna,Lerum\n");
        assert_eq!(ids(&store.rows().unwrap()), ["c1"]);
    }

    #[test]
    fn add_after_data_row_without_line_break() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customer.csv");
        fs::write(&path, "id,name,city\nc1,Anna,Lerum").unwrap();
        let store = RecordStore::open(&path, &sample(), "Customer").unwrap();

        store.add(&customer("c2", "Bo", "Malmo")).unwrap();
        assert_eq!(ids(&store.rows().unwrap()), ["c1", "c2"]);
    }

    #[test]
    fn row_with_wrong_fields_is_rejected() {
        let (_dir, store) = temp_store();
        let partial = Row::new().with("id", "c1").with("name", "Anna");
        assert!(matches!(store.add(&partial), Err(StoreError::RowShape { .. })));

        let reordered = Row::new().with("name", "Anna").with("id", "c1").with("city", "Lerum");
        assert!(matches!(store.add(&reordered), Err(StoreError::RowShape { .. })));
        assert!(store.rows().unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Add / find
    // -----------------------------------------------------------------------

    #[test]
    fn add_then_find_by_id() {
        let (_dir, store) = temp_store();
        let row = customer("c1", "Anna", "Lerum");
        store.add(&row).unwrap();
        assert_eq!(store.find_by_id("c1").unwrap(), Some(row));
    }

    #[test]
    fn find_by_id_is_exact() {
        let (_dir, store) = temp_store();
        store.add(&customer("c1", "Anna", "Lerum")).unwrap();
        assert_eq!(store.find_by_id("C1").unwrap(), None);
        assert_eq!(store.find_by_id(" c1").unwrap(), None);
        assert_eq!(store.find_by_id("missing").unwrap(), None);
    }

    #[test]
    fn find_by_id_skips_header() {
        let (_dir, store) = temp_store();
        assert_eq!(store.find_by_id("id").unwrap(), None);
    }

    #[test]
    fn duplicate_key_leaves_table_unchanged() {
        let (_dir, store) = temp_store();
        store.add(&customer("c1", "Anna", "Lerum")).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let err = store.add(&customer("c1", "Bo", "Malmo")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { ref key, .. } if key == "c1"));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
        assert_eq!(store.find_by_id("c1").unwrap().unwrap().get("name"), Some("Anna"));
    }

    #[test]
    fn values_with_delimiters_survive() {
        let (_dir, store) = temp_store();
        let row = customer("c1", "Svensson, \"Anna\"", "['0025', '0500']");
        store.add(&row).unwrap();
        assert_eq!(store.find_by_id("c1").unwrap(), Some(row));
    }

    #[test]
    fn find_by_field_ignores_case_and_whitespace() {
        let (_dir, store) = temp_store();
        store.add(&customer("c1", "Anna", " gothenburg ")).unwrap();
        store.add(&customer("c2", "Bo", "Malmo")).unwrap();
        store.add(&customer("c3", "Cia", "GOTHENBURG")).unwrap();

        let found = store.find_by_field("city", "Gothenburg").unwrap();
        assert_eq!(ids(&found), ["c1", "c3"]);
        assert_eq!(found[0].get("city"), Some(" gothenburg "));
    }

    #[test]
    fn find_by_field_empty_when_nothing_matches() {
        let (_dir, store) = temp_store();
        store.add(&customer("c1", "Anna", "Lerum")).unwrap();
        assert!(store.find_by_field("city", "Partille").unwrap().is_empty());
    }

    #[test]
    fn find_by_unknown_field_fails() {
        let (_dir, store) = temp_store();
        let err = store.find_by_field("country", "Sweden").unwrap_err();
        assert!(matches!(err, StoreError::FieldNotFound { ref field, .. } if field == "country"));
    }

    // -----------------------------------------------------------------------
    // Update / delete
    // -----------------------------------------------------------------------

    #[test]
    fn update_replaces_one_row_in_place() {
        let (_dir, store) = temp_store();
        store.add(&customer("c1", "Anna", "Lerum")).unwrap();
        store.add(&customer("c2", "Bo", "Malmo")).unwrap();
        store.add(&customer("c3", "Cia", "Molndal")).unwrap();

        let changed = customer("c2", "Bo", "Stockholm");
        assert!(store.update(&changed).unwrap());

        let rows = store.rows().unwrap();
        assert_eq!(ids(&rows), ["c1", "c2", "c3"]);
        assert_eq!(rows[0], customer("c1", "Anna", "Lerum"));
        assert_eq!(rows[1], changed);
        assert_eq!(rows[2], customer("c3", "Cia", "Molndal"));
    }

    #[test]
    fn update_missing_key_is_noop() {
        let (_dir, store) = temp_store();
        store.add(&customer("c1", "Anna", "Lerum")).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        assert!(!store.update(&customer("c9", "Nobody", "Lerum")).unwrap());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn delete_removes_exactly_one_row() {
        let (_dir, store) = temp_store();
        store.add(&customer("c1", "Anna", "Lerum")).unwrap();
        store.add(&customer("c2", "Bo", "Malmo")).unwrap();
        store.add(&customer("c3", "Cia", "Molndal")).unwrap();

        assert!(store.delete(&customer("c2", "", "")).unwrap());
        assert_eq!(ids(&store.rows().unwrap()), ["c1", "c3"]);
        assert_eq!(store.find_by_id("c2").unwrap(), None);
    }

    #[test]
    fn delete_missing_key_is_noop() {
        let (_dir, store) = temp_store();
        store.add(&customer("c1", "Anna", "Lerum")).unwrap();
        assert!(!store.delete(&customer("c9", "", "")).unwrap());
        assert_eq!(ids(&store.rows().unwrap()), ["c1"]);
    }

    #[test]
    fn delete_then_add_reuses_key() {
        let (_dir, store) = temp_store();
        store.add(&customer("c1", "Anna", "Lerum")).unwrap();
        store.delete(&customer("c1", "", "")).unwrap();
        store.add(&customer("c1", "Bo", "Malmo")).unwrap();
        assert_eq!(store.find_by_id("c1").unwrap().unwrap().get("name"), Some("Bo"));
    }

    #[test]
    fn rewrite_leaves_no_temp_files() {
        let (dir, store) = temp_store();
        store.add(&customer("c1", "Anna", "Lerum")).unwrap();
        store.update(&customer("c1", "Anna", "Malmo")).unwrap();
        store.delete(&customer("c1", "", "")).unwrap();
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[cfg(unix)]
    #[test]
    fn rewrite_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = temp_store();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();
        store.add(&customer("c1", "Anna", "Lerum")).unwrap();

        store.update(&customer("c1", "Anna", "Malmo")).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);

        store.delete(&customer("c1", "", "")).unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    // -----------------------------------------------------------------------
    // Exclusive sessions
    // -----------------------------------------------------------------------

    #[test]
    fn session_sees_its_own_writes() {
        let (_dir, store) = temp_store();
        let session = store.exclusive().unwrap();
        session.add(&customer("c1", "Anna", "Lerum")).unwrap();
        assert!(session.find_by_id("c1").unwrap().is_some());
    }

    #[test]
    fn sessions_serialize_read_modify_write() {
        let dir = tempfile::tempdir().unwrap();
        let counter = Row::new().with("id", "hits").with("count", "0");
        let store = Arc::new(RecordStore::open(dir.path().join("counter.csv"), &counter, "Counter").unwrap());
        store.add(&counter).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..5 {
                        let session = store.exclusive().unwrap();
                        let mut row = session.find_by_id("hits").unwrap().unwrap();
                        let count: u32 = row.get("count").unwrap().parse().unwrap();
                        row.set("count", (count + 1).to_string());
                        session.update(&row).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }

        let row = store.find_by_id("hits").unwrap().unwrap();
        assert_eq!(row.get("count"), Some("40"));
    }

    #[test]
    fn debug_format() {
        let (_dir, store) = temp_store();
        let debug = format!("{store:?}");
        assert!(debug.contains("RecordStore"));
        assert!(debug.contains("Customer"));
    }
}
