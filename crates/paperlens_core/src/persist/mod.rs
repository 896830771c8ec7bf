//! Write-through snapshot persistence for the library store.
//!
//! # Responsibility
//! - Define the three durable partitions and the key-scoped storage
//!   contract over them.
//! - Mirror every store mutation into its partition as a full-snapshot
//!   overwrite, and rehydrate the store from the partitions at startup.
//!
//! # Invariants
//! - A write failure is non-fatal: it is logged, surfaced through the
//!   status handle as a warning state, and the in-memory store stays
//!   authoritative for the rest of the session.
//! - Writes triggered by sequential mutations apply in mutation order
//!   (the adapter is synchronous; the last write reflects the latest
//!   state).
//! - An absent or unparsable partition rehydrates to its empty default:
//!   no papers, no highlights, and a folder list holding only the default
//!   folder.

use crate::db::{latest_version, open_db, open_db_in_memory, DbError, DbResult};
use crate::model::folder::Folder;
use crate::model::highlight::Highlight;
use crate::model::paper::Paper;
use crate::store::{LibraryStore, PartitionSnapshot, StoreObserver};
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::rc::Rc;

/// One durable key-value slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Papers,
    Folders,
    Highlights,
}

impl Partition {
    pub const ALL: [Partition; 3] = [Partition::Papers, Partition::Folders, Partition::Highlights];

    /// Stable key naming the slot in durable storage.
    pub fn slot_key(self) -> &'static str {
        match self {
            Partition::Papers => "papers",
            Partition::Folders => "folders",
            Partition::Highlights => "highlights",
        }
    }
}

impl Display for Partition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slot_key())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage-layer error for slot reads and writes.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// The connection has not been migrated to the expected schema.
    Uninitialized {
        expected_version: u32,
        actual_version: u32,
    },
    /// Failure reported by a non-SQLite backend (or a test double).
    Backend(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Uninitialized {
                expected_version,
                actual_version,
            } => write!(
                f,
                "snapshot storage not initialized: schema version {actual_version}, expected {expected_version}"
            ),
            Self::Backend(message) => write!(f, "storage backend failure: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key-scoped snapshot storage: three independent slots, each read once at
/// startup and fully rewritten on every mutation of its collection.
pub trait SnapshotStorage {
    /// Reads a slot; `None` when the slot has never been written.
    fn read_slot(&self, partition: Partition) -> StorageResult<Option<String>>;
    /// Overwrites a slot with a complete serialized collection.
    fn write_slot(&mut self, partition: Partition, payload: &str) -> StorageResult<()>;
}

/// SQLite-backed slot storage over the `snapshots` table.
pub struct SqliteSnapshotStorage {
    conn: Connection,
}

impl std::fmt::Debug for SqliteSnapshotStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteSnapshotStorage").finish_non_exhaustive()
    }
}

impl SqliteSnapshotStorage {
    /// Opens (or creates) the database file and migrates it.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a throwaway in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps an externally opened connection after verifying it has been
    /// migrated to the schema this build expects.
    pub fn try_new(conn: Connection) -> StorageResult<Self> {
        let actual: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let expected = latest_version();
        if actual != expected {
            return Err(StorageError::Uninitialized {
                expected_version: expected,
                actual_version: actual,
            });
        }
        Ok(Self { conn })
    }
}

impl SnapshotStorage for SqliteSnapshotStorage {
    fn read_slot(&self, partition: Partition) -> StorageResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM snapshots WHERE partition = ?1;",
                [partition.slot_key()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write_slot(&mut self, partition: Partition, payload: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO snapshots (partition, payload, written_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(partition) DO UPDATE SET
                payload = excluded.payload,
                written_at = excluded.written_at;",
            params![partition.slot_key(), payload],
        )?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct PersistenceState {
    /// Partitions whose most recent write failed.
    failed: Vec<Partition>,
    last_error: Option<String>,
}

/// Shared view of the adapter's health, for surfacing the warning state.
///
/// Degraded means at least one partition's latest snapshot write failed;
/// those changes survive in memory but risk loss on restart.
#[derive(Clone, Default)]
pub struct PersistenceStatusHandle {
    state: Rc<RefCell<PersistenceState>>,
}

impl PersistenceStatusHandle {
    pub fn is_degraded(&self) -> bool {
        !self.state.borrow().failed.is_empty()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().last_error.clone()
    }

    fn mark_failed(&self, partition: Partition, message: String) {
        let mut state = self.state.borrow_mut();
        if !state.failed.contains(&partition) {
            state.failed.push(partition);
        }
        state.last_error = Some(message);
    }

    fn mark_ok(&self, partition: Partition) {
        self.state.borrow_mut().failed.retain(|p| *p != partition);
    }
}

/// Store observer flushing each mutated collection to its slot.
pub struct PersistenceAdapter {
    storage: Box<dyn SnapshotStorage>,
    status: PersistenceStatusHandle,
}

impl PersistenceAdapter {
    pub fn new(storage: Box<dyn SnapshotStorage>) -> Self {
        Self {
            storage,
            status: PersistenceStatusHandle::default(),
        }
    }

    /// Returns a handle the composition root can keep after boxing the
    /// adapter into the store.
    pub fn status_handle(&self) -> PersistenceStatusHandle {
        self.status.clone()
    }

    fn flush<T: Serialize>(&mut self, partition: Partition, collection: &[T]) {
        let payload = match serde_json::to_string(collection) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    "event=snapshot_write module=persist status=error partition={partition} error={err}"
                );
                self.status.mark_failed(partition, err.to_string());
                return;
            }
        };

        match self.storage.write_slot(partition, &payload) {
            Ok(()) => self.status.mark_ok(partition),
            Err(err) => {
                warn!(
                    "event=snapshot_write module=persist status=error partition={partition} error={err}"
                );
                self.status.mark_failed(partition, err.to_string());
            }
        }
    }
}

impl StoreObserver for PersistenceAdapter {
    fn collection_changed(&mut self, snapshot: PartitionSnapshot<'_>) {
        match snapshot {
            PartitionSnapshot::Papers(papers) => self.flush(Partition::Papers, papers),
            PartitionSnapshot::Folders(folders) => self.flush(Partition::Folders, folders),
            PartitionSnapshot::Highlights(highlights) => {
                self.flush(Partition::Highlights, highlights)
            }
        }
    }
}

/// Rehydrates a library store from the three partitions.
///
/// Absent or unparsable slots fall back to their empty defaults; the store
/// constructor re-inserts the default folder when a snapshot lacks it. The
/// returned store has no observer attached yet.
pub fn load_library(storage: &dyn SnapshotStorage) -> LibraryStore {
    let papers: Vec<Paper> = read_collection(storage, Partition::Papers).unwrap_or_default();
    let folders: Vec<Folder> = read_collection(storage, Partition::Folders)
        .unwrap_or_else(|| vec![Folder::default_folder()]);
    let highlights: Vec<Highlight> =
        read_collection(storage, Partition::Highlights).unwrap_or_default();

    info!(
        "event=library_loaded module=persist papers={} folders={} highlights={}",
        papers.len(),
        folders.len(),
        highlights.len()
    );
    LibraryStore::from_collections(papers, folders, highlights)
}

fn read_collection<T: DeserializeOwned>(
    storage: &dyn SnapshotStorage,
    partition: Partition,
) -> Option<Vec<T>> {
    let payload = match storage.read_slot(partition) {
        Ok(Some(payload)) => payload,
        Ok(None) => return None,
        Err(err) => {
            warn!(
                "event=snapshot_read module=persist status=error partition={partition} error={err}"
            );
            return None;
        }
    };

    match serde_json::from_str(&payload) {
        Ok(collection) => Some(collection),
        Err(err) => {
            warn!(
                "event=snapshot_read module=persist status=unparsable partition={partition} error={err}"
            );
            None
        }
    }
}
