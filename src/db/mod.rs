//! SQLite persistence for entries.
//!
//! `Database` is the value shared with every actix worker through
//! `web::Data`. It owns a single connection behind a mutex; handlers lock it
//! for the duration of their statements.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;

use crate::models::entry::Entry;

/// Location that opens a private in-memory database instead of a file.
pub const IN_MEMORY: &str = ":memory:";

const SCHEMA_VERSION: u32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },

    #[error("entry table lock poisoned")]
    LockPoisoned,
}

pub struct Database {
    entry_table: Mutex<EntryTable>,
}

impl Database {
    /// Opens (or creates) the database at `path` and brings its schema up to
    /// date. `:memory:` opens an in-memory database.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        if path == Path::new(IN_MEMORY) {
            return Self::open_in_memory();
        }
        Self::bootstrap("file", || Connection::open(path))
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Self::bootstrap("memory", Connection::open_in_memory)
    }

    fn bootstrap<F>(mode: &str, connect: F) -> DbResult<Self>
    where
        F: FnOnce() -> rusqlite::Result<Connection>,
    {
        let started_at = Instant::now();
        info!("event=db_open module=db status=start mode={mode}");

        let result = connect()
            .map_err(DbError::from)
            .and_then(|mut conn| {
                conn.busy_timeout(Duration::from_secs(5))?;
                apply_schema(&mut conn)?;
                Ok(conn)
            });

        match result {
            Ok(conn) => {
                info!(
                    "event=db_open module=db status=ok mode={mode} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(Self {
                    entry_table: Mutex::new(EntryTable { conn }),
                })
            }
            Err(err) => {
                error!(
                    "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    pub fn lock_entry_table(&self) -> DbResult<MutexGuard<'_, EntryTable>> {
        self.entry_table.lock().map_err(|_| DbError::LockPoisoned)
    }
}

/// Creates the schema on a fresh database. The version lives in
/// `PRAGMA user_version`; a database written by a newer binary is refused.
fn apply_schema(conn: &mut Connection) -> DbResult<()> {
    let db_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if db_version > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported: SCHEMA_VERSION,
        });
    }
    if db_version < SCHEMA_VERSION {
        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA_SQL)?;
        tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        tx.commit()?;
    }
    Ok(())
}

/// Row access for the `entries` table.
pub struct EntryTable {
    conn: Connection,
}

const ENTRY_SELECT_SQL: &str = "SELECT id, title, completed FROM entries";

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        title: row.get(1)?,
        completed: row.get(2)?,
    })
}

impl EntryTable {
    /// All entries in creation order.
    pub fn get_all(&self) -> DbResult<Vec<Entry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} ORDER BY id ASC;"))?;
        let entries = stmt
            .query_map([], entry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    pub fn find_one(&self, id: i64) -> DbResult<Option<Entry>> {
        let entry = self
            .conn
            .query_row(
                &format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"),
                params![id],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Inserts a new, not yet completed entry and returns it with its
    /// store-assigned id.
    pub fn append(&self, title: &str) -> DbResult<Entry> {
        self.conn.execute(
            "INSERT INTO entries (title, completed) VALUES (?1, 0);",
            params![title],
        )?;
        Ok(Entry {
            id: self.conn.last_insert_rowid(),
            title: title.to_string(),
            completed: false,
        })
    }

    /// Removes every entry. The id sequence is kept, so ids are never reused.
    pub fn delete_all(&self) -> DbResult<usize> {
        let deleted = self.conn.execute("DELETE FROM entries;", [])?;
        Ok(deleted)
    }

    pub fn count(&self) -> DbResult<usize> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries;", [], |row| row.get::<_, i64>(0))?;
        Ok(count as usize)
    }
}
