//! Database layer for ward handover.

mod jobs;
mod notes;
mod patients;
mod schema;

pub use schema::*;

use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, TimeDelta, Utc};
use rusqlite::{Connection, ErrorCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Row counts per table, for the admin page.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableCounts {
    pub patients: u64,
    pub progress_notes: u64,
    pub jobs: u64,
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        // WAL lets readers carry on while a write is in flight.
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
        let db = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        db.initialize()?;
        info!(path = %path.display(), "Opened handover store");
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn, path: None };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        debug!("Schema ensured");
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Path of the backing file; `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Row counts of the three tables.
    pub fn table_counts(&self) -> DbResult<TableCounts> {
        let count = |table: &str| -> DbResult<u64> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
            Ok(n as u64)
        };
        Ok(TableCounts {
            patients: count("patients")?,
            progress_notes: count("progress_notes")?,
            jobs: count("jobs")?,
        })
    }

    /// Flush the write-ahead log into the main database file.
    pub fn checkpoint(&self) -> DbResult<()> {
        self.conn
            .query_row("PRAGMA wal_checkpoint(FULL)", [], |_| Ok(()))?;
        info!("Checkpointed write-ahead log");
        Ok(())
    }

    /// Write a consistent copy of the whole store to `dest`.
    pub fn copy_to<P: AsRef<Path>>(&self, dest: P) -> DbResult<()> {
        let dest = dest.as_ref();
        if dest.exists() {
            return Err(DbError::Constraint(format!(
                "backup target already exists: {}",
                dest.display()
            )));
        }
        let dest_str = dest.to_string_lossy();
        self.conn.execute("VACUUM INTO ?1", [dest_str.as_ref()])?;
        info!(dest = %dest.display(), "Copied handover store");
        Ok(())
    }
}

/// Current time, nudged past `previous` so successive writes to a row
/// always carry strictly increasing timestamps.
pub(crate) fn timestamp_after(previous: Option<NaiveDateTime>) -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    match previous {
        Some(prev) if now <= prev => prev + TimeDelta::microseconds(1),
        _ => now,
    }
}

/// Map a unique-constraint failure to [`DbError::Constraint`].
pub(crate) fn map_unique(err: rusqlite::Error, what: impl FnOnce() -> String) -> DbError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            DbError::Constraint(what())
        }
        _ => DbError::Sqlite(err),
    }
}
