//! Store handle: connection ownership and schema bootstrap

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use super::migrations;
use crate::error::{ConsoleError, Result};

/// Owned SQLite connection with the schema brought up to date.
///
/// One `Store` serves the whole process; callers pass it (or its
/// connection) explicitly into every data-access call.
pub struct Store {
    /// Path to the database file (`None` for in-memory stores)
    path: Option<PathBuf>,
    /// SQLite connection
    conn: Option<Connection>,
}

impl Store {
    /// Open or create the store at `path` and apply pending migrations
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self {
            path: Some(path.to_path_buf()),
            conn: Some(conn),
        };
        store.ensure_schema()?;
        tracing::debug!(path = %path.display(), "store ready");
        Ok(store)
    }

    /// Open a private in-memory store with the full schema
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            path: None,
            conn: Some(Connection::open_in_memory()?),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create missing tables and columns; safe to call any number of times
    pub fn ensure_schema(&self) -> Result<usize> {
        let conn = self.connection()?;
        // Enrollment references are declared but not enforced.
        conn.execute_batch("PRAGMA foreign_keys = OFF")?;
        let applied = migrations::run_migrations(conn)?;
        if applied > 0 {
            tracing::info!(applied, "schema migrations applied");
        }
        Ok(applied)
    }

    /// Get a reference to the connection
    pub fn connection(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| ConsoleError::DatabaseError("Database not open".to_string()))
    }

    /// Get the database path, if file-backed
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Names of recorded migrations in application order
    pub fn applied_migrations(&self) -> Result<Vec<String>> {
        migrations::applied_migrations(self.connection()?)
    }

    /// Close the connection
    pub fn close(&mut self) {
        self.conn = None;
    }

    /// Check if the connection is open
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        self.close();
    }
}
