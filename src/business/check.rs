//! Schema self-check
//!
//! Confirms every entity table exists with its expected columns. Used by the
//! entry point when no command is given.

use rusqlite::Connection;
use serde::Serialize;

use crate::database::migrations::{applied_migrations, column_names, migration_count, table_exists};
use crate::database::Table;
use crate::error::Result;
use super::console::Console;

/// Result for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCheck {
    pub table: String,
    pub exists: bool,
    pub missing_columns: Vec<String>,
}

impl TableCheck {
    pub fn passed(&self) -> bool {
        self.exists && self.missing_columns.is_empty()
    }
}

/// Result of a full self-check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelfCheckReport {
    pub tables: Vec<TableCheck>,
    pub applied_migrations: usize,
    pub known_migrations: usize,
}

impl SelfCheckReport {
    pub fn passed(&self) -> bool {
        self.tables.iter().all(TableCheck::passed)
    }

    /// One-line verdict
    pub fn summary(&self) -> String {
        if self.passed() {
            return format!(
                "PASS: {} tables present, {}/{} migrations applied",
                self.tables.len(),
                self.applied_migrations,
                self.known_migrations
            );
        }
        let problems: Vec<String> = self
            .tables
            .iter()
            .filter(|t| !t.passed())
            .map(|t| {
                if t.exists {
                    format!("{} missing {}", t.table, t.missing_columns.join(", "))
                } else {
                    format!("{} absent", t.table)
                }
            })
            .collect();
        format!("FAIL: {}", problems.join("; "))
    }
}

/// Check one table
pub fn check_table(conn: &Connection, table: Table) -> Result<TableCheck> {
    let exists = table_exists(conn, table)?;
    let present = column_names(conn, table)?;
    let missing_columns = table
        .expected_columns()
        .iter()
        .filter(|c| !present.iter().any(|p| p == *c))
        .map(|c| c.to_string())
        .collect();
    Ok(TableCheck {
        table: table.name().to_string(),
        exists,
        missing_columns,
    })
}

/// Check a table named by the caller; unknown names are rejected before any SQL runs
pub fn check_table_by_name(conn: &Connection, name: &str) -> Result<TableCheck> {
    check_table(conn, Table::from_name(name)?)
}

/// Check every entity table
pub fn check_schema(conn: &Connection) -> Result<SelfCheckReport> {
    let tables = Table::ALL
        .into_iter()
        .map(|t| check_table(conn, t))
        .collect::<Result<Vec<_>>>()?;
    let applied = if table_exists_by_name(conn, "schema_migrations")? {
        applied_migrations(conn)?.len()
    } else {
        0
    };
    Ok(SelfCheckReport {
        tables,
        applied_migrations: applied,
        known_migrations: migration_count(),
    })
}

fn table_exists_by_name(conn: &Connection, name: &str) -> Result<bool> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [name],
        |row| row.get(0),
    )?)
}

impl Console {
    /// Run the schema self-check against this console's store
    pub fn self_check(&self) -> Result<SelfCheckReport> {
        check_schema(self.conn()?)
    }
}
