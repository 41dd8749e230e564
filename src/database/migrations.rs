//! Versioned schema migrations
//!
//! Every startup walks the ordered step list below. A step that is already
//! recorded in `schema_migrations` is skipped; the rest run inside a
//! transaction and are recorded on success. Steps only ever add columns or
//! rewrite values in place, and each one checks the live schema first, so
//! stores upgraded by the older column-diff scheme (no tracking table) are
//! picked up without errors.

use rusqlite::{params, Connection};

use super::models::DurationType;
use super::schema::{self, ColumnAddition, Table};
use crate::error::{ConsoleError, Result};
use crate::utils::dates::{format_date, normalize_stored_date};

/// A single named migration step
struct Migration {
    name: &'static str,
    apply: fn(&Connection) -> Result<()>,
}

/// All migrations in order. New steps are appended here.
const MIGRATIONS: &[Migration] = &[
    Migration { name: "001_base_tables", apply: create_base_tables },
    Migration { name: "002_course_duration_type", apply: add_course_duration_type },
    Migration { name: "003_course_schedule", apply: add_course_schedule },
    Migration { name: "004_course_links", apply: add_course_links },
    Migration { name: "005_participant_phone", apply: add_participant_phone },
    Migration { name: "006_participant_dob", apply: add_participant_dob },
    Migration { name: "007_normalize_dates", apply: normalize_dates },
    Migration { name: "008_duration_type_labels", apply: rewrite_legacy_duration_labels },
];

const COURSE_DURATION_TYPE: &[ColumnAddition] = &[ColumnAddition::new(
    Table::Courses,
    "duration_type",
    "TEXT NOT NULL DEFAULT 'Long-term'",
)];

const COURSE_SCHEDULE: &[ColumnAddition] = &[
    ColumnAddition::new(Table::Courses, "start_date", "TEXT"),
    ColumnAddition::new(Table::Courses, "end_date", "TEXT"),
];

const COURSE_LINKS: &[ColumnAddition] = &[
    ColumnAddition::new(Table::Courses, "image_url", "TEXT"),
    ColumnAddition::new(Table::Courses, "ref_url", "TEXT"),
];

const PARTICIPANT_PHONE: &[ColumnAddition] =
    &[ColumnAddition::new(Table::Participants, "phone", "TEXT")];

const PARTICIPANT_DOB: &[ColumnAddition] =
    &[ColumnAddition::new(Table::Participants, "dob", "TEXT")];

/// Number of known migration steps
pub fn migration_count() -> usize {
    MIGRATIONS.len()
}

/// Run every pending migration, returning how many were applied
pub fn run_migrations(conn: &Connection) -> Result<usize> {
    run_migrations_from_list(conn, MIGRATIONS)
}

fn run_migrations_from_list(conn: &Connection, migrations: &[Migration]) -> Result<usize> {
    conn.execute_batch(schema::CREATE_MIGRATIONS_TABLE)
        .map_err(|e| migration_error("schema_migrations_bootstrap", e))?;

    let mut applied = 0;

    for migration in migrations {
        let already_applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM schema_migrations WHERE name = ?1",
            [migration.name],
            |row| row.get(0),
        )?;

        if already_applied {
            tracing::debug!(migration = migration.name, "migration already applied, skipping");
            continue;
        }

        tracing::info!(migration = migration.name, "applying migration");

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| migration_error(migration.name, e))?;

        (migration.apply)(&tx).map_err(|e| match e {
            ConsoleError::Migration { .. } => e,
            other => ConsoleError::Migration {
                name: migration.name.to_string(),
                message: other.to_string(),
            },
        })?;

        tx.execute(
            "INSERT INTO schema_migrations (name) VALUES (?1)",
            [migration.name],
        )
        .map_err(|e| migration_error(migration.name, e))?;

        tx.commit().map_err(|e| migration_error(migration.name, e))?;

        applied += 1;
    }

    Ok(applied)
}

fn migration_error(name: &str, err: rusqlite::Error) -> ConsoleError {
    ConsoleError::Migration {
        name: name.to_string(),
        message: err.to_string(),
    }
}

/// Names of recorded migrations in application order
pub fn applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM schema_migrations ORDER BY id")?;
    let names = stmt.query_map([], |row| row.get(0))?;
    names.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Live column names of a table, in declared order; empty if the table is absent
pub fn column_names(conn: &Connection, table: Table) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
    let names = stmt.query_map([table.name()], |row| row.get(0))?;
    names.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Whether a table exists in the store
pub fn table_exists(conn: &Connection, table: Table) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [table.name()],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Add each listed column that the live table lacks
fn add_missing_columns(conn: &Connection, additions: &[ColumnAddition]) -> Result<()> {
    for addition in additions {
        let existing = column_names(conn, addition.table)?;
        if existing.iter().any(|c| c == addition.column) {
            tracing::debug!(
                table = addition.table.name(),
                column = addition.column,
                "column already present"
            );
            continue;
        }
        conn.execute(&addition.alter_sql(), [])?;
        tracing::info!(
            table = addition.table.name(),
            column = addition.column,
            "added column"
        );
    }
    Ok(())
}

fn create_base_tables(conn: &Connection) -> Result<()> {
    for sql in schema::CREATE_ALL_TABLES {
        conn.execute(sql, [])?;
    }
    Ok(())
}

fn add_course_duration_type(conn: &Connection) -> Result<()> {
    add_missing_columns(conn, COURSE_DURATION_TYPE)
}

fn add_course_schedule(conn: &Connection) -> Result<()> {
    add_missing_columns(conn, COURSE_SCHEDULE)
}

fn add_course_links(conn: &Connection) -> Result<()> {
    add_missing_columns(conn, COURSE_LINKS)
}

fn add_participant_phone(conn: &Connection) -> Result<()> {
    add_missing_columns(conn, PARTICIPANT_PHONE)
}

fn add_participant_dob(conn: &Connection) -> Result<()> {
    add_missing_columns(conn, PARTICIPANT_DOB)
}

fn normalize_dates(conn: &Connection) -> Result<()> {
    let dob = normalize_date_column(conn, Table::Participants, "dob")?;
    let enrolled = normalize_date_column(conn, Table::Enrollments, "date_enrolled")?;
    tracing::info!(dob, date_enrolled = enrolled, "normalized stored dates");
    Ok(())
}

/// Rewrite every value of `column` to `yyyy-mm-dd`. Values that are not a
/// recognizable date are left untouched.
fn normalize_date_column(conn: &Connection, table: Table, column: &'static str) -> Result<usize> {
    let select = format!(
        "SELECT id, {column} FROM {} WHERE {column} IS NOT NULL AND {column} != ''",
        table.name()
    );
    let update = format!("UPDATE {} SET {column} = ?1 WHERE id = ?2", table.name());

    let rows: Vec<(i64, String)> = {
        let mut stmt = conn.prepare(&select)?;
        let mapped = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        mapped.collect::<std::result::Result<Vec<_>, _>>()?
    };

    let mut rewritten = 0;
    for (id, value) in rows {
        match normalize_stored_date(&value) {
            Some(date) => {
                let normalized = format_date(&date);
                if normalized != value {
                    conn.execute(&update, params![normalized, id])?;
                    rewritten += 1;
                }
            }
            None => {
                tracing::warn!(
                    table = table.name(),
                    column,
                    id,
                    value = %value,
                    "unrecognized date left as stored"
                );
            }
        }
    }
    Ok(rewritten)
}

fn rewrite_legacy_duration_labels(conn: &Connection) -> Result<()> {
    for dt in DurationType::ALL {
        if dt.legacy_label() == dt.as_str() {
            continue;
        }
        let changed = conn.execute(
            "UPDATE courses SET duration_type = ?1 WHERE duration_type = ?2",
            params![dt.as_str(), dt.legacy_label()],
        )?;
        if changed > 0 {
            tracing::info!(label = dt.as_str(), changed, "rewrote legacy duration labels");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_minimal_schema() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE courses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                date_created TEXT NOT NULL
            );
            CREATE TABLE participants (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                date_created TEXT NOT NULL
            );
            CREATE TABLE enrollments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                course_id INTEGER,
                participant_id INTEGER,
                date_enrolled TEXT NOT NULL
            );
            INSERT INTO courses (title, description, date_created)
                VALUES ('Legacy', 'old row', '2023-05-01 09:00:00');
            "#,
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_run_migrations_on_fresh_db() {
        let conn = Connection::open_in_memory().unwrap();
        let applied = run_migrations(&conn).unwrap();
        assert_eq!(applied, migration_count());
        assert_eq!(applied_migrations(&conn).unwrap().len(), migration_count());

        for table in Table::ALL {
            assert_eq!(column_names(&conn, table).unwrap(), table.expected_columns());
        }
    }

    #[test]
    fn test_run_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let before = column_names(&conn, Table::Courses).unwrap();

        assert_eq!(run_migrations(&conn).unwrap(), 0);
        assert_eq!(column_names(&conn, Table::Courses).unwrap(), before);
    }

    #[test]
    fn test_upgrade_from_minimal_schema() {
        let conn = legacy_minimal_schema();
        run_migrations(&conn).unwrap();

        for table in Table::ALL {
            assert_eq!(column_names(&conn, table).unwrap(), table.expected_columns());
        }

        let (title, duration): (String, String) = conn
            .query_row("SELECT title, duration_type FROM courses", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(title, "Legacy");
        assert_eq!(duration, "Long-term");
    }

    #[test]
    fn test_upgrade_store_migrated_without_tracking_table() {
        let conn = legacy_minimal_schema();
        conn.execute_batch(
            "ALTER TABLE courses ADD COLUMN duration_type TEXT NOT NULL DEFAULT 'Dài hạn';
             ALTER TABLE courses ADD COLUMN start_date TEXT;
             ALTER TABLE participants ADD COLUMN phone TEXT;",
        )
        .unwrap();

        run_migrations(&conn).unwrap();

        let courses = column_names(&conn, Table::Courses).unwrap();
        assert_eq!(courses.len(), Table::Courses.expected_columns().len());
        let duration: String = conn
            .query_row("SELECT duration_type FROM courses", [], |row| row.get(0))
            .unwrap();
        assert_eq!(duration, "Long-term");
    }

    #[test]
    fn test_normalize_dates_backfill() {
        let conn = legacy_minimal_schema();
        conn.execute_batch(
            "ALTER TABLE participants ADD COLUMN dob TEXT;
             INSERT INTO participants (name, email, date_created, dob)
                 VALUES ('A', 'a@x.com', '2023-01-01 00:00:00', '15/08/1990');
             INSERT INTO participants (name, email, date_created, dob)
                 VALUES ('B', 'b@x.com', '2023-01-01 00:00:00', 'sometime');
             INSERT INTO enrollments (course_id, participant_id, date_enrolled)
                 VALUES (1, 1, '02/03/2024');
             INSERT INTO enrollments (course_id, participant_id, date_enrolled)
                 VALUES (1, 2, '2024-03-05 14:00:00');",
        )
        .unwrap();

        run_migrations(&conn).unwrap();

        let dobs: Vec<String> = conn
            .prepare("SELECT dob FROM participants ORDER BY id")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(dobs, vec!["1990-08-15".to_string(), "sometime".to_string()]);

        let enrolled: Vec<String> = conn
            .prepare("SELECT date_enrolled FROM enrollments ORDER BY id")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(enrolled, vec!["2024-03-02".to_string(), "2024-03-05".to_string()]);
    }

    #[test]
    fn test_failed_step_rolls_back() {
        fn broken(conn: &Connection) -> Result<()> {
            conn.execute("CREATE TABLE rollback_probe (id INTEGER PRIMARY KEY)", [])?;
            conn.execute("INSERT INTO no_such_table VALUES (1)", [])?;
            Ok(())
        }

        let conn = Connection::open_in_memory().unwrap();
        let steps = [Migration { name: "900_broken", apply: broken }];
        let err = run_migrations_from_list(&conn, &steps).unwrap_err();
        match err {
            ConsoleError::Migration { name, .. } => assert_eq!(name, "900_broken"),
            other => panic!("unexpected error: {other:?}"),
        }

        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE name = 'rollback_probe')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(!exists);
        assert!(applied_migrations(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_column_names_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(column_names(&conn, Table::Courses).unwrap().is_empty());
        assert!(!table_exists(&conn, Table::Courses).unwrap());
    }
}
