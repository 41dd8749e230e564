//! Database schema definitions

use std::fmt;
use std::str::FromStr;

use crate::error::ConsoleError;

/// SQL to create the courses table (first revision columns only)
pub const CREATE_COURSES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS courses (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    title           TEXT NOT NULL,
    description     TEXT,
    date_created    TEXT NOT NULL
)
"#;

/// SQL to create the participants table (first revision columns only)
pub const CREATE_PARTICIPANTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS participants (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL,
    email           TEXT UNIQUE NOT NULL,
    date_created    TEXT NOT NULL
)
"#;

/// SQL to create the enrollments table
pub const CREATE_ENROLLMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS enrollments (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    course_id       INTEGER,
    participant_id  INTEGER,
    date_enrolled   TEXT NOT NULL,
    FOREIGN KEY(course_id) REFERENCES courses(id),
    FOREIGN KEY(participant_id) REFERENCES participants(id)
)
"#;

/// Migration bookkeeping table
pub const CREATE_MIGRATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL UNIQUE,
    applied_at      TEXT NOT NULL DEFAULT (datetime('now'))
)
"#;

/// All table creation statements in order
pub const CREATE_ALL_TABLES: &[&str] = &[
    CREATE_COURSES_TABLE,
    CREATE_PARTICIPANTS_TABLE,
    CREATE_ENROLLMENTS_TABLE,
];

/// Entity tables the console knows about.
///
/// Any table name that reaches SQL text goes through this enum, so it is
/// always one of the fixed identifiers below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Courses,
    Participants,
    Enrollments,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Courses, Table::Participants, Table::Enrollments];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Courses => "courses",
            Table::Participants => "participants",
            Table::Enrollments => "enrollments",
        }
    }

    /// Columns present once every migration has run, in creation order
    pub fn expected_columns(&self) -> &'static [&'static str] {
        match self {
            Table::Courses => &[
                "id",
                "title",
                "description",
                "date_created",
                "duration_type",
                "start_date",
                "end_date",
                "image_url",
                "ref_url",
            ],
            Table::Participants => &["id", "name", "email", "date_created", "phone", "dob"],
            Table::Enrollments => &["id", "course_id", "participant_id", "date_enrolled"],
        }
    }

    /// Resolve a user-supplied name against the allow-list
    pub fn from_name(name: &str) -> Result<Table, ConsoleError> {
        Table::ALL
            .into_iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| ConsoleError::UnknownTable(name.to_string()))
    }
}

impl FromStr for Table {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::from_name(s)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A column introduced after the first revision
#[derive(Debug, Clone, Copy)]
pub struct ColumnAddition {
    pub table: Table,
    pub column: &'static str,
    /// Column definition after the name, including any literal default
    pub definition: &'static str,
}

impl ColumnAddition {
    pub const fn new(table: Table, column: &'static str, definition: &'static str) -> Self {
        Self { table, column, definition }
    }

    /// `ALTER TABLE ... ADD COLUMN` statement for this addition
    pub fn alter_sql(&self) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            self.table.name(),
            self.column,
            self.definition
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_allow_list() {
        assert_eq!(Table::from_name("courses").unwrap(), Table::Courses);
        assert_eq!("enrollments".parse::<Table>().unwrap(), Table::Enrollments);
        assert!(matches!(
            Table::from_name("courses; DROP TABLE courses"),
            Err(ConsoleError::UnknownTable(_))
        ));
        assert!(Table::from_name("Courses").is_err());
    }

    #[test]
    fn test_expected_columns_start_with_base() {
        for table in Table::ALL {
            assert_eq!(table.expected_columns()[0], "id");
        }
        assert_eq!(Table::Courses.expected_columns().len(), 9);
        assert_eq!(Table::Participants.expected_columns().len(), 6);
    }

    #[test]
    fn test_alter_sql() {
        let add = ColumnAddition::new(
            Table::Courses,
            "duration_type",
            "TEXT NOT NULL DEFAULT 'Long-term'",
        );
        assert_eq!(
            add.alter_sql(),
            "ALTER TABLE courses ADD COLUMN duration_type TEXT NOT NULL DEFAULT 'Long-term'"
        );
    }
}
