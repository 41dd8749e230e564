//! SQL query operations for database access
//!
//! Low-level functions, one SQL round trip each. Every user-supplied value
//! is bound as a parameter. For form-level operations (validation, not-found
//! checks) use the `Console` API.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Params, Row};

use super::models::{
    Cell, Course, DurationType, EnrolledParticipant, Enrollment, EnrollmentRow, Participant,
    Tabular,
};
use crate::error::{ConsoleError, Result};
use crate::utils::dates::{format_date, parse_date};

// ============================================================================
// Generic pass-through
// ============================================================================

/// Run a parameterized query and return every row with its column names
pub fn query<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Tabular> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let mut rows = stmt.query(params)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(width);
        for idx in 0..width {
            cells.push(Cell::from(row.get_ref(idx)?));
        }
        out.push(cells);
    }

    Ok(Tabular { columns, rows: out })
}

/// Run a parameterized mutating statement, returning the affected row count
pub fn execute<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<usize> {
    Ok(conn.execute(sql, params)?)
}

// ============================================================================
// Dashboard queries
// ============================================================================

/// Course count for one duration type label
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DurationCount {
    /// Stored label (kept verbatim so unexpected labels still show up)
    pub duration_type: String,
    pub count: i64,
}

pub fn count_courses(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM courses", [], |row| row.get(0))?)
}

pub fn count_participants(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM participants", [], |row| row.get(0))?)
}

/// Number of courses per duration type
pub fn count_courses_by_duration_type(conn: &Connection) -> Result<Vec<DurationCount>> {
    let mut stmt = conn.prepare(
        "SELECT duration_type, COUNT(*) FROM courses GROUP BY duration_type ORDER BY duration_type",
    )?;
    let counts = stmt.query_map([], |row| {
        Ok(DurationCount {
            duration_type: row.get(0)?,
            count: row.get(1)?,
        })
    })?;
    counts.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Courses starting on or after `today`, soonest first
pub fn upcoming_courses(conn: &Connection, today: NaiveDate, limit: usize) -> Result<Vec<Course>> {
    let sql = format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE start_date >= ?1 ORDER BY start_date ASC LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let courses = stmt.query_map(params![format_date(&today), limit as i64], course_from_row)?;
    courses.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Participants enrolled in a course, in enrollment order
pub fn enrolled_participants(conn: &Connection, course_id: i64) -> Result<Vec<EnrolledParticipant>> {
    let mut stmt = conn.prepare(
        "SELECT p.name, p.email
         FROM enrollments e JOIN participants p ON e.participant_id = p.id
         WHERE e.course_id = ?1
         ORDER BY e.id",
    )?;
    let people = stmt.query_map([course_id], |row| {
        Ok(EnrolledParticipant {
            name: row.get(0)?,
            email: row.get(1)?,
        })
    })?;
    people.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

// ============================================================================
// Course queries
// ============================================================================

const COURSE_COLUMNS: &str =
    "id, title, description, date_created, duration_type, start_date, end_date, image_url, ref_url";

fn course_from_row(row: &Row<'_>) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        date_created: row.get(3)?,
        duration_type: row.get(4)?,
        start_date: row.get::<_, Option<String>>(5)?.as_deref().and_then(parse_date),
        end_date: row.get::<_, Option<String>>(6)?.as_deref().and_then(parse_date),
        image_url: row.get(7)?,
        ref_url: row.get(8)?,
    })
}

/// Courses of one duration type ordered by start date
pub fn courses_by_duration_type(conn: &Connection, duration_type: DurationType) -> Result<Vec<Course>> {
    let sql = format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE duration_type = ?1 ORDER BY start_date, id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let courses = stmt.query_map([duration_type], course_from_row)?;
    courses.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

pub fn get_course(conn: &Connection, id: i64) -> Result<Option<Course>> {
    let sql = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], course_from_row).optional()?)
}

/// Insert a course and return its id
#[allow(clippy::too_many_arguments)]
pub fn insert_course(
    conn: &Connection,
    title: &str,
    description: Option<&str>,
    date_created: &str,
    duration_type: DurationType,
    start_date: NaiveDate,
    end_date: NaiveDate,
    image_url: Option<&str>,
    ref_url: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO courses (title, description, date_created, duration_type, start_date, end_date, image_url, ref_url)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            title,
            description,
            date_created,
            duration_type,
            format_date(&start_date),
            format_date(&end_date),
            image_url,
            ref_url
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Rewrite every user field of a course; `date_created` is left alone
#[allow(clippy::too_many_arguments)]
pub fn update_course(
    conn: &Connection,
    id: i64,
    title: &str,
    description: Option<&str>,
    duration_type: DurationType,
    start_date: NaiveDate,
    end_date: NaiveDate,
    image_url: Option<&str>,
    ref_url: Option<&str>,
) -> Result<usize> {
    let rows = conn.execute(
        "UPDATE courses
         SET title = ?1, description = ?2, duration_type = ?3, start_date = ?4, end_date = ?5,
             image_url = ?6, ref_url = ?7
         WHERE id = ?8",
        params![
            title,
            description,
            duration_type,
            format_date(&start_date),
            format_date(&end_date),
            image_url,
            ref_url,
            id
        ],
    )?;
    Ok(rows)
}

/// Hard delete a course. Enrollment rows pointing at it are not touched.
pub fn delete_course(conn: &Connection, id: i64) -> Result<usize> {
    Ok(conn.execute("DELETE FROM courses WHERE id = ?1", [id])?)
}

// ============================================================================
// Participant queries
// ============================================================================

const PARTICIPANT_COLUMNS: &str = "id, name, email, phone, date_created, dob";

fn participant_from_row(row: &Row<'_>) -> rusqlite::Result<Participant> {
    Ok(Participant {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        date_created: row.get(4)?,
        dob: row.get::<_, Option<String>>(5)?.as_deref().and_then(parse_date),
    })
}

/// Translate a unique-constraint failure into `DuplicateEmail`
fn map_email_conflict(err: rusqlite::Error, email: &str) -> ConsoleError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            ConsoleError::DuplicateEmail(email.to_string())
        }
        _ => err.into(),
    }
}

pub fn all_participants(conn: &Connection) -> Result<Vec<Participant>> {
    let sql = format!("SELECT {PARTICIPANT_COLUMNS} FROM participants ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let people = stmt.query_map([], participant_from_row)?;
    people.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

pub fn get_participant(conn: &Connection, id: i64) -> Result<Option<Participant>> {
    let sql = format!("SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], participant_from_row).optional()?)
}

/// Insert a participant and return its id
pub fn insert_participant(
    conn: &Connection,
    name: &str,
    email: &str,
    phone: Option<&str>,
    dob: Option<NaiveDate>,
    date_created: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO participants (name, email, phone, date_created, dob) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![name, email, phone, date_created, dob.as_ref().map(format_date)],
    )
    .map_err(|e| map_email_conflict(e, email))?;
    Ok(conn.last_insert_rowid())
}

pub fn update_participant(
    conn: &Connection,
    id: i64,
    name: &str,
    email: &str,
    phone: Option<&str>,
    dob: Option<NaiveDate>,
) -> Result<usize> {
    conn.execute(
        "UPDATE participants SET name = ?1, email = ?2, phone = ?3, dob = ?4 WHERE id = ?5",
        params![name, email, phone, dob.as_ref().map(format_date), id],
    )
    .map_err(|e| map_email_conflict(e, email))
}

/// Hard delete a participant. Enrollment rows pointing at it are not touched.
pub fn delete_participant(conn: &Connection, id: i64) -> Result<usize> {
    Ok(conn.execute("DELETE FROM participants WHERE id = ?1", [id])?)
}

// ============================================================================
// Enrollment queries
// ============================================================================

fn enrollment_from_row(row: &Row<'_>) -> rusqlite::Result<Enrollment> {
    Ok(Enrollment {
        id: row.get(0)?,
        course_id: row.get(1)?,
        participant_id: row.get(2)?,
        date_enrolled: row.get(3)?,
    })
}

pub fn insert_enrollment(
    conn: &Connection,
    course_id: i64,
    participant_id: i64,
    date_enrolled: NaiveDate,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO enrollments (course_id, participant_id, date_enrolled) VALUES (?1, ?2, ?3)",
        params![course_id, participant_id, format_date(&date_enrolled)],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_enrollment(conn: &Connection, id: i64) -> Result<Option<Enrollment>> {
    Ok(conn
        .query_row(
            "SELECT id, course_id, participant_id, date_enrolled FROM enrollments WHERE id = ?1",
            [id],
            enrollment_from_row,
        )
        .optional()?)
}

pub fn delete_enrollment(conn: &Connection, id: i64) -> Result<usize> {
    Ok(conn.execute("DELETE FROM enrollments WHERE id = ?1", [id])?)
}

/// Enrollments whose course has the given duration type, joined with names
pub fn enrollments_by_duration_type(
    conn: &Connection,
    duration_type: DurationType,
) -> Result<Vec<EnrollmentRow>> {
    let mut stmt = conn.prepare(
        "SELECT e.id, p.name, c.title, e.date_enrolled
         FROM enrollments e
         JOIN participants p ON e.participant_id = p.id
         JOIN courses c ON e.course_id = c.id
         WHERE c.duration_type = ?1
         ORDER BY e.id",
    )?;
    let rows = stmt.query_map([duration_type], |row| {
        Ok(EnrollmentRow {
            id: row.get(0)?,
            participant_name: row.get(1)?,
            course_title: row.get(2)?,
            date_enrolled: row.get(3)?,
        })
    })?;
    rows.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Enrollments whose course or participant no longer exists
pub fn orphaned_enrollments(conn: &Connection) -> Result<Vec<Enrollment>> {
    let mut stmt = conn.prepare(
        "SELECT e.id, e.course_id, e.participant_id, e.date_enrolled
         FROM enrollments e
         LEFT JOIN courses c ON e.course_id = c.id
         LEFT JOIN participants p ON e.participant_id = p.id
         WHERE c.id IS NULL OR p.id IS NULL
         ORDER BY e.id",
    )?;
    let rows = stmt.query_map([], enrollment_from_row)?;
    rows.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}
