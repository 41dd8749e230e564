//! Data models for training console entities

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Training format tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DurationType {
    #[serde(rename = "Short-term")]
    ShortTerm,
    #[default]
    #[serde(rename = "Long-term")]
    LongTerm,
    #[serde(rename = "Seminar")]
    Seminar,
}

impl DurationType {
    /// All variants in display order
    pub const ALL: [DurationType; 3] = [
        DurationType::ShortTerm,
        DurationType::LongTerm,
        DurationType::Seminar,
    ];

    /// Stored label
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationType::ShortTerm => "Short-term",
            DurationType::LongTerm => "Long-term",
            DurationType::Seminar => "Seminar",
        }
    }

    /// Label written by the first revisions of the console
    pub fn legacy_label(&self) -> &'static str {
        match self {
            DurationType::ShortTerm => "Ngắn hạn",
            DurationType::LongTerm => "Dài hạn",
            DurationType::Seminar => "Seminar",
        }
    }
}

impl fmt::Display for DurationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown duration type label
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown duration type: {0}")]
pub struct ParseDurationTypeError(pub String);

impl FromStr for DurationType {
    type Err = ParseDurationTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let key = trimmed.to_lowercase().replace(['_', ' '], "-");
        match key.as_str() {
            "short-term" | "short" => return Ok(DurationType::ShortTerm),
            "long-term" | "long" => return Ok(DurationType::LongTerm),
            "seminar" => return Ok(DurationType::Seminar),
            _ => {}
        }
        DurationType::ALL
            .into_iter()
            .find(|dt| dt.legacy_label() == trimmed)
            .ok_or_else(|| ParseDurationTypeError(s.to_string()))
    }
}

impl ToSql for DurationType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for DurationType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let label = value.as_str()?;
        label
            .parse()
            .map_err(|e: ParseDurationTypeError| FromSqlError::Other(Box::new(e)))
    }
}

/// Course record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Insert timestamp (`yyyy-mm-dd HH:MM:SS`), never rewritten
    pub date_created: String,
    pub duration_type: DurationType,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Local upload path or remote URL
    pub image_url: Option<String>,
    pub ref_url: Option<String>,
}

/// Participant record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_created: String,
    pub dob: Option<NaiveDate>,
}

/// Enrollment record as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub course_id: i64,
    pub participant_id: i64,
    /// Stored enrollment date; rows from old revisions may hold other shapes
    pub date_enrolled: String,
}

/// Enrollment joined with its participant and course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRow {
    pub id: i64,
    pub participant_name: String,
    pub course_title: String,
    pub date_enrolled: String,
}

/// Participant summary shown next to a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolledParticipant {
    pub name: String,
    pub email: String,
}

/// Course form values, used for both add and update
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CourseDraft {
    pub title: String,
    pub description: Option<String>,
    pub duration_type: DurationType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub image_url: Option<String>,
    pub ref_url: Option<String>,
}

/// Participant form values, used for both add and update
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParticipantDraft {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Free-text date of birth, `dd/mm/yyyy`
    pub dob: Option<String>,
}

/// A single cell of a tabular result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Cell {
    /// Text content, if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer content, if this is an integer cell
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

impl From<ValueRef<'_>> for Cell {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Cell::Null,
            ValueRef::Integer(v) => Cell::Integer(v),
            ValueRef::Real(v) => Cell::Real(v),
            ValueRef::Text(bytes) => Cell::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Cell::Blob(bytes.to_vec()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Integer(v) => write!(f, "{v}"),
            Cell::Real(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
            Cell::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// Query result: column names in declared order plus rows
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Tabular {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Tabular {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` in the named column
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// All cells of the named column
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().filter_map(|r| r.get(idx)).collect())
    }
}
