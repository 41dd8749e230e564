//! Participant admin operations

use chrono::NaiveDate;

use crate::database::{queries, Participant, ParticipantDraft};
use crate::error::{ConsoleError, Result};
use crate::utils::dates::{now_timestamp, parse_display_date};
use super::console::{optional, required, Console};

/// Participant form after trimming and date parsing
#[derive(Debug, Clone, PartialEq)]
pub struct ValidParticipant {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub dob: Option<NaiveDate>,
}

/// Check a participant form: name and email are required, and a date of
/// birth, when given, must read as `dd/mm/yyyy`.
pub fn validate_participant(draft: &ParticipantDraft) -> Result<ValidParticipant> {
    let name = required(&draft.name, "Name must not be empty")?;
    let email = required(&draft.email, "Email must not be empty")?;
    let dob = match optional(draft.dob.as_deref()) {
        Some(text) => Some(parse_display_date(&text).ok_or_else(|| {
            ConsoleError::Validation(format!("Date of birth must be dd/mm/yyyy: {text}"))
        })?),
        None => None,
    };
    Ok(ValidParticipant {
        name,
        email,
        phone: optional(draft.phone.as_deref()),
        dob,
    })
}

impl Console {
    /// All participants in insertion order
    pub fn list_participants(&self) -> Result<Vec<Participant>> {
        queries::all_participants(self.conn()?)
    }

    /// Get a participant by id
    pub fn get_participant(&self, id: i64) -> Result<Participant> {
        queries::get_participant(self.conn()?, id)?
            .ok_or(ConsoleError::NotFound { entity: "participant", id })
    }

    /// Add a participant, returning its id. A taken email gives `DuplicateEmail`.
    pub fn add_participant(&self, draft: &ParticipantDraft) -> Result<i64> {
        let p = validate_participant(draft)?;
        let id = queries::insert_participant(
            self.conn()?,
            &p.name,
            &p.email,
            p.phone.as_deref(),
            p.dob,
            &now_timestamp(),
        )?;
        tracing::info!(id, "participant added");
        Ok(id)
    }

    /// Rewrite a participant with new form values
    pub fn update_participant(&self, id: i64, draft: &ParticipantDraft) -> Result<()> {
        let p = validate_participant(draft)?;
        let rows = queries::update_participant(
            self.conn()?,
            id,
            &p.name,
            &p.email,
            p.phone.as_deref(),
            p.dob,
        )?;
        if rows == 0 {
            return Err(ConsoleError::NotFound { entity: "participant", id });
        }
        tracing::info!(id, "participant updated");
        Ok(())
    }

    /// Delete a participant. Their enrollments stay behind as orphans.
    pub fn delete_participant(&self, id: i64) -> Result<()> {
        let rows = queries::delete_participant(self.conn()?, id)?;
        if rows == 0 {
            return Err(ConsoleError::NotFound { entity: "participant", id });
        }
        tracing::info!(id, "participant deleted");
        Ok(())
    }
}
