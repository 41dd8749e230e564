//! Enrollment admin operations

use chrono::NaiveDate;
use serde::Serialize;

use crate::database::{queries, Course, DurationType, Enrollment, EnrollmentRow, Participant};
use crate::error::{ConsoleError, Result};
use super::console::Console;

/// Choices offered by the enrollment form
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentOptions {
    pub courses: Vec<Course>,
    pub participants: Vec<Participant>,
}

impl EnrollmentOptions {
    /// The form cannot be submitted without at least one of each
    pub fn is_complete(&self) -> bool {
        !self.courses.is_empty() && !self.participants.is_empty()
    }
}

impl Console {
    /// Courses of one duration type plus every participant
    pub fn enrollment_options(&self, duration_type: DurationType) -> Result<EnrollmentOptions> {
        let conn = self.conn()?;
        Ok(EnrollmentOptions {
            courses: queries::courses_by_duration_type(conn, duration_type)?,
            participants: queries::all_participants(conn)?,
        })
    }

    /// Enroll a participant in a course on `date`, returning the enrollment id.
    ///
    /// Both rows must exist now; nothing keeps them alive afterwards.
    pub fn enroll(&self, course_id: i64, participant_id: i64, date: NaiveDate) -> Result<i64> {
        let conn = self.conn()?;
        if queries::get_course(conn, course_id)?.is_none() {
            return Err(ConsoleError::NotFound { entity: "course", id: course_id });
        }
        if queries::get_participant(conn, participant_id)?.is_none() {
            return Err(ConsoleError::NotFound { entity: "participant", id: participant_id });
        }
        let id = queries::insert_enrollment(conn, course_id, participant_id, date)?;
        tracing::info!(id, course_id, participant_id, "enrollment added");
        Ok(id)
    }

    /// Get an enrollment by id
    pub fn get_enrollment(&self, id: i64) -> Result<Enrollment> {
        queries::get_enrollment(self.conn()?, id)?
            .ok_or(ConsoleError::NotFound { entity: "enrollment", id })
    }

    /// Enrollments in courses of one duration type, with names resolved
    pub fn list_enrollments(&self, duration_type: DurationType) -> Result<Vec<EnrollmentRow>> {
        queries::enrollments_by_duration_type(self.conn()?, duration_type)
    }

    /// Remove an enrollment
    pub fn delete_enrollment(&self, id: i64) -> Result<()> {
        let rows = queries::delete_enrollment(self.conn()?, id)?;
        if rows == 0 {
            return Err(ConsoleError::NotFound { entity: "enrollment", id });
        }
        tracing::info!(id, "enrollment deleted");
        Ok(())
    }

    /// Enrollments left pointing at a deleted course or participant
    pub fn orphaned_enrollments(&self) -> Result<Vec<Enrollment>> {
        queries::orphaned_enrollments(self.conn()?)
    }
}
