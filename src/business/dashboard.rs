//! Dashboard and course catalog views

use chrono::NaiveDate;
use serde::Serialize;

use crate::database::queries::{self, DurationCount};
use crate::database::{Course, DurationType, EnrolledParticipant};
use crate::error::Result;
use super::console::Console;

/// Course starting soon, with who signed up
#[derive(Debug, Clone, Serialize)]
pub struct UpcomingCourse {
    pub course: Course,
    pub enrolled: Vec<String>,
}

/// Headline numbers and the upcoming-course list
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub total_courses: i64,
    pub total_participants: i64,
    pub by_duration_type: Vec<DurationCount>,
    pub upcoming: Vec<UpcomingCourse>,
}

/// One course in the catalog with its enrolled participants
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub course: Course,
    pub enrolled: Vec<EnrolledParticipant>,
}

impl Console {
    /// Build the dashboard as seen on `today`
    pub fn dashboard(&self, today: NaiveDate) -> Result<Dashboard> {
        let conn = self.conn()?;
        let upcoming = queries::upcoming_courses(conn, today, self.upcoming_limit)?
            .into_iter()
            .map(|course| -> Result<UpcomingCourse> {
                let enrolled = queries::enrolled_participants(conn, course.id)?
                    .into_iter()
                    .map(|p| p.name)
                    .collect();
                Ok(UpcomingCourse { course, enrolled })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Dashboard {
            total_courses: queries::count_courses(conn)?,
            total_participants: queries::count_participants(conn)?,
            by_duration_type: queries::count_courses_by_duration_type(conn)?,
            upcoming,
        })
    }

    /// Courses of one duration type, each with its participants
    pub fn catalog(&self, duration_type: DurationType) -> Result<Vec<CatalogEntry>> {
        let conn = self.conn()?;
        queries::courses_by_duration_type(conn, duration_type)?
            .into_iter()
            .map(|course| -> Result<CatalogEntry> {
                let enrolled = queries::enrolled_participants(conn, course.id)?;
                Ok(CatalogEntry { course, enrolled })
            })
            .collect()
    }
}
