//! Course admin operations

use crate::database::{queries, Course, CourseDraft, DurationType};
use crate::error::{ConsoleError, Result};
use crate::uploads::UploadNaming;
use crate::utils::dates::now_timestamp;
use super::console::{optional, required, Console};

/// Check a course form and return it with text fields trimmed.
///
/// Title must be non-empty and the start date may not fall after the end
/// date (equal dates are fine).
pub fn validate_course(draft: &CourseDraft) -> Result<CourseDraft> {
    let title = required(&draft.title, "Course title must not be empty")?;
    if draft.start_date > draft.end_date {
        return Err(ConsoleError::Validation(
            "End date must not be before start date".to_string(),
        ));
    }
    Ok(CourseDraft {
        title,
        description: optional(draft.description.as_deref()),
        duration_type: draft.duration_type,
        start_date: draft.start_date,
        end_date: draft.end_date,
        image_url: optional(draft.image_url.as_deref()),
        ref_url: optional(draft.ref_url.as_deref()),
    })
}

impl Console {
    /// Courses of one duration type, ordered by start date
    pub fn list_courses(&self, duration_type: DurationType) -> Result<Vec<Course>> {
        queries::courses_by_duration_type(self.conn()?, duration_type)
    }

    /// Get a course by id
    pub fn get_course(&self, id: i64) -> Result<Course> {
        queries::get_course(self.conn()?, id)?
            .ok_or(ConsoleError::NotFound { entity: "course", id })
    }

    /// Add a course, returning its id
    pub fn add_course(&self, draft: &CourseDraft) -> Result<i64> {
        let draft = validate_course(draft)?;
        let id = queries::insert_course(
            self.conn()?,
            &draft.title,
            draft.description.as_deref(),
            &now_timestamp(),
            draft.duration_type,
            draft.start_date,
            draft.end_date,
            draft.image_url.as_deref(),
            draft.ref_url.as_deref(),
        )?;
        tracing::info!(id, title = %draft.title, "course added");
        Ok(id)
    }

    /// Rewrite a course with new form values
    pub fn update_course(&self, id: i64, draft: &CourseDraft) -> Result<()> {
        let draft = validate_course(draft)?;
        let rows = queries::update_course(
            self.conn()?,
            id,
            &draft.title,
            draft.description.as_deref(),
            draft.duration_type,
            draft.start_date,
            draft.end_date,
            draft.image_url.as_deref(),
            draft.ref_url.as_deref(),
        )?;
        if rows == 0 {
            return Err(ConsoleError::NotFound { entity: "course", id });
        }
        tracing::info!(id, "course updated");
        Ok(())
    }

    /// Delete a course. Its enrollments stay behind as orphans.
    pub fn delete_course(&self, id: i64) -> Result<()> {
        let rows = queries::delete_course(self.conn()?, id)?;
        if rows == 0 {
            return Err(ConsoleError::NotFound { entity: "course", id });
        }
        tracing::info!(id, "course deleted");
        Ok(())
    }

    /// Store an uploaded image and return the value to use as `image_url`
    pub fn upload_course_image(
        &self,
        file_name: &str,
        bytes: &[u8],
        naming: UploadNaming,
    ) -> Result<String> {
        let path = self.uploads.store(file_name, bytes, naming)?;
        Ok(path.to_string_lossy().into_owned())
    }
}
