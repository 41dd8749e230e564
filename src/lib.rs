//! # Training Console Core
//!
//! Data-access core for a single-operator training administration console:
//! courses, participants and the enrollments linking them, stored in SQLite.
//!
//! ## Features
//!
//! - Idempotent, versioned, additive schema migrations run at every open
//! - Tabular query pass-through with bound parameters
//! - Dashboard, catalog and admin operations for each entity
//! - Schema self-check
//! - Local upload sink for course images
//!
//! ## Example
//!
//! ```no_run
//! use traincore::{Console, ConsoleConfig, CourseDraft, DurationType};
//! use chrono::NaiveDate;
//!
//! let console = Console::open(&ConsoleConfig::default()).unwrap();
//! let id = console.add_course(&CourseDraft {
//!     title: "Intro".to_string(),
//!     duration_type: DurationType::ShortTerm,
//!     start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//!     ..Default::default()
//! }).unwrap();
//! println!("added course {id}");
//! ```

pub mod database;
pub mod business;
pub mod uploads;
pub mod utils;
pub mod config;
pub mod error;

// Re-export main types
pub use error::{ConsoleError, Result};
pub use database::models::{
    Cell, Course, CourseDraft, DurationType, EnrolledParticipant, Enrollment, EnrollmentRow,
    Participant, ParticipantDraft, Tabular,
};
pub use database::{Store, Table};
pub use business::{CatalogEntry, Console, Dashboard, EnrollmentOptions, SelfCheckReport};
pub use uploads::{UploadNaming, UploadSink};
pub use config::ConsoleConfig;

/// Default database filename
pub const DATABASE_FILENAME: &str = "training.db";

/// Default upload directory
pub const UPLOADS_DIR: &str = "uploads";

/// Upcoming courses shown on the dashboard
pub const UPCOMING_COURSES_LIMIT: usize = 5;
