//! Business logic layer for the training console
//!
//! This module provides the high-level Console API: one set of
//! operations per view (dashboard, catalog, course, participant and
//! enrollment admin) plus the schema self-check.

pub mod console;
pub mod dashboard;
pub mod courses;
pub mod participants;
pub mod enrollments;
pub mod check;

pub use console::Console;
pub use dashboard::{CatalogEntry, Dashboard, UpcomingCourse};
pub use enrollments::EnrollmentOptions;
pub use check::{SelfCheckReport, TableCheck};
