//! Database layer for the training console
//!
//! Handles SQLite database operations including:
//! - Schema creation and versioned additive migrations
//! - The generic tabular query pass-through
//! - Per-view queries for courses, participants, enrollments

pub mod models;
pub mod schema;
pub mod connection;
pub mod migrations;
pub mod queries;

pub use connection::Store;
pub use models::*;
pub use schema::Table;
