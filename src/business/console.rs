//! Main Console API
//!
//! The `Console` owns the store handle and the upload sink. Every view
//! (dashboard, catalog, course/participant/enrollment admin) is a set of
//! methods on it; each call goes straight to the store, nothing is cached.

use rusqlite::Connection;

use crate::config::ConsoleConfig;
use crate::database::Store;
use crate::error::Result;
use crate::uploads::UploadSink;
use crate::UPCOMING_COURSES_LIMIT;

/// Training console service
pub struct Console {
    /// Schema-checked store
    pub(crate) store: Store,
    /// Destination for course images
    pub(crate) uploads: UploadSink,
    /// Dashboard upcoming-course window
    pub(crate) upcoming_limit: usize,
}

impl Console {
    /// Open the store named in `config`, migrating it if needed
    pub fn open(config: &ConsoleConfig) -> Result<Self> {
        let store = Store::open(&config.database_path)?;
        Ok(Self {
            store,
            uploads: UploadSink::new(&config.uploads_dir),
            upcoming_limit: config.upcoming_limit,
        })
    }

    /// Build a console around an already opened store
    pub fn new(store: Store, uploads: UploadSink) -> Self {
        Self {
            store,
            uploads,
            upcoming_limit: UPCOMING_COURSES_LIMIT,
        }
    }

    /// Underlying store handle
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Upload sink for course images
    pub fn uploads(&self) -> &UploadSink {
        &self.uploads
    }

    pub(crate) fn conn(&self) -> Result<&Connection> {
        self.store.connection()
    }
}

/// Trim a required text field, failing with `message` when it ends up empty
pub(crate) fn required(value: &str, message: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::error::ConsoleError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field; blank input is stored as NULL
pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
