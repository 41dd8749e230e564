//! Console configuration

use std::path::PathBuf;

use crate::{DATABASE_FILENAME, UPCOMING_COURSES_LIMIT, UPLOADS_DIR};

/// Locations and limits used when opening a console
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// SQLite store file
    pub database_path: PathBuf,
    /// Directory for uploaded course images
    pub uploads_dir: PathBuf,
    /// How many upcoming courses the dashboard shows
    pub upcoming_limit: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DATABASE_FILENAME),
            uploads_dir: PathBuf::from(UPLOADS_DIR),
            upcoming_limit: UPCOMING_COURSES_LIMIT,
        }
    }
}

impl ConsoleConfig {
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    pub fn with_uploads_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.uploads_dir = dir.into();
        self
    }

    pub fn with_upcoming_limit(mut self, limit: usize) -> Self {
        self.upcoming_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.database_path, PathBuf::from("training.db"));
        assert_eq!(config.uploads_dir, PathBuf::from("uploads"));
        assert_eq!(config.upcoming_limit, 5);
    }

    #[test]
    fn test_builders() {
        let config = ConsoleConfig::default()
            .with_database_path("/tmp/t.db")
            .with_uploads_dir("/tmp/up")
            .with_upcoming_limit(3);
        assert_eq!(config.database_path, PathBuf::from("/tmp/t.db"));
        assert_eq!(config.uploads_dir, PathBuf::from("/tmp/up"));
        assert_eq!(config.upcoming_limit, 3);
    }
}
