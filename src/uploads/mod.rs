//! Local sink for course images
//!
//! Files land in one fixed directory. The only check is the extension
//! allow-list; sizes and contents are not inspected.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConsoleError, Result};

/// Accepted image extensions (lowercase)
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// How a stored file is named
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadNaming {
    /// Keep the client's file name; a later upload with the same name overwrites it
    #[default]
    Original,
    /// Random UUID plus the original extension
    Unique,
}

/// Directory-backed upload store
#[derive(Debug, Clone)]
pub struct UploadSink {
    dir: PathBuf,
}

impl UploadSink {
    pub fn new(dir: &Path) -> Self {
        Self { dir: dir.to_path_buf() }
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` under a name derived from `file_name`, returning the stored path
    pub fn store(&self, file_name: &str, bytes: &[u8], naming: UploadNaming) -> Result<PathBuf> {
        let base = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ConsoleError::Upload(format!("invalid file name: {file_name}")))?;

        let extension = extension_of(base)
            .ok_or_else(|| ConsoleError::Upload(format!("unsupported image type: {base}")))?;

        let stored_name = match naming {
            UploadNaming::Original => base.to_string(),
            UploadNaming::Unique => format!("{}.{extension}", uuid::Uuid::new_v4().simple()),
        };

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(stored_name);
        fs::write(&path, bytes)?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "stored upload");
        Ok(path)
    }
}

/// Lowercased extension if it is on the allow-list
fn extension_of(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_store_original_name() {
        let temp_dir = TempDir::new().unwrap();
        let sink = UploadSink::new(&temp_dir.path().join("uploads"));

        let path = sink.store("banner.PNG", b"img", UploadNaming::Original).unwrap();
        assert_eq!(path, temp_dir.path().join("uploads").join("banner.PNG"));
        assert_eq!(fs::read(&path).unwrap(), b"img");
    }

    #[test]
    fn test_store_unique_name() {
        let temp_dir = TempDir::new().unwrap();
        let sink = UploadSink::new(temp_dir.path());

        let a = sink.store("photo.jpg", b"1", UploadNaming::Unique).unwrap();
        let b = sink.store("photo.jpg", b"2", UploadNaming::Unique).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.extension().unwrap(), "jpg");
        assert_eq!(fs::read(&b).unwrap(), b"2");
    }

    #[test]
    fn test_directory_components_stripped() {
        let temp_dir = TempDir::new().unwrap();
        let sink = UploadSink::new(&temp_dir.path().join("uploads"));

        let path = sink.store("../../etc/evil.png", b"x", UploadNaming::Original).unwrap();
        assert_eq!(path.parent().unwrap(), sink.dir());
    }

    #[test]
    fn test_rejects_other_extensions() {
        let temp_dir = TempDir::new().unwrap();
        let sink = UploadSink::new(temp_dir.path());

        for name in ["script.sh", "noext", "image.gif", ""] {
            assert!(matches!(
                sink.store(name, b"x", UploadNaming::Original),
                Err(ConsoleError::Upload(_))
            ));
        }
    }
}
