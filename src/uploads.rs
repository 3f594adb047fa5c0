//! Local-disk storage for task attachments.

use std::io::ErrorKind;
use std::path::PathBuf;

use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use uuid::Uuid;

use crate::error::AppError;

lazy_static! {
    static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]+").unwrap();
}

/// An uploaded file held in memory until the owner check has passed.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

/// Writes attachments into one directory under collision-free names.
#[derive(Debug, Clone)]
pub struct AttachmentStorage {
    dir: PathBuf,
    max_bytes: usize,
}

impl AttachmentStorage {
    pub const DEFAULT_MAX_BYTES: usize = 10 * 1024 * 1024;

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_bytes: Self::DEFAULT_MAX_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Largest upload accepted, in bytes.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Stores `file` and returns the path it was written to.
    pub async fn save(&self, file: &UploadedFile) -> Result<String, AppError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let name = file
            .filename
            .as_deref()
            .map(sanitize_filename)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "upload".to_string());
        let path = self.dir.join(format!("{}-{}", Uuid::new_v4(), name));

        tokio::fs::write(&path, &file.bytes).await?;
        info!("Stored attachment {} ({} bytes)", path.display(), file.bytes.len());
        Ok(path.to_string_lossy().into_owned())
    }

    /// Unlinks a stored attachment. A file that is already gone is not an error;
    /// other failures are logged and swallowed since the record change has already happened.
    pub async fn remove(&self, path: &str) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => info!("Removed attachment {}", path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove attachment {}: {}", path, e),
        }
    }
}

/// Reduces a client-supplied filename to its last path component with only
/// `[A-Za-z0-9._-]` characters.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(name);
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(base, "_");
    cleaned.trim_start_matches('.').to_string()
}
