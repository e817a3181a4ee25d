use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::OrganizerConfig;
use crate::error::OrganizeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Pdf,
    /// Anything that is neither a video nor a document.
    Photo,
}

/// Map a file extension (with or without the leading dot) to its kind.
pub fn classify(extension: &str, config: &OrganizerConfig) -> MediaKind {
    let ext = if extension.is_empty() || extension.starts_with('.') {
        extension.to_lowercase()
    } else {
        format!(".{}", extension.to_lowercase())
    };

    if config.is_video(&ext) {
        MediaKind::Video
    } else if config.is_document(&ext) {
        MediaKind::Pdf
    } else {
        MediaKind::Photo
    }
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Just the filename, byte-for-byte as on disk
    pub file_name: OsString,
    /// Lowercased, with leading dot; empty if the file has none
    pub extension: String,
    pub modified: SystemTime,
}

impl SourceFile {
    pub fn open(path: &Path) -> Result<Self, OrganizeError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| OrganizeError::MissingFileName(path.to_path_buf()))?;
        let modified = path
            .metadata()
            .and_then(|m| m.modified())
            .map_err(|source| OrganizeError::Metadata {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            extension: extension_of(path),
            file_name,
            modified,
        })
    }
}

pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
