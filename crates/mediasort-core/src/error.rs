use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reasons a single file, or the run setup, can fail.
#[derive(Debug, Error)]
pub enum OrganizeError {
    #[error("failed to create folder {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("failed to read file metadata of {}: {source}", path.display())]
    Metadata { path: PathBuf, source: io::Error },

    #[error("failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("path has no file name: {}", .0.display())]
    MissingFileName(PathBuf),

    #[error("failed to write report {}: {source}", path.display())]
    Report { path: PathBuf, source: io::Error },

    #[error("invalid configuration: {0}")]
    Config(String),
}
