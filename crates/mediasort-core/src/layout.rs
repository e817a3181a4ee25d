use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::OrganizerConfig;
use crate::date::CaptureDate;
use crate::error::OrganizeError;

/// Fixed folders under the destination root, plus the `YYYY-MM` buckets
/// created so far in this run.
#[derive(Debug)]
pub struct DestinationLayout {
    pub root: PathBuf,
    pub videos: PathBuf,
    pub documents: PathBuf,
    pub errors: PathBuf,
    created_months: HashSet<PathBuf>,
}

impl DestinationLayout {
    /// Create the root and fixed subfolders. Existing folders are fine.
    pub fn prepare(root: &Path, config: &OrganizerConfig) -> Result<Self, OrganizeError> {
        create_dir(root, true)?;
        let layout = Self {
            root: root.to_path_buf(),
            videos: root.join(&config.folders.videos),
            documents: root.join(&config.folders.documents),
            errors: root.join(&config.folders.errors),
            created_months: HashSet::new(),
        };
        for dir in [&layout.videos, &layout.documents, &layout.errors] {
            create_dir(dir, false)?;
        }
        Ok(layout)
    }

    /// `root/YYYY-MM`, created on first use.
    pub fn month_dir(&mut self, date: &CaptureDate) -> Result<PathBuf, OrganizeError> {
        let dir = self.root.join(date.folder_name());
        if !self.created_months.contains(&dir) {
            create_dir(&dir, false)?;
            self.created_months.insert(dir.clone());
        }
        Ok(dir)
    }
}

fn create_dir(path: &Path, parents: bool) -> Result<(), OrganizeError> {
    let result = if parents {
        fs::create_dir_all(path)
    } else {
        fs::create_dir(path)
    };
    match result {
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        other => other.map_err(|source| OrganizeError::CreateDir {
            path: path.to_path_buf(),
            source,
        }),
    }
}
