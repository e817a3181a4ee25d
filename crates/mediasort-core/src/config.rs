use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::error::OrganizeError;

/// What to do when a renamed file lands on a name already used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Last write wins.
    #[default]
    Overwrite,
    /// Append `(1)`, `(2)`, ... when the name was already written in this run.
    Suffix,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FolderNames {
    pub videos: String,
    pub documents: String,
    pub errors: String,
}

impl Default for FolderNames {
    fn default() -> Self {
        Self {
            videos: "Videos".to_string(),
            documents: "pdfs".to_string(),
            errors: "error_files".to_string(),
        }
    }
}

/// Classification rules and destination naming for a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrganizerConfig {
    pub video_extensions: Vec<String>,
    pub document_extensions: Vec<String>,
    pub folders: FolderNames,
    /// Emit a progress event every N copied photos. 0 disables it.
    pub progress_interval: u64,
    pub on_collision: CollisionPolicy,
    /// Try `IMG_20190509_154733.jpg`-style names before falling back to mtime.
    pub guess_from_filename: bool,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            video_extensions: [".mp4", ".avi", ".mov", ".mkv"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            document_extensions: vec![".pdf".to_string()],
            folders: FolderNames::default(),
            progress_interval: 250,
            on_collision: CollisionPolicy::default(),
            guess_from_filename: false,
        }
    }
}

impl OrganizerConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        let config: OrganizerConfig = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        let config = config.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Lowercase every extension and make sure it starts with a dot.
    pub fn normalized(mut self) -> Self {
        self.video_extensions = normalize_extensions(&self.video_extensions);
        self.document_extensions = normalize_extensions(&self.document_extensions);
        self
    }

    pub fn validate(&self) -> Result<(), OrganizeError> {
        let folders = [
            ("videos", &self.folders.videos),
            ("documents", &self.folders.documents),
            ("errors", &self.folders.errors),
        ];
        let mut seen = HashSet::new();
        for (role, name) in folders {
            if name.trim().is_empty() {
                return Err(OrganizeError::Config(format!("{role} folder name is empty")));
            }
            if name.contains(['/', '\\']) || name == "." || name == ".." {
                return Err(OrganizeError::Config(format!(
                    "{role} folder name {name:?} must be a single path component"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(OrganizeError::Config(format!(
                    "folder name {name:?} is used more than once"
                )));
            }
        }
        Ok(())
    }

    pub fn is_video(&self, ext: &str) -> bool {
        contains_ext(&self.video_extensions, ext)
    }

    pub fn is_document(&self, ext: &str) -> bool {
        contains_ext(&self.document_extensions, ext)
    }
}

fn normalize_extensions(exts: &[String]) -> Vec<String> {
    exts.iter()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty() && e != ".")
        .map(|e| if e.starts_with('.') { e } else { format!(".{e}") })
        .collect()
}

fn contains_ext(set: &[String], ext: &str) -> bool {
    set.iter().any(|e| e.eq_ignore_ascii_case(ext))
}
