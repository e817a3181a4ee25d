pub mod cancel;
pub mod config;
pub mod date;
pub mod error;
pub mod layout;
pub mod media;
pub mod pipeline;
pub mod report;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_support;

use std::path::Path;

pub use cancel::CancellationToken;
pub use config::{CollisionPolicy, FolderNames, OrganizerConfig};
pub use error::OrganizeError;
pub use media::MediaKind;
pub use pipeline::{Organizer, Outcome};
pub use report::{write_report, ErrorRecord, ErrorReport, RunStatistics, REPORT_FILENAME};

/// Control options for a run (cancellation).
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    /// Checked before each file; once set, the run stops and reports what it did.
    pub cancel_token: Option<CancellationToken>,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = Some(token);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.as_ref().is_some_and(|t| t.is_cancelled())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ProgressEvent<'a> {
    /// About to process this file
    File(&'a Path),
    /// Emitted every `progress_interval` copied photos
    Milestone { photos: u64 },
}

/// Type alias for progress callback. `'a` lets the closure borrow locals.
pub type ProgressCallback<'a> = dyn Fn(ProgressEvent<'_>) + Send + Sync + 'a;

/// Organize `source` into `destination` with no progress reporting.
pub fn organize(
    source: &Path,
    destination: &Path,
    config: OrganizerConfig,
) -> anyhow::Result<RunStatistics> {
    organize_with_control(source, destination, config, &RunControl::default(), &|_| {})
}

/// Organize `source` into `destination` with progress reporting and control options.
pub fn organize_with_control(
    source: &Path,
    destination: &Path,
    config: OrganizerConfig,
    control: &RunControl,
    progress: &ProgressCallback<'_>,
) -> anyhow::Result<RunStatistics> {
    Organizer::new(config, destination)?.run(source, control, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_file;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[test]
    fn test_organize_counts_videos_case_insensitively() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        for name in ["a.MP4", "b.Avi", "c.mov", "nested/d.MKV"] {
            write_file(src.path(), name, b"v");
        }

        let stats = organize(src.path(), dest.path(), OrganizerConfig::default()).unwrap();
        assert_eq!(stats.videos, 4);
        assert_eq!(stats.photos, 0);
        for name in ["a.MP4", "b.Avi", "c.mov", "d.MKV"] {
            assert!(dest.path().join("Videos").join(name).is_file(), "{name}");
        }
    }

    #[test]
    fn test_custom_folder_names() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        write_file(src.path(), "doc.PDF", b"%PDF");
        write_file(src.path(), "talk.webm", b"v");

        let mut config = OrganizerConfig::default();
        config.folders.documents = "Documents".to_string();
        config.video_extensions.push(".webm".to_string());

        let stats = organize(src.path(), dest.path(), config).unwrap();
        assert_eq!((stats.pdfs, stats.videos), (1, 1));
        assert!(dest.path().join("Documents/doc.PDF").is_file());
        assert!(dest.path().join("Videos/talk.webm").is_file());
        assert!(!dest.path().join("pdfs").exists());
    }

    #[test]
    fn test_progress_closure_borrows_locals() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        write_file(src.path(), "a.mp4", b"v");
        write_file(src.path(), "b.pdf", b"%PDF");

        let seen: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());
        let stats = organize_with_control(
            src.path(),
            dest.path(),
            OrganizerConfig::default(),
            &RunControl::new(),
            &|event| {
                if let ProgressEvent::File(path) = event {
                    seen.lock().unwrap().push(path.to_path_buf());
                }
            },
        )
        .unwrap();

        assert_eq!((stats.videos, stats.pdfs), (1, 1));
        assert_eq!(seen.into_inner().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let dest = tempfile::tempdir().unwrap();
        let mut config = OrganizerConfig::default();
        config.folders.errors = String::new();
        assert!(organize(dest.path(), &dest.path().join("out"), config).is_err());
    }
}
