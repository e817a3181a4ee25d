use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::config::OrganizerConfig;
use crate::date::{self, DateSource};
use crate::error::OrganizeError;
use crate::layout::DestinationLayout;
use crate::media::{classify, MediaKind, SourceFile};
use crate::report::RunStatistics;
use crate::writer::{copy_preserving, DestinationNamer};
use crate::{ProgressCallback, ProgressEvent, RunControl};

/// What happened to one source file.
#[derive(Debug)]
pub enum Outcome {
    /// Video, PDF, or photo dated from its own metadata or name
    Copied { kind: MediaKind, dest: PathBuf },
    /// Photo with no capture date, filed by modification time
    FallbackDated { dest: PathBuf },
    Failed(OrganizeError),
}

pub struct Organizer {
    config: OrganizerConfig,
    layout: DestinationLayout,
    namer: DestinationNamer,
}

impl Organizer {
    /// Validate `config` and prepare the destination folders.
    pub fn new(config: OrganizerConfig, destination: &Path) -> anyhow::Result<Self> {
        config.validate()?;
        let layout = DestinationLayout::prepare(destination, &config)
            .with_context(|| format!("cannot prepare destination {}", destination.display()))?;
        let namer = DestinationNamer::new(config.on_collision);
        Ok(Self {
            config,
            layout,
            namer,
        })
    }

    /// Walk `source` and copy every regular file into the destination.
    /// Per-file failures are recorded, never returned.
    pub fn run(
        &mut self,
        source: &Path,
        control: &RunControl,
        progress: &ProgressCallback<'_>,
    ) -> anyhow::Result<RunStatistics> {
        let source = source
            .canonicalize()
            .with_context(|| format!("cannot read source {}", source.display()))?;
        anyhow::ensure!(source.is_dir(), "source {} is not a directory", source.display());
        let dest_root = self
            .layout
            .root
            .canonicalize()
            .with_context(|| format!("cannot read destination {}", self.layout.root.display()))?;
        anyhow::ensure!(
            !source.starts_with(&dest_root),
            "source {} lies inside destination {}",
            source.display(),
            dest_root.display()
        );

        info!(source = %source.display(), destination = %dest_root.display(), "organizing");
        let mut stats = RunStatistics::default();

        // Never walk back into our own output.
        let walker = WalkDir::new(&source)
            .into_iter()
            .filter_entry(|e| !e.path().starts_with(&dest_root));

        for entry in walker {
            if control.is_cancelled() {
                warn!("cancelled, stopping before remaining files");
                stats.interrupted = true;
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    record_walk_error(&mut stats, err, &source);
                    continue;
                }
            };
            if !is_regular_file(&entry) {
                continue;
            }

            let path = entry.path();
            progress(ProgressEvent::File(path));

            match self.process_file(path) {
                Outcome::Copied { kind, dest } => {
                    debug!("Copied: {} -> {}", path.display(), dest.display());
                    match kind {
                        MediaKind::Video => stats.videos += 1,
                        MediaKind::Pdf => stats.pdfs += 1,
                        MediaKind::Photo => self.count_photo(&mut stats, progress),
                    }
                }
                Outcome::FallbackDated { dest } => {
                    debug!("Copied (modification time): {} -> {}", path.display(), dest.display());
                    stats.fallback_dated.push(path.to_path_buf());
                    self.count_photo(&mut stats, progress);
                }
                Outcome::Failed(err) => {
                    warn!(path = %path.display(), error = %err, "failed, moving to error folder");
                    self.rescue(path);
                    stats.record_error(path, err);
                }
            }
        }

        info!(
            photos = stats.photos,
            videos = stats.videos,
            pdfs = stats.pdfs,
            errors = stats.errors.len(),
            "done"
        );
        Ok(stats)
    }

    pub fn process_file(&mut self, path: &Path) -> Outcome {
        self.try_process_file(path).unwrap_or_else(Outcome::Failed)
    }

    fn try_process_file(&mut self, path: &Path) -> Result<Outcome, OrganizeError> {
        let file = SourceFile::open(path)?;

        match classify(&file.extension, &self.config) {
            MediaKind::Video => {
                let dir = self.layout.videos.clone();
                let dest = self.copy_into(&file, &dir, &file.file_name)?;
                Ok(Outcome::Copied {
                    kind: MediaKind::Video,
                    dest,
                })
            }
            MediaKind::Pdf => {
                let dir = self.layout.documents.clone();
                let dest = self.copy_into(&file, &dir, &file.file_name)?;
                Ok(Outcome::Copied {
                    kind: MediaKind::Pdf,
                    dest,
                })
            }
            MediaKind::Photo => {
                let date = date::resolve_source_date(&file, &self.config);
                let dir = self.layout.month_dir(&date)?;
                let name = date.file_name(&file.extension);
                let dest = self.copy_into(&file, &dir, OsStr::new(&name))?;
                Ok(match date.source {
                    DateSource::Modified => Outcome::FallbackDated { dest },
                    DateSource::Exif | DateSource::Filename => Outcome::Copied {
                        kind: MediaKind::Photo,
                        dest,
                    },
                })
            }
        }
    }

    fn copy_into(&mut self, file: &SourceFile, dir: &Path, name: &OsStr) -> Result<PathBuf, OrganizeError> {
        let dest = self.namer.assign(dir, name);
        copy_preserving(&file.path, &dest)?;
        Ok(dest)
    }

    fn count_photo(&self, stats: &mut RunStatistics, progress: &ProgressCallback<'_>) {
        stats.photos += 1;
        let every = self.config.progress_interval;
        if every > 0 && stats.photos % every == 0 {
            progress(ProgressEvent::Milestone {
                photos: stats.photos,
            });
        }
    }

    /// Copy the untouched original into the error folder. Failure here is only logged.
    fn rescue(&mut self, path: &Path) {
        let Some(name) = path.file_name() else {
            error!(path = %path.display(), "cannot copy to error folder: no file name");
            return;
        };
        let errors_dir = self.layout.errors.clone();
        let dest = self.namer.assign(&errors_dir, name);
        if let Err(e) = copy_preserving(path, &dest) {
            error!(path = %path.display(), error = %e, "cannot copy to error folder");
        }
    }
}

/// An entry the walker could not read has no file to rescue, so it is only
/// recorded. Errors without a path are charged to the source root.
fn record_walk_error(stats: &mut RunStatistics, err: walkdir::Error, source: &Path) {
    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| source.to_path_buf());
    warn!(path = %path.display(), error = %err, "cannot read entry");
    stats.record_error(&path, OrganizeError::Walk(err));
}

/// Regular files, and symlinks that resolve to one.
fn is_regular_file(entry: &walkdir::DirEntry) -> bool {
    let ft = entry.file_type();
    ft.is_file() || (ft.is_symlink() && entry.path().is_file())
}
