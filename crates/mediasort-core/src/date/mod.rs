pub mod exif;
pub mod guess;

use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime, SubsecRound};
use tracing::debug;

use crate::config::OrganizerConfig;
use crate::error::OrganizeError;
use crate::media::SourceFile;

/// Where a capture date came from, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Exif,
    Filename,
    /// Last-modified time of the file itself.
    Modified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureDate {
    pub date: NaiveDateTime,
    pub source: DateSource,
}

impl CaptureDate {
    /// Month bucket, `YYYY-MM`.
    pub fn folder_name(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    /// `YYYYMMDD_HHMMSS` followed by the (already lowercased) extension.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}{}", self.date.format("%Y%m%d_%H%M%S"), extension)
    }
}

/// Resolve the capture date of `path`.
///
/// Unreadable or missing metadata never fails: the date degrades to the
/// file's modification time. Only a failure to stat the file is an error.
pub fn resolve_date(path: &Path, config: &OrganizerConfig) -> Result<CaptureDate, OrganizeError> {
    if let Some(found) = embedded_date(path, config) {
        return Ok(found);
    }
    let modified = path
        .metadata()
        .and_then(|m| m.modified())
        .map_err(|source| OrganizeError::Metadata {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(modified_date(path, modified))
}

/// Same as [`resolve_date`], reusing the modification time already read
/// for `file`.
pub fn resolve_source_date(file: &SourceFile, config: &OrganizerConfig) -> CaptureDate {
    embedded_date(&file.path, config).unwrap_or_else(|| modified_date(&file.path, file.modified))
}

fn embedded_date(path: &Path, config: &OrganizerConfig) -> Option<CaptureDate> {
    if may_carry_exif(path) {
        match exif::read_capture_date(path) {
            Ok(date) => {
                return Some(CaptureDate {
                    date,
                    source: DateSource::Exif,
                })
            }
            Err(e) => debug!(path = %path.display(), error = %e, "no usable EXIF capture date"),
        }
    }

    if config.guess_from_filename {
        let date = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(guess::guess_date_from_filename)?;
        return Some(CaptureDate {
            date,
            source: DateSource::Filename,
        });
    }

    None
}

fn modified_date(path: &Path, modified: SystemTime) -> CaptureDate {
    debug!(path = %path.display(), "falling back to modification time");
    CaptureDate {
        date: local_naive(modified),
        source: DateSource::Modified,
    }
}

/// Skip the EXIF parse only for types known not to be images (text, audio, ...).
fn may_carry_exif(path: &Path) -> bool {
    match mime_guess::from_path(path).first() {
        Some(mime) => mime.type_() == mime_guess::mime::IMAGE,
        None => true,
    }
}

/// Convert a filesystem timestamp to local wall-clock time, truncated to the second.
pub fn local_naive(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local().trunc_subsecs(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{jpeg_with_capture_date, set_mtime, write_file};
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_exif_wins_over_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "a.JPG", &jpeg_with_capture_date("2021:05:03 14:22:10"));
        set_mtime(&path, at(2020, 1, 1, 0, 0, 0));

        let resolved = resolve_date(&path, &OrganizerConfig::default()).unwrap();
        assert_eq!(resolved.source, DateSource::Exif);
        assert_eq!(resolved.date, at(2021, 5, 3, 14, 22, 10));
        assert_eq!(resolved.folder_name(), "2021-05");
        assert_eq!(resolved.file_name(".jpg"), "20210503_142210.jpg");
    }

    #[test]
    fn test_falls_back_to_mtime_for_garbage_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "broken.jpg", b"\xff\xd8 truncated");
        set_mtime(&path, at(2018, 7, 4, 9, 30, 5));

        let resolved = resolve_date(&path, &OrganizerConfig::default()).unwrap();
        assert_eq!(resolved.source, DateSource::Modified);
        assert_eq!(resolved.date, at(2018, 7, 4, 9, 30, 5));
    }

    #[test]
    fn test_filename_guess_is_opt_in() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "IMG_20190509_154733.jpg", b"no exif here");
        set_mtime(&path, at(2022, 2, 2, 2, 2, 2));

        let default = resolve_date(&path, &OrganizerConfig::default()).unwrap();
        assert_eq!(default.source, DateSource::Modified);

        let config = OrganizerConfig {
            guess_from_filename: true,
            ..OrganizerConfig::default()
        };
        let guessed = resolve_date(&path, &config).unwrap();
        assert_eq!(guessed.source, DateSource::Filename);
        assert_eq!(guessed.date, at(2019, 5, 9, 15, 47, 33));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_date(&dir.path().join("gone.jpg"), &OrganizerConfig::default());
        assert!(matches!(err, Err(OrganizeError::Metadata { .. })));
    }
}
