use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::OrganizeError;

pub const REPORT_FILENAME: &str = "error_report.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub file: String,
    pub error: String,
}

/// Counters and records accumulated over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub photos: u64,
    pub videos: u64,
    pub pdfs: u64,
    pub errors: Vec<ErrorRecord>,
    /// Photos dated by modification time because no capture date was found
    pub fallback_dated: Vec<PathBuf>,
    pub interrupted: bool,
}

impl RunStatistics {
    pub fn record_error(&mut self, path: &Path, error: impl fmt::Display) {
        let mut message = error.to_string();
        if message.is_empty() {
            message = "unknown error".to_string();
        }
        self.errors.push(ErrorRecord {
            file: path.display().to_string(),
            error: message,
        });
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total copied: {}", self.photos)?;
        writeln!(f, "Videos copied: {}", self.videos)?;
        writeln!(f, "PDFs copied: {}", self.pdfs)?;
        writeln!(f, "Errors: {}", self.errors.len())?;
        write!(f, "Dated by modification time: {}", self.fallback_dated.len())?;
        if self.interrupted {
            write!(f, "\nInterrupted before all files were visited")?;
        }
        Ok(())
    }
}

/// On-disk shape of `error_report.json`.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub copy_errors: Vec<ErrorRecord>,
    pub exif_errors: Vec<String>,
}

impl From<&RunStatistics> for ErrorReport {
    fn from(stats: &RunStatistics) -> Self {
        Self {
            copy_errors: stats.errors.clone(),
            exif_errors: stats
                .fallback_dated
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        }
    }
}

/// Write the report as 4-space indented JSON. Non-ASCII is kept verbatim.
pub fn write_report(path: &Path, stats: &RunStatistics) -> Result<(), OrganizeError> {
    let report_err = |source| OrganizeError::Report {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(report_err)?;
    let mut writer = BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
    ErrorReport::from(stats)
        .serialize(&mut ser)
        .map_err(|e| report_err(io::Error::from(e)))?;
    writer.flush().map_err(report_err)?;
    Ok(())
}
