use std::collections::{HashMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tracing::warn;

use crate::config::CollisionPolicy;
use crate::error::OrganizeError;

/// Copy `from` to `to`, carrying over access and modification times.
/// An existing file at `to` is replaced.
/// Timestamps are best-effort: once the bytes are written, failing to set
/// them is only logged.
pub fn copy_preserving(from: &Path, to: &Path) -> Result<(), OrganizeError> {
    let copy_err = |source| OrganizeError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    let meta = fs::metadata(from).map_err(copy_err)?;
    fs::copy(from, to).map_err(copy_err)?;

    if let Err(e) = carry_over_times(&meta, to) {
        warn!(path = %to.display(), error = %e, "copied, but could not set timestamps");
    }
    Ok(())
}

fn carry_over_times(meta: &Metadata, to: &Path) -> io::Result<()> {
    let atime = FileTime::from_last_access_time(meta);
    let mtime = FileTime::from_last_modification_time(meta);
    filetime::set_file_times(to, atime, mtime)
}

/// Picks the final destination path for each copy according to the
/// collision policy. Only paths written during this run count as taken.
#[derive(Debug, Default)]
pub struct DestinationNamer {
    policy: CollisionPolicy,
    used_paths: HashSet<PathBuf>,
    // Per base path, to avoid rescanning suffixes already handed out
    name_counters: HashMap<PathBuf, u32>,
}

impl DestinationNamer {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Names are kept as raw OS strings so non-UTF-8 names never collapse
    /// onto each other.
    pub fn assign(&mut self, dir: &Path, file_name: &OsStr) -> PathBuf {
        let base = dir.join(file_name);
        if self.policy == CollisionPolicy::Overwrite || !self.used_paths.contains(&base) {
            self.used_paths.insert(base.clone());
            return base;
        }

        let name = Path::new(file_name);
        let stem = name.file_stem().unwrap_or(OsStr::new("file"));
        let ext = name.extension();

        let counter = self.name_counters.entry(base).or_insert(0);
        let dest = loop {
            *counter += 1;
            let mut candidate_name = OsString::from(stem);
            candidate_name.push(format!("({})", counter));
            if let Some(ext) = ext {
                candidate_name.push(".");
                candidate_name.push(ext);
            }
            let candidate = dir.join(candidate_name);
            if !self.used_paths.contains(&candidate) {
                break candidate;
            }
        };
        self.used_paths.insert(dest.clone());
        dest
    }
}
