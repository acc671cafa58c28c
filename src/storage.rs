//! Flat-directory snapshot storage.
//!
//! Snapshots are JPEG files named `img_<YYYYMMDD>_<HHMMSS>.jpg` in a single
//! directory; the filename is the only metadata. Sorting filenames in reverse
//! therefore yields newest-first capture order. Two snapshots taken within
//! the same wall-clock second share a name and the later write wins.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::error::{CamError, Result};

/// Storage for snapshot JPEG files under a single flat directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Open a store rooted at `dir`, creating the directory if absent.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "Snapshot store ready");
        Ok(Self { dir })
    }

    /// The storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist encoded JPEG bytes under a timestamp-derived filename and
    /// return that filename.
    pub fn save(&self, jpeg: &[u8]) -> Result<String> {
        self.save_at(jpeg, Local::now())
    }

    /// Persist with an explicit capture time. Same-second captures
    /// overwrite each other.
    pub fn save_at(&self, jpeg: &[u8], taken: DateTime<Local>) -> Result<String> {
        let name = filename_for(taken);
        fs::write(self.dir.join(&name), jpeg)?;
        info!(name = %name, bytes = jpeg.len(), "Snapshot saved");
        Ok(name)
    }

    /// List stored snapshot filenames, newest first.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Ok(name) = entry.file_name().into_string() {
                    names.push(name);
                }
            }
        }
        names.sort_unstable();
        names.reverse();
        Ok(names)
    }

    /// Read one stored snapshot's bytes.
    ///
    /// The name is reduced to its basename first, so traversal attempts
    /// cannot escape the storage directory.
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let safe = sanitize_name(name).ok_or_else(|| CamError::InvalidSnapshotName {
            name: name.to_string(),
        })?;
        let path = self.dir.join(safe);
        if !path.is_file() {
            return Err(CamError::SnapshotNotFound {
                name: safe.to_string(),
            });
        }
        Ok(fs::read(path)?)
    }

    /// Delete one stored snapshot. Returns whether a file was removed;
    /// a missing or unsafe name is a logged no-op.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let Some(safe) = sanitize_name(name) else {
            warn!(name = %name, "Refusing to delete unsafe snapshot name");
            return Ok(false);
        };
        let path = self.dir.join(safe);
        if path.is_file() {
            fs::remove_file(&path)?;
            info!(name = %safe, "Snapshot deleted");
            Ok(true)
        } else {
            debug!(name = %safe, "Delete of missing snapshot ignored");
            Ok(false)
        }
    }

    /// Number of stored snapshots.
    pub fn count(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }
}

/// Build the timestamp filename for a capture instant.
#[must_use]
pub fn filename_for(taken: DateTime<Local>) -> String {
    taken.format("img_%Y%m%d_%H%M%S.jpg").to_string()
}

/// Reduce a user-supplied filename to its bare basename.
///
/// Returns `None` for names with no usable final component (empty strings,
/// `..`, trailing slashes).
#[must_use]
pub fn sanitize_name(name: &str) -> Option<&str> {
    let base = Path::new(name).file_name()?.to_str()?;
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    Some(base)
}
