//! Per-artifact exclusive lock
//!
//! Serializes read-merge-write cycles on one artifact, across threads and
//! across processes. The OS lock is held on a sidecar file
//! `<dir>/.<artifact-file>.lock` so the artifact itself can be replaced by
//! rename while locked.
//!
//! # Invariants
//!
//! - At most one guard per artifact exists at a time
//! - Lock is released when the guard is dropped
//! - Locks on different artifacts never contend

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::StoreError;
use crate::store::parent_dir;

/// Exclusive lock guard for one artifact
#[derive(Debug)]
pub struct ArtifactLock {
    /// Sidecar lock file
    path: PathBuf,
    file: File,
}

impl ArtifactLock {
    /// Lock file path for an artifact
    ///
    /// # Examples
    /// `/etc/app/models.yaml` → `/etc/app/.models.yaml.lock`
    #[must_use]
    pub fn lock_path_for(artifact: &Path) -> PathBuf {
        let name = artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        parent_dir(artifact).join(format!(".{name}.lock"))
    }

    /// Acquire the lock, waiting for any current holder to release it
    ///
    /// Creates the artifact's directory if it does not exist yet.
    ///
    /// # Errors
    /// - [`StoreError::Io`] if the lock file cannot be created
    /// - [`StoreError::Lock`] if the OS lock cannot be taken
    pub fn acquire(artifact: &Path) -> Result<Self, StoreError> {
        let (path, file) = Self::open(artifact)?;
        file.lock_exclusive()
            .map_err(|e| StoreError::lock_error(&path, e))?;

        tracing::trace!(lock = %path.display(), "artifact lock acquired");
        Ok(Self { path, file })
    }

    /// Acquire the lock without waiting
    ///
    /// # Errors
    /// - [`StoreError::Locked`] if another guard holds the lock
    /// - [`StoreError::Io`] if the lock file cannot be created
    /// - [`StoreError::Lock`] if the OS lock fails for another reason
    pub fn try_acquire(artifact: &Path) -> Result<Self, StoreError> {
        let (path, file) = Self::open(artifact)?;
        match file.try_lock_exclusive() {
            Ok(()) => {
                tracing::trace!(lock = %path.display(), "artifact lock acquired");
                Ok(Self { path, file })
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                Err(StoreError::Locked { path })
            }
            Err(e) => Err(StoreError::lock_error(path, e)),
        }
    }

    /// Path to the sidecar lock file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(artifact: &Path) -> Result<(PathBuf, File), StoreError> {
        let path = Self::lock_path_for(artifact);
        let dir = parent_dir(&path);
        fs::create_dir_all(dir).map_err(|e| StoreError::io_error(dir, e))?;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| StoreError::io_error(&path, e))?;

        Ok((path, file))
    }
}

impl Drop for ArtifactLock {
    fn drop(&mut self) {
        // Closing the handle releases the lock as well
        let _ = FileExt::unlock(&self.file);
    }
}
