//! Artifact location and persistence
//!
//! An artifact is the file holding one document group. [`ArtifactStore`]
//! resolves a group identifier to its file, reads the file into a tree, and
//! rewrites it whole.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use weldyn_tree::{value_kind, Mapping, Value};

use crate::codec::{DocumentCodec, DocumentFormat};
use crate::error::StoreError;

/// Reads and writes group artifacts in one document format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArtifactStore {
    format: DocumentFormat,
}

impl ArtifactStore {
    /// Create store for a document format
    #[inline]
    #[must_use]
    pub fn new(format: DocumentFormat) -> Self {
        Self { format }
    }

    /// Document format of this store
    #[inline]
    #[must_use]
    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    #[inline]
    fn codec(&self) -> &'static dyn DocumentCodec {
        self.format.codec()
    }

    /// File path for a document group
    ///
    /// An identifier already carrying one of the format's extensions is used
    /// as the file name verbatim; otherwise the default extension is appended.
    /// Nothing is created on disk.
    ///
    /// # Examples
    /// - `("models.yaml", "/etc/app")` → `/etc/app/models.yaml`
    /// - `("schema_1", "/etc/app")` → `/etc/app/schema_1.yaml`
    #[must_use]
    pub fn locate(&self, group: &str, base_dir: &Path) -> PathBuf {
        let codec = self.codec();
        if codec.has_extension(group) {
            base_dir.join(group)
        } else {
            base_dir.join(format!("{group}.{}", codec.default_extension()))
        }
    }

    /// Check if an artifact has been generated
    ///
    /// # Errors
    /// [`StoreError::Io`] if existence cannot be determined
    pub fn exists(&self, path: &Path) -> Result<bool, StoreError> {
        path.try_exists().map_err(|e| StoreError::io_error(path, e))
    }

    /// Read an artifact into a tree
    ///
    /// An artifact holding no document reads as an empty mapping.
    ///
    /// # Errors
    /// - [`StoreError::Io`] if the file cannot be read
    /// - [`StoreError::Decode`] if the text is malformed
    /// - [`StoreError::NotAMapping`] if the top level is not a mapping
    pub fn read(&self, path: &Path) -> Result<Mapping, StoreError> {
        let text = fs::read_to_string(path).map_err(|e| StoreError::io_error(path, e))?;

        let value = self.codec().decode(&text).map_err(|source| StoreError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        match value {
            Value::Mapping(tree) => Ok(tree),
            Value::Null => Ok(Mapping::new()),
            other => Err(StoreError::NotAMapping {
                path: path.to_path_buf(),
                found: value_kind(&other),
            }),
        }
    }

    /// Replace an artifact's whole content with `tree`
    ///
    /// Creates the parent directory if needed. The text is written to a
    /// temporary file next to the target and renamed over it, so readers see
    /// either the old or the new document, never a partial one.
    ///
    /// A symlinked artifact is written through: the linked file is replaced
    /// and the link kept. An existing file keeps its permissions; a new one
    /// gets the same mode `File::create` would give it.
    ///
    /// # Errors
    /// - [`StoreError::Encode`] if the tree cannot be rendered
    /// - [`StoreError::Io`] if any filesystem step fails
    pub fn write(&self, path: &Path, tree: &Mapping) -> Result<(), StoreError> {
        let text = self.codec().encode(tree).map_err(|source| StoreError::Encode {
            path: path.to_path_buf(),
            source,
        })?;

        let target = write_target(path)?;
        let dir = parent_dir(&target);
        fs::create_dir_all(dir).map_err(|e| StoreError::io_error(dir, e))?;

        let permissions = match fs::metadata(&target) {
            Ok(meta) => Some(meta.permissions()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(StoreError::io_error(&target, e)),
        };

        let mut temp = temp_file_in(dir)?;
        if let Some(permissions) = permissions {
            temp.as_file()
                .set_permissions(permissions)
                .map_err(|e| StoreError::io_error(temp.path(), e))?;
        }
        temp.write_all(text.as_bytes())
            .map_err(|e| StoreError::io_error(temp.path(), e))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io_error(temp.path(), e))?;
        temp.persist(&target)
            .map_err(|e| StoreError::io_error(&target, e.error))?;

        tracing::trace!(path = %target.display(), bytes = text.len(), "artifact written");
        Ok(())
    }
}

/// File the rename must replace: symlinks resolved, `path` itself if absent
fn write_target(path: &Path) -> Result<PathBuf, StoreError> {
    match fs::canonicalize(path) {
        Ok(target) => Ok(target),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(StoreError::io_error(path, e)),
    }
}

#[cfg(unix)]
fn temp_file_in(dir: &Path) -> Result<NamedTempFile, StoreError> {
    use std::os::unix::fs::PermissionsExt;

    // 0666 less the process umask, as for `File::create`
    tempfile::Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
        .map_err(|e| StoreError::io_error(dir, e))
}

#[cfg(not(unix))]
fn temp_file_in(dir: &Path) -> Result<NamedTempFile, StoreError> {
    NamedTempFile::new_in(dir).map_err(|e| StoreError::io_error(dir, e))
}

/// Directory holding `path`; `.` for bare file names
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}
