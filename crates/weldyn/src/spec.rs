//! Config spec declaration and normalization
//!
//! A [`ConfigSpec`] is what a schema type declares about its persistence:
//! where artifacts live, which fields go to which artifact, and in which
//! document format. [`ConfigSpec::resolve`] checks and normalizes it once,
//! producing the immutable [`ResolvedSpec`] every field resolution reads.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use weldyn_store::{ArtifactStore, DocumentFormat};

use crate::error::ConfigError;
use crate::mapping::{GroupMapping, GroupMappingValidator};

/// Persistence declaration of a schema type
///
/// # Example
/// ```rust
/// use weldyn::ConfigSpec;
///
/// let spec = ConfigSpec::new()
///     .with_base_dir("/etc/app")
///     .with_group("models.yaml", ["schema_1", "schema_2"]);
/// assert!(spec.resolve().unwrap().is_persistent());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigSpec {
    base_dir: Option<PathBuf>,
    groups: GroupMapping,
    format: DocumentFormat,
}

impl ConfigSpec {
    /// Create spec without persistence
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set directory holding the artifacts
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Assign fields to a document group
    #[must_use]
    pub fn with_group<I, S>(mut self, group: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.assign(group, fields);
        self
    }

    /// Replace the whole group mapping
    #[must_use]
    pub fn with_groups(mut self, groups: GroupMapping) -> Self {
        self.groups = groups;
        self
    }

    /// Set document format of the artifacts
    #[must_use]
    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.format = format;
        self
    }

    /// Declared base directory, as given
    #[must_use]
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Declared group mapping
    #[inline]
    #[must_use]
    pub fn groups(&self) -> &GroupMapping {
        &self.groups
    }

    /// Declared document format
    #[inline]
    #[must_use]
    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Check and normalize the spec
    ///
    /// An empty mapping disables persistence, whatever the base directory. A
    /// relative base directory is anchored to the current working directory;
    /// an empty one counts as absent.
    ///
    /// # Errors
    /// - [`ConfigError::MissingBaseDir`] if groups are mapped without a base
    ///   directory
    /// - [`ConfigError::WorkingDir`] if a relative base directory cannot be
    ///   anchored
    pub fn resolve(&self) -> Result<ResolvedSpec, ConfigError> {
        let store = ArtifactStore::new(self.format());
        let groups = self.groups();

        if groups.is_empty() {
            return Ok(ResolvedSpec {
                base_dir: None,
                groups: GroupMapping::new(),
                store,
            });
        }

        let base_dir = match self.base_dir() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => {
                return Err(ConfigError::MissingBaseDir {
                    groups: groups.groups().map(str::to_string).collect(),
                })
            }
        };

        let base_dir = if base_dir.is_absolute() {
            base_dir.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(ConfigError::WorkingDir)?
                .join(base_dir)
        };

        Ok(ResolvedSpec {
            base_dir: Some(base_dir),
            groups: groups.clone(),
            store,
        })
    }
}

/// Checked, normalized config spec
///
/// Invariant: `base_dir` is an absolute path whenever `groups` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpec {
    base_dir: Option<PathBuf>,
    groups: GroupMapping,
    store: ArtifactStore,
}

impl ResolvedSpec {
    /// Check if any field is persisted
    #[inline]
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Absolute base directory, if persistence is enabled
    #[must_use]
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Group mapping
    #[inline]
    #[must_use]
    pub fn groups(&self) -> &GroupMapping {
        &self.groups
    }

    /// Store for this spec's document format
    #[inline]
    #[must_use]
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Group persisting `field`, if any
    ///
    /// # Errors
    /// [`ConfigError::GroupConflict`] if several groups list the field
    pub fn group_of(&self, field: &str) -> Result<Option<&str>, ConfigError> {
        GroupMappingValidator::new().group_of(field, &self.groups)
    }

    /// Artifact path of a group
    ///
    /// `None` when persistence is disabled.
    #[must_use]
    pub fn artifact_path(&self, group: &str) -> Option<PathBuf> {
        self.base_dir
            .as_deref()
            .map(|dir| self.store.locate(group, dir))
    }
}
