//! Error types for Weldyn
//!
//! Configuration errors are raised here; schema and store errors are
//! wrapped from their crates. Nothing is retried or swallowed: the first
//! failure ends the load.

use weldyn_schema::SchemaError;
use weldyn_store::StoreError;

/// Main Weldyn error type
#[derive(Debug, thiserror::Error)]
pub enum WeldynError {
    /// Config spec is unusable
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Raw data does not coerce into the schema
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Artifact could not be read, written, or locked
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl WeldynError {
    /// Check if error stems from the config spec rather than data or disk
    #[inline]
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Errors in a [`ConfigSpec`](crate::ConfigSpec)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Groups are mapped but there is no directory to put them in
    #[error("base_dir is required when document groups are mapped (groups: {})", groups.join(", "))]
    MissingBaseDir { groups: Vec<String> },

    /// One field is assigned to several document groups
    #[error("field '{field}' is assigned to more than one document group: {}", groups.join(", "))]
    GroupConflict { field: String, groups: Vec<String> },

    /// Relative base_dir could not be anchored
    #[error("cannot resolve working directory for relative base_dir: {0}")]
    WorkingDir(#[source] std::io::Error),
}

/// Result type for Weldyn operations
pub type Result<T> = std::result::Result<T, WeldynError>;
