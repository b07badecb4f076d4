//! Weldyn
//!
//! Typed configuration schemas backed by human-editable documents that
//! follow the schema as it evolves.
//!
//! # Architecture
//!
//! A schema declares which of its top-level fields are persisted, and in
//! which document group, through a [`ConfigSpec`]. Loading resolves each
//! field in declaration order:
//!
//! - unmapped fields take their code-level default
//! - a mapped field whose artifact is missing generates it from the defaults
//!   of every field in its group
//! - otherwise the artifact is reconciled: user values kept, new fields
//!   filled with defaults, removed fields dropped, at every depth
//!
//! The resulting raw value is then coerced into the field's type, running
//! the schema's validation rules.
//!
//! # Crates
//!
//! - `weldyn-tree`: document trees and the reconciler
//! - `weldyn-schema`: the [`Schema`] trait and coercion
//! - `weldyn-store`: artifact files, codecs, and locking
//!
//! # Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use weldyn::{ConfigSpec, Field, Loader, Schema, SchemaError};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Database {
//!     url: String,
//!     pool: u32,
//! }
//!
//! impl Default for Database {
//!     fn default() -> Self {
//!         Self { url: "sqlite::memory:".into(), pool: 4 }
//!     }
//! }
//!
//! impl Schema for Database {
//!     fn fields(&self) -> Result<Vec<Field>, SchemaError> {
//!         Ok(vec![Field::leaf("url", &self.url)?, Field::leaf("pool", &self.pool)?])
//!     }
//! }
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct AppConfig {
//!     database: Database,
//! }
//!
//! impl Schema for AppConfig {
//!     fn fields(&self) -> Result<Vec<Field>, SchemaError> {
//!         Ok(vec![Field::composite("database", &self.database)?])
//!     }
//! }
//!
//! let dir = tempfile::tempdir().unwrap();
//! let spec = ConfigSpec::new()
//!     .with_base_dir(dir.path())
//!     .with_group("app", ["database"]);
//!
//! let config: AppConfig = Loader::with_spec(&spec).unwrap().load().unwrap();
//! assert_eq!(config.database.pool, 4);
//! assert!(dir.path().join("app.yaml").is_file());
//! ```

#![warn(unreachable_pub)]

mod configurable;
mod error;
mod loader;
mod mapping;
mod spec;

pub use configurable::Configurable;
pub use error::{ConfigError, Result, WeldynError};
pub use loader::{FieldResolution, Loader, ResolvedField};
pub use mapping::{GroupMapping, GroupMappingValidator};
pub use spec::{ConfigSpec, ResolvedSpec};

pub use weldyn_schema::{assemble, coerce, default_tree, Field, Schema, SchemaError};
pub use weldyn_store::{ArtifactLock, ArtifactStore, DocumentCodec, DocumentFormat, StoreError};
pub use weldyn_tree::{
    reconcile, Branch, Change, ChangeKind, DefaultTree, FieldPath, Mapping, Reconciled, Value,
};

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
