//! Weldyn Artifact Store
//!
//! File-level persistence for document groups:
//!
//! - [`ArtifactStore`] locates, reads, and atomically rewrites artifacts
//! - [`DocumentCodec`] converts between text and trees (YAML, JSON)
//! - [`ArtifactLock`] serializes read-merge-write cycles on one artifact
//!
//! # Example
//!
//! ```
//! use weldyn_store::{ArtifactLock, ArtifactStore};
//! use weldyn_tree::Mapping;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = ArtifactStore::default();
//! let path = store.locate("models", dir.path());
//!
//! let _guard = ArtifactLock::acquire(&path).unwrap();
//! store.write(&path, &Mapping::new()).unwrap();
//! assert!(store.read(&path).unwrap().is_empty());
//! ```

#![warn(unreachable_pub)]

pub mod codec;
mod error;
mod lock;
mod store;

pub use codec::{DocumentCodec, DocumentFormat, JsonCodec, YamlCodec};
pub use error::{CodecError, StoreError};
pub use lock::ArtifactLock;
pub use store::ArtifactStore;
