//! Weldyn Document Trees
//!
//! The data currency shared by schemas and on-disk documents, and the merge
//! that keeps the two in step.
//!
//! # Core Concepts
//!
//! - [`Value`] / [`Mapping`]: generic document tree as parsed from disk
//! - [`DefaultTree`]: a schema's current shape with every node at its default,
//!   tagged `Leaf` or `Composite`
//! - [`reconcile`]: merge an on-disk tree into the default shape, keeping
//!   overrides, filling new keys, dropping undeclared ones
//! - [`FieldPath`]: dotted address of a node, used in change reports and errors
//!
//! # Example
//!
//! ```rust
//! use weldyn_tree::{reconcile, Branch, DefaultTree, Mapping, Value};
//!
//! let defaults: Branch = [
//!     ("x".to_string(), DefaultTree::Leaf(Value::from(1))),
//!     ("w".to_string(), DefaultTree::Leaf(Value::Bool(true))),
//! ]
//! .into_iter()
//! .collect();
//!
//! let on_disk: Mapping = serde_yaml::from_str("x: 2\ny: stale\n").unwrap();
//! let result = reconcile(&on_disk, &defaults);
//!
//! assert_eq!(result.tree.get("x"), Some(&Value::from(2)));
//! assert_eq!(result.tree.get("w"), Some(&Value::Bool(true)));
//! assert!(result.tree.get("y").is_none());
//! ```

#![warn(unreachable_pub)]

mod default;
mod path;
mod reconcile;
mod value;

pub use default::{Branch, DefaultTree};
pub use path::{FieldPath, PathError};
pub use reconcile::{extract, reconcile, Change, ChangeKind, Reconciled};
pub use serde_yaml::{Mapping, Value};
pub use value::value_kind;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
