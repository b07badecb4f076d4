//! Weldyn Schema Boundary
//!
//! What the reconciler needs from a schema framework, expressed as one trait:
//!
//! - enumerate a schema's fields with their defaults ([`Schema::fields`])
//! - tell nested schemas from plain values, by construction ([`Field::leaf`]
//!   vs [`Field::composite`])
//! - coerce raw document data into the declared types and run the schema's
//!   own validation rules ([`coerce`], [`Schema::validate`])
//!
//! [`default_tree`] turns a default instance into the [`DefaultTree`] used for
//! first-time generation and for reconciliation.
//!
//! [`DefaultTree`]: weldyn_tree::DefaultTree

#![warn(unreachable_pub)]

mod error;
mod field;
mod schema;

pub use error::SchemaError;
pub use field::{default_tree, CoerceFn, Field};
pub use schema::{assemble, coerce, Schema};
