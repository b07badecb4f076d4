//! The schema trait and typed coercion
//!
//! A schema is a record type with named fields and declared defaults. Its
//! [`Default`] value is the default instance; [`Schema::fields`] lists the
//! fields of an instance in declaration order, each tagged as leaf or
//! composite by the [`Field`] constructor used.

use serde::de::DeserializeOwned;
use serde::Serialize;
use weldyn_tree::{value_kind, FieldPath, Mapping, Value};

use crate::error::SchemaError;
use crate::field::Field;

/// Record type with named, defaulted fields
///
/// # Example
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use weldyn_schema::{Field, Schema, SchemaError};
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// struct Retry {
///     attempts: u32,
///     backoff_ms: u64,
/// }
///
/// impl Default for Retry {
///     fn default() -> Self {
///         Self { attempts: 3, backoff_ms: 250 }
///     }
/// }
///
/// impl Schema for Retry {
///     fn fields(&self) -> Result<Vec<Field>, SchemaError> {
///         Ok(vec![
///             Field::leaf("attempts", &self.attempts)?,
///             Field::leaf("backoff_ms", &self.backoff_ms)?,
///         ])
///     }
///
///     fn validate(self) -> Result<Self, String> {
///         if self.attempts == 0 {
///             return Err("attempts must be at least 1".to_string());
///         }
///         Ok(self)
///     }
/// }
/// ```
pub trait Schema: Default + Serialize + DeserializeOwned {
    /// Fields of this instance in declaration order
    ///
    /// Use [`Field::leaf`] for plain values and [`Field::composite`] for
    /// nested schemas.
    ///
    /// # Errors
    /// Returns error if a field's value cannot be rendered as a document value
    fn fields(&self) -> Result<Vec<Field>, SchemaError>;

    /// Schema-level validation rule, run after every field is coerced
    ///
    /// May rewrite the value. Default implementation accepts it unchanged.
    ///
    /// # Errors
    /// Returns a message describing why the value is rejected
    fn validate(self) -> Result<Self, String> {
        Ok(self)
    }
}

/// Coerce a raw document value into schema `S`
///
/// Recurses through `S`'s declared fields first, so validation rules of
/// nested schemas run before the rule of `S` itself.
///
/// # Errors
/// - [`SchemaError::ExpectedMapping`] if `raw` is not a mapping
/// - [`SchemaError::Coercion`] if a node does not deserialize into its type
/// - [`SchemaError::Validation`] if a validation rule rejects a value
pub fn coerce<S: Schema>(path: &FieldPath, raw: Value) -> Result<S, SchemaError> {
    let Value::Mapping(mut map) = raw else {
        return Err(SchemaError::ExpectedMapping {
            path: path.clone(),
            found: value_kind(&raw),
        });
    };

    for field in S::default().fields()? {
        if let Some(slot) = map.get_mut(field.name()) {
            let raw_field = std::mem::replace(slot, Value::Null);
            *slot = field.coerce(&path.child(field.name()), raw_field)?;
        }
    }

    assemble(path, map)
}

/// Build `S` from already-coerced fields and run its validation rule
///
/// # Errors
/// - [`SchemaError::Coercion`] if the mapping does not deserialize into `S`
/// - [`SchemaError::Validation`] if `S::validate` rejects the value
pub fn assemble<S: Schema>(path: &FieldPath, fields: Mapping) -> Result<S, SchemaError> {
    let value: S = serde_yaml::from_value(Value::Mapping(fields))
        .map_err(|e| SchemaError::coercion(path, e))?;

    value.validate().map_err(|message| SchemaError::Validation {
        path: path.clone(),
        message,
    })
}
