//! Error types for schema declaration and coercion

use weldyn_tree::FieldPath;

/// Errors raised while describing a schema or coercing raw data into it
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A default value could not be rendered as a document value
    #[error("cannot serialize default of '{path}': {message}")]
    Serialize { path: FieldPath, message: String },

    /// Two fields of one schema share a name
    #[error("field '{path}' is declared more than once")]
    DuplicateField { path: FieldPath },

    /// Raw value does not deserialize into the declared type
    #[error("'{path}' does not match its declared type: {message}")]
    Coercion { path: FieldPath, message: String },

    /// Composite field holds something other than a mapping
    #[error("'{path}' expected a mapping, found {found}")]
    ExpectedMapping { path: FieldPath, found: &'static str },

    /// A schema's own validation rule rejected the value
    #[error("validation failed for '{path}': {message}")]
    Validation { path: FieldPath, message: String },
}

impl SchemaError {
    /// Create serialize error for path
    pub fn serialize(path: &FieldPath, source: impl std::fmt::Display) -> Self {
        Self::Serialize {
            path: path.clone(),
            message: source.to_string(),
        }
    }

    /// Create coercion error for path
    pub fn coercion(path: &FieldPath, source: impl std::fmt::Display) -> Self {
        Self::Coercion {
            path: path.clone(),
            message: source.to_string(),
        }
    }

    /// Path of the node the error refers to
    #[must_use]
    pub fn path(&self) -> &FieldPath {
        match self {
            Self::Serialize { path, .. }
            | Self::DuplicateField { path }
            | Self::Coercion { path, .. }
            | Self::ExpectedMapping { path, .. }
            | Self::Validation { path, .. } => path,
        }
    }
}
