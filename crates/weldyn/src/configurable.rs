//! Schemas that declare their own persistence

use weldyn_schema::Schema;

use crate::error::Result;
use crate::loader::Loader;
use crate::spec::ConfigSpec;

/// Schema type with a declared config spec
///
/// # Example
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use weldyn::{ConfigSpec, Configurable, Field, Schema, SchemaError};
///
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// struct Settings {
///     verbose: bool,
/// }
///
/// impl Schema for Settings {
///     fn fields(&self) -> Result<Vec<Field>, SchemaError> {
///         Ok(vec![Field::leaf("verbose", &self.verbose)?])
///     }
/// }
///
/// impl Configurable for Settings {
///     fn config_spec() -> ConfigSpec {
///         ConfigSpec::new()
///     }
/// }
///
/// let settings = Settings::load().unwrap();
/// assert!(!settings.verbose);
/// ```
pub trait Configurable: Schema {
    /// Persistence declaration of this type
    fn config_spec() -> ConfigSpec;

    /// Instantiate from the declared artifacts
    ///
    /// # Errors
    /// See [`Loader::load`]
    fn load() -> Result<Self> {
        Loader::<Self>::new()?.load()
    }
}

impl<T: Configurable> Loader<T> {
    /// Create loader from the type's declared spec
    ///
    /// # Errors
    /// Returns [`ConfigError`](crate::ConfigError) if the declared spec is
    /// unusable
    pub fn new() -> Result<Self> {
        Self::with_spec(&T::config_spec())
    }
}
