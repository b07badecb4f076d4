//! Document codecs
//!
//! Convert between document text and the generic tree:
//! - YAML via serde_yaml (default)
//! - JSON via serde_json

use serde::{Deserialize, Serialize};
use weldyn_tree::{Mapping, Value};

use crate::error::CodecError;

mod json;
mod yaml;

pub use json::JsonCodec;
pub use yaml::YamlCodec;

/// Textual document format
///
/// Implement this trait to persist trees in another format.
pub trait DocumentCodec: Send + Sync + 'static {
    /// Parse document text into a tree
    ///
    /// Text holding no document at all decodes to [`Value::Null`].
    ///
    /// # Errors
    /// Returns [`CodecError`] if the text is malformed
    fn decode(&self, text: &str) -> Result<Value, CodecError>;

    /// Render a tree as document text
    ///
    /// # Errors
    /// Returns [`CodecError`] if the tree cannot be expressed in this format
    fn encode(&self, tree: &Mapping) -> Result<String, CodecError>;

    /// Recognized file extensions (without dot), conventional one first
    fn extensions(&self) -> &[&str];

    /// Extension appended to group identifiers that carry none
    fn default_extension(&self) -> &str {
        self.extensions().first().copied().unwrap_or("")
    }

    /// Check if a file name already carries one of this format's extensions
    fn has_extension(&self, file_name: &str) -> bool {
        std::path::Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }
}

/// Built-in document formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// YAML documents (`.yaml`, `.yml`)
    #[default]
    Yaml,
    /// JSON documents (`.json`)
    Json,
}

impl DocumentFormat {
    /// Codec implementing this format
    #[inline]
    #[must_use]
    pub fn codec(self) -> &'static dyn DocumentCodec {
        match self {
            Self::Yaml => &YamlCodec,
            Self::Json => &JsonCodec,
        }
    }
}
