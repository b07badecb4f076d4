//! YAML codec
//!
//! Uses serde_yaml. A stream with no documents (empty text, comments only)
//! decodes to null; a stream with more than one document is rejected.

use serde::Deserialize;
use weldyn_tree::{Mapping, Value};

use super::DocumentCodec;
use crate::error::CodecError;

/// YAML document codec
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl DocumentCodec for YamlCodec {
    fn decode(&self, text: &str) -> Result<Value, CodecError> {
        let mut documents = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(text) {
            documents.push(Value::deserialize(doc)?);
        }

        match documents.len() {
            0 => Ok(Value::Null),
            1 => Ok(documents.remove(0)),
            n => Err(CodecError::MultipleDocuments(n)),
        }
    }

    fn encode(&self, tree: &Mapping) -> Result<String, CodecError> {
        Ok(serde_yaml::to_string(tree)?)
    }

    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}
