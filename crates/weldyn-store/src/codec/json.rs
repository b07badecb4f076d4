//! JSON codec
//!
//! Uses serde_json, pretty-printed with a trailing newline.

use weldyn_tree::{Mapping, Value};

use super::DocumentCodec;
use crate::error::CodecError;

/// JSON document codec
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl DocumentCodec for JsonCodec {
    fn decode(&self, text: &str) -> Result<Value, CodecError> {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(text)?)
    }

    fn encode(&self, tree: &Mapping) -> Result<String, CodecError> {
        let mut text = serde_json::to_string_pretty(tree)?;
        text.push('\n');
        Ok(text)
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }
}
