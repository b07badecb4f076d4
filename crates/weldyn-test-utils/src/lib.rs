//! Testing utilities for the Weldyn workspace
//!
//! Shared fixture schemas, scratch directories, and tracing setup.

#![allow(missing_docs)]

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;
use weldyn_schema::{Field, Schema, SchemaError};

/// Install a fmt subscriber for test output, filtered by `RUST_LOG`
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub fn scratch_dir() -> TempDir {
    TempDir::new().unwrap()
}

pub fn read_tree(path: &Path) -> Mapping {
    let text = std::fs::read_to_string(path).unwrap();
    serde_yaml::from_str(&text).unwrap()
}

pub fn yaml(src: &str) -> Value {
    serde_yaml::from_str(src).unwrap()
}

// Two-model layout: schema_1 / schema_2

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model1 {
    pub attribute_1a: i64,
    pub attribute_1b: String,
    pub attribute_1c: i64,
}

impl Default for Model1 {
    fn default() -> Self {
        Self {
            attribute_1a: 1,
            attribute_1b: "value".to_string(),
            attribute_1c: 1,
        }
    }
}

impl Schema for Model1 {
    fn fields(&self) -> Result<Vec<Field>, SchemaError> {
        Ok(vec![
            Field::leaf("attribute_1a", &self.attribute_1a)?,
            Field::leaf("attribute_1b", &self.attribute_1b)?,
            Field::leaf("attribute_1c", &self.attribute_1c)?,
        ])
    }

    /// Increments `attribute_1c`
    fn validate(mut self) -> Result<Self, String> {
        self.attribute_1c += 1;
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model2 {
    pub attribute_2a: String,
    pub attribute_2b: f64,
}

impl Default for Model2 {
    fn default() -> Self {
        Self {
            attribute_2a: "other value".to_string(),
            attribute_2b: 0.01,
        }
    }
}

impl Schema for Model2 {
    fn fields(&self) -> Result<Vec<Field>, SchemaError> {
        Ok(vec![
            Field::leaf("attribute_2a", &self.attribute_2a)?,
            Field::leaf("attribute_2b", &self.attribute_2b)?,
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Models {
    pub schema_1: Model1,
    pub schema_2: Model2,
}

impl Schema for Models {
    fn fields(&self) -> Result<Vec<Field>, SchemaError> {
        Ok(vec![
            Field::composite("schema_1", &self.schema_1)?,
            Field::composite("schema_2", &self.schema_2)?,
        ])
    }
}

// Evolved layout: schema_2 removed, schema_3 added, schema_1 restructured

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubSubModel {
    pub attribute_1f: String,
    pub attribute_1h: String,
}

impl Default for SubSubModel {
    fn default() -> Self {
        Self {
            attribute_1f: "other_nested_value".to_string(),
            attribute_1h: "new_nested_value".to_string(),
        }
    }
}

impl Schema for SubSubModel {
    fn fields(&self) -> Result<Vec<Field>, SchemaError> {
        Ok(vec![
            Field::leaf("attribute_1f", &self.attribute_1f)?,
            Field::leaf("attribute_1h", &self.attribute_1h)?,
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubModel {
    pub attribute_1c: i64,
    pub sub_sub_schema_1a: SubSubModel,
}

impl Default for SubModel {
    fn default() -> Self {
        Self {
            attribute_1c: 42,
            sub_sub_schema_1a: SubSubModel::default(),
        }
    }
}

impl Schema for SubModel {
    fn fields(&self) -> Result<Vec<Field>, SchemaError> {
        Ok(vec![
            Field::leaf("attribute_1c", &self.attribute_1c)?,
            Field::composite("sub_sub_schema_1a", &self.sub_sub_schema_1a)?,
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedModel1 {
    pub attribute_1a: i64,
    pub attribute_1b: String,
    pub sub_schema_1a: SubModel,
}

impl Default for NestedModel1 {
    fn default() -> Self {
        Self {
            attribute_1a: 2,
            attribute_1b: "value".to_string(),
            sub_schema_1a: SubModel::default(),
        }
    }
}

impl Schema for NestedModel1 {
    fn fields(&self) -> Result<Vec<Field>, SchemaError> {
        Ok(vec![
            Field::leaf("attribute_1a", &self.attribute_1a)?,
            Field::leaf("attribute_1b", &self.attribute_1b)?,
            Field::composite("sub_schema_1a", &self.sub_schema_1a)?,
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model3 {
    pub attribute_3c: bool,
}

impl Default for Model3 {
    fn default() -> Self {
        Self { attribute_3c: true }
    }
}

impl Schema for Model3 {
    fn fields(&self) -> Result<Vec<Field>, SchemaError> {
        Ok(vec![Field::leaf("attribute_3c", &self.attribute_3c)?])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvolvedModels {
    pub schema_1: NestedModel1,
    pub schema_3: Model3,
}

impl Schema for EvolvedModels {
    fn fields(&self) -> Result<Vec<Field>, SchemaError> {
        Ok(vec![
            Field::composite("schema_1", &self.schema_1)?,
            Field::composite("schema_3", &self.schema_3)?,
        ])
    }
}

// Minimal pair: alpha {x, y} + beta {z}, and alpha evolved to {x, w}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alpha {
    pub x: i64,
    pub y: String,
}

impl Default for Alpha {
    fn default() -> Self {
        Self {
            x: 1,
            y: "v".to_string(),
        }
    }
}

impl Schema for Alpha {
    fn fields(&self) -> Result<Vec<Field>, SchemaError> {
        Ok(vec![Field::leaf("x", &self.x)?, Field::leaf("y", &self.y)?])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beta {
    pub z: f64,
}

impl Default for Beta {
    fn default() -> Self {
        Self { z: 0.01 }
    }
}

impl Schema for Beta {
    fn fields(&self) -> Result<Vec<Field>, SchemaError> {
        Ok(vec![Field::leaf("z", &self.z)?])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub alpha: Alpha,
    pub beta: Beta,
}

impl Schema for Pair {
    fn fields(&self) -> Result<Vec<Field>, SchemaError> {
        Ok(vec![
            Field::composite("alpha", &self.alpha)?,
            Field::composite("beta", &self.beta)?,
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlphaV2 {
    pub x: i64,
    pub w: bool,
}

impl Default for AlphaV2 {
    fn default() -> Self {
        Self { x: 1, w: true }
    }
}

impl Schema for AlphaV2 {
    fn fields(&self) -> Result<Vec<Field>, SchemaError> {
        Ok(vec![Field::leaf("x", &self.x)?, Field::leaf("w", &self.w)?])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairV2 {
    pub alpha: AlphaV2,
    pub beta: Beta,
}

impl Schema for PairV2 {
    fn fields(&self) -> Result<Vec<Field>, SchemaError> {
        Ok(vec![
            Field::composite("alpha", &self.alpha)?,
            Field::composite("beta", &self.beta)?,
        ])
    }
}
