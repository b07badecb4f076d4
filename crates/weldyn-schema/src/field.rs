//! Field declarations and default tree building

use serde::de::DeserializeOwned;
use serde::Serialize;
use weldyn_tree::{Branch, DefaultTree, FieldPath, Value};

use crate::error::SchemaError;
use crate::schema::{coerce, Schema};

/// Coerces a raw value for one field into its declared type, re-rendered as a value
pub type CoerceFn = fn(&FieldPath, Value) -> Result<Value, SchemaError>;

/// One declared field of a schema
///
/// Carries the field's default tree and the function that coerces raw
/// document data into the field's type.
#[derive(Clone)]
pub struct Field {
    name: String,
    default: DefaultTree,
    coerce: CoerceFn,
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

impl Field {
    /// Declare a plain-valued field
    ///
    /// # Errors
    /// Returns [`SchemaError::Serialize`] if `default` cannot be rendered
    pub fn leaf<T>(name: impl Into<String>, default: &T) -> Result<Self, SchemaError>
    where
        T: Serialize + DeserializeOwned,
    {
        let name = name.into();
        let value = serde_yaml::to_value(default)
            .map_err(|e| SchemaError::serialize(&FieldPath::single(name.as_str()), e))?;

        Ok(Self {
            name,
            default: DefaultTree::Leaf(value),
            coerce: coerce_leaf::<T>,
        })
    }

    /// Declare a field whose value is a nested schema
    ///
    /// # Errors
    /// Returns error if any nested default cannot be rendered
    pub fn composite<S: Schema>(name: impl Into<String>, default: &S) -> Result<Self, SchemaError> {
        let name = name.into();
        let default = default_tree(default)
            .map_err(|e| prefix_error(&FieldPath::single(name.as_str()), e))?;

        Ok(Self {
            name,
            default,
            coerce: coerce_composite::<S>,
        })
    }

    /// Field name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default tree of this field
    #[inline]
    #[must_use]
    pub fn default(&self) -> &DefaultTree {
        &self.default
    }

    /// Check if this field is a nested schema
    #[inline]
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.default.is_composite()
    }

    /// Coerce raw data for this field into its declared type
    ///
    /// # Errors
    /// Returns error if the data does not fit the type or fails validation
    pub fn coerce(&self, path: &FieldPath, raw: Value) -> Result<Value, SchemaError> {
        (self.coerce)(path, raw)
    }

    /// Split into name and default tree
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (String, DefaultTree) {
        (self.name, self.default)
    }
}

/// Default tree of a schema instance
///
/// Recurses into every composite field, so the result is the full current
/// shape of the schema regardless of any document on disk.
///
/// # Errors
/// - [`SchemaError::DuplicateField`] if two fields share a name
/// - [`SchemaError::Serialize`] if a default cannot be rendered
pub fn default_tree<S: Schema>(value: &S) -> Result<DefaultTree, SchemaError> {
    let mut branch = Branch::new();
    for field in value.fields()? {
        let (name, tree) = field.into_parts();
        if branch.contains(&name) {
            return Err(SchemaError::DuplicateField {
                path: FieldPath::single(name),
            });
        }
        branch.insert(name, tree);
    }
    Ok(DefaultTree::Composite(branch))
}

fn coerce_leaf<T>(path: &FieldPath, raw: Value) -> Result<Value, SchemaError>
where
    T: Serialize + DeserializeOwned,
{
    let typed: T = serde_yaml::from_value(raw).map_err(|e| SchemaError::coercion(path, e))?;
    serde_yaml::to_value(&typed).map_err(|e| SchemaError::serialize(path, e))
}

fn coerce_composite<S: Schema>(path: &FieldPath, raw: Value) -> Result<Value, SchemaError> {
    let typed: S = coerce(path, raw)?;
    serde_yaml::to_value(&typed).map_err(|e| SchemaError::serialize(path, e))
}

/// Re-anchor an error raised inside a nested schema under `parent`
fn prefix_error(parent: &FieldPath, err: SchemaError) -> SchemaError {
    let anchor = |path: FieldPath| {
        path.segments()
            .iter()
            .fold(parent.clone(), |acc, segment| acc.child(segment.as_str()))
    };
    match err {
        SchemaError::Serialize { path, message } => SchemaError::Serialize {
            path: anchor(path),
            message,
        },
        SchemaError::DuplicateField { path } => SchemaError::DuplicateField { path: anchor(path) },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Leafy {
        flag: bool,
        tags: Vec<String>,
    }

    impl Default for Leafy {
        fn default() -> Self {
            Self {
                flag: true,
                tags: vec!["a".to_string()],
            }
        }
    }

    impl Schema for Leafy {
        fn fields(&self) -> Result<Vec<Field>, SchemaError> {
            Ok(vec![
                Field::leaf("flag", &self.flag)?,
                Field::leaf("tags", &self.tags)?,
            ])
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Holder {
        leafy: Leafy,
    }

    impl Schema for Holder {
        fn fields(&self) -> Result<Vec<Field>, SchemaError> {
            Ok(vec![Field::composite("leafy", &self.leafy)?])
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Twice {
        a: u8,
    }

    impl Schema for Twice {
        fn fields(&self) -> Result<Vec<Field>, SchemaError> {
            Ok(vec![Field::leaf("a", &self.a)?, Field::leaf("a", &self.a)?])
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct HoldsTwice {
        inner: Twice,
    }

    impl Schema for HoldsTwice {
        fn fields(&self) -> Result<Vec<Field>, SchemaError> {
            Ok(vec![Field::composite("inner", &self.inner)?])
        }
    }

    #[test]
    fn leaf_field_is_tagged_leaf() {
        let field = Field::leaf("port", &8080_u16).unwrap();
        assert_eq!(field.name(), "port");
        assert!(!field.is_composite());
        assert_eq!(field.default(), &DefaultTree::Leaf(Value::from(8080)));
    }

    #[test]
    fn composite_field_recurses_into_nested_schema() {
        let field = Field::composite("holder", &Holder::default()).unwrap();
        assert!(field.is_composite());

        let expected: Value = serde_yaml::from_str("leafy:\n  flag: true\n  tags: [a]\n").unwrap();
        assert_eq!(field.default().to_value(), expected);
    }

    #[test]
    fn sequences_stay_leaves() {
        let tree = default_tree(&Leafy::default()).unwrap();
        let tags = tree.as_branch().unwrap().get("tags").unwrap();
        assert!(!tags.is_composite());
    }

    #[test]
    fn duplicate_field_names_are_rejected_with_full_path() {
        let err = Field::composite("outer", &HoldsTwice::default()).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
        assert_eq!(err.path().to_string(), "outer.inner.a");
    }

    #[test]
    fn leaf_coercion_checks_type() {
        let field = Field::leaf("port", &8080_u16).unwrap();
        let path = FieldPath::single("port");

        assert_eq!(field.coerce(&path, Value::from(9090)).unwrap(), Value::from(9090));
        assert!(field.coerce(&path, Value::from(-1)).is_err());
    }
}
