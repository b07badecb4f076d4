//! Schema-derived default trees
//!
//! A [`DefaultTree`] is the full current shape of a schema with every node set
//! to its declared default. It is tagged at construction time: leaves carry a
//! plain value, composites carry the ordered children of a nested schema. The
//! reconciler branches on this tag and never inspects values to guess whether
//! something is a nested schema.

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

/// Default value of one schema field
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultTree {
    /// Scalar, list, or any value that is not a nested schema
    Leaf(Value),
    /// Nested schema; children in declaration order
    Composite(Branch),
}

impl DefaultTree {
    /// Check if this node is a nested schema
    #[inline]
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }

    /// Children of a composite node
    #[inline]
    #[must_use]
    pub fn as_branch(&self) -> Option<&Branch> {
        match self {
            Self::Composite(branch) => Some(branch),
            Self::Leaf(_) => None,
        }
    }

    /// Plain document value, recursing into composites
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Leaf(value) => value.clone(),
            Self::Composite(branch) => Value::Mapping(branch.to_mapping()),
        }
    }
}

impl From<Branch> for DefaultTree {
    fn from(branch: Branch) -> Self {
        Self::Composite(branch)
    }
}

/// Ordered named children of a composite default
///
/// Also used for a whole document group: the group's fields keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Branch(IndexMap<String, DefaultTree>);

impl Branch {
    /// Create empty branch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insert a child, returning the one it replaced
    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, tree: DefaultTree) -> Option<DefaultTree> {
        self.0.insert(name.into(), tree)
    }

    /// Get child by name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DefaultTree> {
        self.0.get(name)
    }

    /// Check if a child is declared
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of children
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if branch has no children
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate children in declaration order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DefaultTree)> {
        self.0.iter().map(|(name, tree)| (name.as_str(), tree))
    }

    /// Plain mapping with every child rendered to its default value
    #[must_use]
    pub fn to_mapping(&self) -> Mapping {
        self.0
            .iter()
            .map(|(name, tree)| (Value::String(name.clone()), tree.to_value()))
            .collect()
    }
}

impl FromIterator<(String, DefaultTree)> for Branch {
    fn from_iter<I: IntoIterator<Item = (String, DefaultTree)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(yaml: &str) -> DefaultTree {
        DefaultTree::Leaf(serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn composite_renders_nested_mapping() {
        let inner: Branch = [("z".to_string(), leaf("0.01"))].into_iter().collect();
        let outer: Branch = [
            ("x".to_string(), leaf("1")),
            ("inner".to_string(), DefaultTree::from(inner)),
        ]
        .into_iter()
        .collect();

        let expected: Value = serde_yaml::from_str("x: 1\ninner:\n  z: 0.01\n").unwrap();
        assert_eq!(DefaultTree::from(outer).to_value(), expected);
    }

    #[test]
    fn branch_keeps_declaration_order() {
        let branch: Branch = ["b", "a", "c"]
            .into_iter()
            .map(|name| (name.to_string(), leaf("true")))
            .collect();
        let names: Vec<_> = branch.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn leaf_is_not_composite() {
        let tree = leaf("[1, 2]");
        assert!(!tree.is_composite());
        assert!(tree.as_branch().is_none());
    }
}
