//! Assignment of schema fields to document groups
//!
//! A [`GroupMapping`] lists, per document group, the top-level fields
//! persisted in that group's artifact. A field may be left out entirely
//! (never persisted) but may not appear in two groups.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Document group identifier → assigned top-level field names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupMapping(IndexMap<String, Vec<String>>);

impl GroupMapping {
    /// Create empty mapping
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign fields to a group, appending to any fields already assigned
    pub fn assign<I, S>(&mut self, group: impl Into<String>, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(group.into())
            .or_default()
            .extend(fields.into_iter().map(Into::into));
    }

    /// Fields assigned to a group, in mapping order
    #[must_use]
    pub fn fields_of(&self, group: &str) -> Option<&[String]> {
        self.0.get(group).map(Vec::as_slice)
    }

    /// Groups listing `field`, in mapping order
    #[must_use]
    pub fn groups_of(&self, field: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, fields)| fields.iter().any(|f| f == field))
            .map(|(group, _)| group.as_str())
            .collect()
    }

    /// Group identifiers in mapping order
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of groups
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no group is mapped
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<G, I, S> FromIterator<(G, I)> for GroupMapping
where
    G: Into<String>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (G, I)>>(iter: T) -> Self {
        let mut mapping = Self::new();
        for (group, fields) in iter {
            mapping.assign(group, fields);
        }
        mapping
    }
}

/// Single-group invariant validation
///
/// Ensures a field is persisted by at most one artifact. Checked lazily, once
/// per field resolution, so a conflict surfaces when the conflicting field
/// is resolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupMappingValidator;

impl GroupMappingValidator {
    /// Create new validator instance
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Group that persists `field`
    ///
    /// # Returns
    /// - `Ok(None)` if the field is not mapped
    /// - `Ok(Some(group))` if exactly one group lists it
    ///
    /// # Errors
    /// [`ConfigError::GroupConflict`] if several groups list it
    pub fn group_of<'a>(
        &self,
        field: &str,
        mapping: &'a GroupMapping,
    ) -> Result<Option<&'a str>, ConfigError> {
        match mapping.groups_of(field).as_slice() {
            [] => Ok(None),
            [group] => Ok(Some(*group)),
            groups => Err(ConfigError::GroupConflict {
                field: field.to_string(),
                groups: groups.iter().map(|g| (*g).to_string()).collect(),
            }),
        }
    }
}
