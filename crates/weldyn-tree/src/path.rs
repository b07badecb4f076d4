//! Field paths for addressing nodes within document trees
//!
//! Provides [`FieldPath`] for naming the node a change or an error refers to.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Path from a document root down to one node
///
/// Segments are mapping keys, outermost first.
///
/// # Examples
/// - `["schema_1", "attribute_1a"]` → `schema_1.attribute_1a`
/// - `["database", "pool", "size"]` → `database.pool.size`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Create path from a single segment
    #[inline]
    #[must_use]
    pub fn single(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    /// Empty path (document root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get last segment (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Append a segment, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(segment.into());
        new
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let segments: Vec<String> = s
            .split('.')
            .map(|seg| {
                if seg.is_empty() {
                    Err(PathError::EmptySegment)
                } else {
                    Ok(seg.to_string())
                }
            })
            .collect::<Result<_, _>>()?;

        Ok(Self(segments))
    }
}

/// Errors related to field paths
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_single_and_child() {
        let path = FieldPath::single("schema_1").child("attribute_1a");
        assert_eq!(path.segments(), &["schema_1", "attribute_1a"]);
        assert_eq!(path.len(), 2);
        assert_eq!(path.last(), Some("attribute_1a"));
    }

    #[test]
    fn path_root() {
        let path = FieldPath::root();
        assert!(path.is_empty());
        assert_eq!(path.last(), None);
        assert_eq!(path.to_string(), "<root>");
    }

    #[test]
    fn path_display() {
        let path = FieldPath::single("a").child("b");
        assert_eq!(path.to_string(), "a.b");
    }

    #[test]
    fn path_from_str_keeps_non_identifier_keys() {
        let path: FieldPath = "server.listen-addr".parse().unwrap();
        assert_eq!(path.segments(), &["server", "listen-addr"]);
    }

    #[test]
    fn path_from_str_empty() {
        let path: FieldPath = "".parse().unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn path_from_str_empty_segment() {
        let result: Result<FieldPath, _> = "a..b".parse();
        assert!(matches!(result, Err(PathError::EmptySegment)));
    }
}
