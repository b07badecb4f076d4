//! Reconciliation of on-disk trees against schema defaults
//!
//! # Rules
//!
//! Applied to a group's top level and again inside every composite:
//!
//! 1. A key declared by the defaults and present on disk keeps the on-disk
//!    value. When both sides are trees the merge recurses instead. When the
//!    default is composite and the disk holds `null`, the default tree is used.
//! 2. A key declared by the defaults and absent on disk is filled with its
//!    default (the whole default subtree for composites).
//! 3. A key present on disk and not declared by the defaults is dropped.
//!
//! Values are never type-checked here; an on-disk scalar where a composite is
//! expected survives the merge and is left for schema coercion to reject.
//!
//! The merge is idempotent: reconciling its own output against the same
//! defaults yields the same tree and reports no changes.

use serde_yaml::{Mapping, Value};

use crate::default::{Branch, DefaultTree};
use crate::path::FieldPath;

/// What a reconcile pass did to one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Declared key missing on disk, filled from defaults
    Added,
    /// Undeclared key dropped from the document
    Pruned,
    /// `null` on disk where a composite is declared, replaced by defaults
    Reset,
}

/// One structural edit made by a reconcile pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Node the edit applies to
    pub path: FieldPath,
    /// Kind of edit
    pub kind: ChangeKind,
}

/// Output of [`reconcile`]
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    /// Corrected tree, keys in declaration order
    pub tree: Mapping,
    /// Structural edits relative to the on-disk tree, in visit order
    pub changes: Vec<Change>,
}

impl Reconciled {
    /// Check if the on-disk tree already had the current shape
    #[inline]
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of edits of one kind
    #[must_use]
    pub fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|c| c.kind == kind).count()
    }

    /// Subtree stored under a top-level key
    #[inline]
    #[must_use]
    pub fn extract(&self, key: &str) -> Option<&Value> {
        extract(&self.tree, key)
    }
}

/// Bring `on_disk` in line with the shape of `defaults`
///
/// `defaults` is usually a whole document group: each assigned field's
/// default tree keyed by field name.
#[must_use]
pub fn reconcile(on_disk: &Mapping, defaults: &Branch) -> Reconciled {
    let mut changes = Vec::new();
    let tree = merge_branch(on_disk, defaults, &FieldPath::root(), &mut changes);
    Reconciled { tree, changes }
}

/// Subtree stored under a top-level key
#[inline]
#[must_use]
pub fn extract<'a>(tree: &'a Mapping, key: &str) -> Option<&'a Value> {
    tree.get(key)
}

fn merge_branch(
    on_disk: &Mapping,
    defaults: &Branch,
    at: &FieldPath,
    changes: &mut Vec<Change>,
) -> Mapping {
    let mut merged = Mapping::with_capacity(defaults.len());

    for (name, default) in defaults.iter() {
        let path = at.child(name);
        let value = match (on_disk.get(name), default) {
            (Some(Value::Mapping(disk)), DefaultTree::Composite(branch)) => {
                Value::Mapping(merge_branch(disk, branch, &path, changes))
            }
            (Some(Value::Null), DefaultTree::Composite(_)) => {
                changes.push(Change {
                    path,
                    kind: ChangeKind::Reset,
                });
                default.to_value()
            }
            (Some(disk), _) => disk.clone(),
            (None, _) => {
                changes.push(Change {
                    path,
                    kind: ChangeKind::Added,
                });
                default.to_value()
            }
        };
        merged.insert(Value::String(name.to_string()), value);
    }

    for key in on_disk.keys() {
        let declared = key.as_str().is_some_and(|k| defaults.contains(k));
        if !declared {
            changes.push(Change {
                path: at.child(key_label(key)),
                kind: ChangeKind::Pruned,
            });
        }
    }

    merged
}

fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => "<complex key>".to_string(),
    }
}
