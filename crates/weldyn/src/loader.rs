//! Field resolution and schema loading
//!
//! [`Loader`] instantiates a schema from its artifacts. Fields are resolved
//! one at a time in declaration order:
//!
//! ```text
//! field ──► Unmapped ──────────────────────────────► default value
//!   │
//!   └─► Mapped ──► group conflict? ──► ConflictError
//!                      │
//!                      └─► artifact exists? ─┬─ no ──► Generate ──┐
//!                                            └─ yes ─► Reconcile ─┴─► field subtree
//! ```
//!
//! Every generate or reconcile step rewrites the whole group, so a later
//! field of the same group reads the document already brought up to date by
//! an earlier one. The read-merge-write cycle runs under the artifact's lock.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use weldyn_schema::{assemble, default_tree, Schema};
use weldyn_store::ArtifactLock;
use weldyn_tree::{reconcile, Branch, ChangeKind, DefaultTree, FieldPath, Mapping, Value};

use crate::error::Result;
use crate::spec::{ConfigSpec, ResolvedSpec};

/// How one field obtained its raw value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldResolution {
    /// Field is not persisted; its default was used
    Unmapped,

    /// Group artifact did not exist and was created from defaults
    Generated { group: String, path: PathBuf },

    /// Group artifact existed and was reconciled against the defaults
    Reconciled {
        group: String,
        path: PathBuf,
        added: usize,
        pruned: usize,
        reset: usize,
    },
}

impl FieldResolution {
    /// Artifact touched by the resolution, if any
    #[must_use]
    pub fn artifact(&self) -> Option<&Path> {
        match self {
            Self::Unmapped => None,
            Self::Generated { path, .. } | Self::Reconciled { path, .. } => Some(path),
        }
    }
}

/// Raw value of one field, before coercion
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    /// Field name
    pub name: String,
    /// Subtree handed to coercion
    pub raw: Value,
    /// What happened on disk
    pub resolution: FieldResolution,
}

/// Loads schema `T` through a resolved config spec
///
/// # Example
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use weldyn::{ConfigSpec, Field, Loader, Schema, SchemaError};
///
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// struct Server {
///     port: u16,
/// }
///
/// impl Schema for Server {
///     fn fields(&self) -> Result<Vec<Field>, SchemaError> {
///         Ok(vec![Field::leaf("port", &self.port)?])
///     }
/// }
///
/// let server: Server = Loader::with_spec(&ConfigSpec::new()).unwrap().load().unwrap();
/// assert_eq!(server.port, 0);
/// ```
#[derive(Debug, Clone)]
pub struct Loader<T> {
    spec: ResolvedSpec,
    _schema: PhantomData<fn() -> T>,
}

impl<T: Schema> Loader<T> {
    /// Create loader from a config spec
    ///
    /// The spec is checked and normalized here, once.
    ///
    /// # Errors
    /// Returns [`ConfigError`](crate::ConfigError) if the spec is unusable
    pub fn with_spec(spec: &ConfigSpec) -> Result<Self> {
        let resolved = spec.resolve()?;
        tracing::debug!(
            declared_base_dir = ?spec.base_dir(),
            base_dir = ?resolved.base_dir(),
            groups = spec.groups().len(),
            format = ?resolved.store().format(),
            "config spec resolved"
        );
        Ok(Self {
            spec: resolved,
            _schema: PhantomData,
        })
    }

    /// Resolved spec in use
    #[inline]
    #[must_use]
    pub fn spec(&self) -> &ResolvedSpec {
        &self.spec
    }

    /// Instantiate `T`
    ///
    /// Each field is resolved, then coerced into its declared type right
    /// away, so the artifact of a field's group is already rewritten when
    /// its coercion fails.
    ///
    /// # Errors
    /// - [`ConfigError::GroupConflict`](crate::ConfigError::GroupConflict) if
    ///   a field is mapped to several groups
    /// - [`StoreError`](crate::StoreError) if an artifact cannot be read,
    ///   written, or locked
    /// - [`SchemaError`](crate::SchemaError) if a value fails coercion or
    ///   validation
    pub fn load(&self) -> Result<T> {
        let instance = T::default();
        let declared = declared_fields(&instance)?;
        let root = FieldPath::root();

        let mut values = Mapping::new();
        for field in instance.fields()? {
            let resolved = self.resolve(field.name(), field.default(), &declared)?;
            let value = field.coerce(&root.child(field.name()), resolved.raw)?;
            values.insert(Value::String(resolved.name), value);
        }

        Ok(assemble(&root, values)?)
    }

    /// Resolve every field to its raw value without coercing
    ///
    /// Performs the same artifact generation and rewrites as [`load`](Self::load).
    ///
    /// # Errors
    /// Same as [`load`](Self::load), minus coercion failures
    pub fn resolve_all(&self) -> Result<Vec<ResolvedField>> {
        let declared = declared_fields(&T::default())?;
        declared
            .iter()
            .map(|(name, default)| self.resolve(name, default, &declared))
            .collect()
    }

    fn resolve(&self, name: &str, default: &DefaultTree, declared: &Branch) -> Result<ResolvedField> {
        let group = match self.spec.group_of(name)? {
            Some(group) => group,
            None => {
                tracing::debug!(field = name, "field is not mapped, using default");
                return Ok(unmapped(name, default));
            }
        };
        let Some(path) = self.spec.artifact_path(group) else {
            return Ok(unmapped(name, default));
        };

        let defaults = self.group_defaults(group, declared);
        let store = self.spec.store();
        let _lock = ArtifactLock::acquire(&path)?;

        if !store.exists(&path)? {
            store.write(&path, &defaults.to_mapping())?;
            tracing::info!(
                field = name,
                group,
                path = %path.display(),
                fields = defaults.len(),
                "generated artifact from defaults"
            );
            return Ok(ResolvedField {
                name: name.to_string(),
                raw: default.to_value(),
                resolution: FieldResolution::Generated {
                    group: group.to_string(),
                    path,
                },
            });
        }

        let on_disk = store.read(&path)?;
        let result = reconcile(&on_disk, &defaults);
        for change in &result.changes {
            tracing::debug!(group, node = %change.path, kind = ?change.kind, "reconciled node");
        }
        store.write(&path, &result.tree)?;

        let (added, pruned, reset) = (
            result.count(ChangeKind::Added),
            result.count(ChangeKind::Pruned),
            result.count(ChangeKind::Reset),
        );
        tracing::info!(
            field = name,
            group,
            path = %path.display(),
            added,
            pruned,
            reset,
            "reconciled artifact"
        );

        let raw = result
            .extract(name)
            .cloned()
            .unwrap_or_else(|| default.to_value());

        Ok(ResolvedField {
            name: name.to_string(),
            raw,
            resolution: FieldResolution::Reconciled {
                group: group.to_string(),
                path,
                added,
                pruned,
                reset,
            },
        })
    }

    /// Default trees of a group's fields, in mapping order
    fn group_defaults(&self, group: &str, declared: &Branch) -> Branch {
        let names = self.spec.groups().fields_of(group).unwrap_or_default();

        let mut defaults = Branch::new();
        for name in names {
            match declared.get(name) {
                Some(tree) => {
                    defaults.insert(name.as_str(), tree.clone());
                }
                None => {
                    tracing::warn!(group, field = %name, "group lists a field the schema does not declare, skipping");
                }
            }
        }
        defaults
    }
}

/// Top-level default trees of a schema, keyed by field name
fn declared_fields<T: Schema>(instance: &T) -> Result<Branch> {
    Ok(default_tree(instance)?.as_branch().cloned().unwrap_or_default())
}

fn unmapped(name: &str, default: &DefaultTree) -> ResolvedField {
    ResolvedField {
        name: name.to_string(),
        raw: default.to_value(),
        resolution: FieldResolution::Unmapped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;
    use weldyn_schema::{Field, SchemaError};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Limits {
        max: u32,
    }

    impl Default for Limits {
        fn default() -> Self {
            Self { max: 8 }
        }
    }

    impl Schema for Limits {
        fn fields(&self) -> std::result::Result<Vec<Field>, SchemaError> {
            Ok(vec![Field::leaf("max", &self.max)?])
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct App {
        name: String,
        limits: Limits,
    }

    impl Schema for App {
        fn fields(&self) -> std::result::Result<Vec<Field>, SchemaError> {
            Ok(vec![
                Field::leaf("name", &self.name)?,
                Field::composite("limits", &self.limits)?,
            ])
        }
    }

    fn spec(dir: &Path) -> ConfigSpec {
        ConfigSpec::new().with_base_dir(dir).with_group("app", ["limits"])
    }

    #[test]
    fn with_spec_keeps_declared_format_and_groups() {
        let temp = TempDir::new().unwrap();
        let declared = spec(temp.path()).with_format(weldyn_store::DocumentFormat::Json);

        let loader = Loader::<App>::with_spec(&declared).unwrap();

        assert_eq!(loader.spec().store().format(), declared.format());
        assert_eq!(loader.spec().groups(), declared.groups());
        assert_eq!(loader.spec().base_dir(), declared.base_dir());
    }

    #[test]
    fn declared_fields_follow_schema_order() {
        let declared = declared_fields(&App::default()).unwrap();

        let names: Vec<_> = declared.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["name", "limits"]);
        assert!(declared.get("limits").unwrap().as_branch().is_some());
    }

    #[test]
    fn unmapped_fields_never_touch_disk() {
        let temp = TempDir::new().unwrap();
        let loader = Loader::<App>::with_spec(&ConfigSpec::new().with_base_dir(temp.path())).unwrap();

        let fields = loader.resolve_all().unwrap();

        assert!(fields.iter().all(|f| f.resolution == FieldResolution::Unmapped));
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn first_field_generates_then_reconciles() {
        let temp = TempDir::new().unwrap();
        let loader = Loader::<App>::with_spec(&spec(temp.path())).unwrap();

        let first = loader.resolve_all().unwrap();
        assert!(matches!(first[1].resolution, FieldResolution::Generated { .. }));
        assert_eq!(first[0].resolution, FieldResolution::Unmapped);

        let second = loader.resolve_all().unwrap();
        match &second[1].resolution {
            FieldResolution::Reconciled { added, pruned, reset, .. } => {
                assert_eq!((*added, *pruned, *reset), (0, 0, 0));
            }
            other => panic!("expected reconcile, got {other:?}"),
        }
    }

    #[test]
    fn raw_value_comes_from_disk() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("app.yaml"), "limits:\n  max: 3\n  stale: true\n").unwrap();
        let loader = Loader::<App>::with_spec(&spec(temp.path())).unwrap();

        let fields = loader.resolve_all().unwrap();
        let limits = &fields[1];

        assert_eq!(limits.raw, serde_yaml::from_str::<Value>("max: 3\n").unwrap());
        assert!(matches!(
            limits.resolution,
            FieldResolution::Reconciled { pruned: 1, .. }
        ));
        assert_eq!(loader.load().unwrap().limits, Limits { max: 3 });
    }

    #[test]
    fn unknown_mapped_name_is_skipped() {
        let temp = TempDir::new().unwrap();
        let spec = spec(temp.path()).with_group("app", ["retired"]);
        let loader = Loader::<App>::with_spec(&spec).unwrap();

        let app = loader.load().unwrap();
        assert_eq!(app, App::default());

        let text = std::fs::read_to_string(temp.path().join("app.yaml")).unwrap();
        assert!(!text.contains("retired"));
    }

    #[test]
    fn resolution_reports_artifact() {
        assert_eq!(FieldResolution::Unmapped.artifact(), None);

        let generated = FieldResolution::Generated {
            group: "app".to_string(),
            path: PathBuf::from("/etc/app.yaml"),
        };
        assert_eq!(generated.artifact(), Some(Path::new("/etc/app.yaml")));
    }
}
