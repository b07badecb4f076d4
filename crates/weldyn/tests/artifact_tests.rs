use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use weldyn::{
    ArtifactLock, ConfigSpec, Configurable, DocumentFormat, Field, Loader, Schema, SchemaError,
    StoreError, Value, WeldynError,
};
use weldyn_test_utils::{init_tracing, read_tree, scratch_dir, yaml, Alpha, Beta, Pair};

fn pair_spec(dir: &Path) -> ConfigSpec {
    ConfigSpec::new()
        .with_base_dir(dir)
        .with_group("cfg", ["alpha", "beta"])
}

#[test]
fn test_coercion_error_after_rewrite() {
    init_tracing();
    let temp = scratch_dir();
    let artifact = temp.path().join("cfg.yaml");
    fs::write(&artifact, "alpha:\n  x: many\n  y: v\n  old: 1\n").unwrap();

    let err = Loader::<Pair>::with_spec(&pair_spec(temp.path()))
        .unwrap()
        .load()
        .unwrap_err();

    match err {
        WeldynError::Schema(SchemaError::Coercion { path, .. }) => {
            assert_eq!(path.to_string(), "alpha.x");
        }
        other => panic!("expected coercion error, got {other:?}"),
    }
    assert_eq!(
        Value::Mapping(read_tree(&artifact)),
        yaml("alpha: {x: many, y: v}\nbeta: {z: 0.01}\n")
    );
}

#[test]
fn test_scalar_where_composite_expected_is_kept() {
    let temp = scratch_dir();
    let artifact = temp.path().join("cfg.yaml");
    fs::write(&artifact, "alpha: 5\nbeta: {z: 0.5}\n").unwrap();

    let err = Loader::<Pair>::with_spec(&pair_spec(temp.path()))
        .unwrap()
        .load()
        .unwrap_err();

    assert!(matches!(
        err,
        WeldynError::Schema(SchemaError::ExpectedMapping { .. })
    ));
    assert_eq!(read_tree(&artifact)["alpha"], Value::from(5));
}

#[test]
fn test_emptied_section_is_reset_to_defaults() {
    let temp = scratch_dir();
    let artifact = temp.path().join("cfg.yaml");
    fs::write(&artifact, "alpha:\nbeta:\n  z: 0.5\n").unwrap();

    let pair: Pair = Loader::with_spec(&pair_spec(temp.path())).unwrap().load().unwrap();

    assert_eq!(pair.alpha, Alpha::default());
    assert_eq!(pair.beta, Beta { z: 0.5 });
    assert_eq!(
        Value::Mapping(read_tree(&artifact)),
        yaml("alpha: {x: 1, y: v}\nbeta: {z: 0.5}\n")
    );
}

#[test]
fn test_empty_artifact_is_filled() {
    let temp = scratch_dir();
    let artifact = temp.path().join("cfg.yaml");
    fs::write(&artifact, "").unwrap();

    let pair: Pair = Loader::with_spec(&pair_spec(temp.path())).unwrap().load().unwrap();

    assert_eq!(pair, Pair::default());
    assert_eq!(
        Value::Mapping(read_tree(&artifact)),
        yaml("alpha: {x: 1, y: v}\nbeta: {z: 0.01}\n")
    );
}

#[test]
fn test_malformed_artifact_is_reported() {
    let temp = scratch_dir();
    let artifact = temp.path().join("cfg.yaml");
    fs::write(&artifact, "alpha: [1, 2\n").unwrap();

    let err = Loader::<Pair>::with_spec(&pair_spec(temp.path()))
        .unwrap()
        .load()
        .unwrap_err();

    assert!(matches!(err, WeldynError::Store(StoreError::Decode { .. })));
    assert_eq!(fs::read_to_string(&artifact).unwrap(), "alpha: [1, 2\n");
}

#[test]
fn test_json_artifacts() {
    let temp = scratch_dir();
    let spec = pair_spec(temp.path()).with_format(DocumentFormat::Json);
    let artifact = temp.path().join("cfg.json");

    let _: Pair = Loader::with_spec(&spec).unwrap().load().unwrap();
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&artifact).unwrap()).unwrap();
    assert_eq!(written["alpha"]["y"], "v");

    fs::write(&artifact, r#"{"alpha": {"x": 7, "y": "v", "gone": 1}}"#).unwrap();
    let pair: Pair = Loader::with_spec(&spec).unwrap().load().unwrap();

    assert_eq!(pair.alpha.x, 7);
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&artifact).unwrap()).unwrap();
    assert_eq!(
        written,
        serde_json::json!({"alpha": {"x": 7, "y": "v"}, "beta": {"z": 0.01}})
    );
}

#[cfg(unix)]
#[test]
fn test_reconcile_keeps_artifact_mode() {
    use std::os::unix::fs::PermissionsExt;

    let temp = scratch_dir();
    let artifact = temp.path().join("cfg.yaml");
    fs::write(&artifact, "alpha:\n  x: 4\n").unwrap();
    fs::set_permissions(&artifact, fs::Permissions::from_mode(0o644)).unwrap();

    let pair: Pair = Loader::with_spec(&pair_spec(temp.path())).unwrap().load().unwrap();

    assert_eq!(pair.alpha.x, 4);
    let mode = fs::metadata(&artifact).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}

#[cfg(unix)]
#[test]
fn test_reconcile_writes_through_symlinked_artifact() {
    let temp = scratch_dir();
    let shared = temp.path().join("shared");
    fs::create_dir(&shared).unwrap();
    let real = shared.join("cfg.yaml");
    fs::write(&real, "alpha:\n  x: 4\n  old: 1\n").unwrap();
    let artifact = temp.path().join("cfg.yaml");
    std::os::unix::fs::symlink(&real, &artifact).unwrap();

    let _: Pair = Loader::with_spec(&pair_spec(temp.path())).unwrap().load().unwrap();

    assert!(fs::symlink_metadata(&artifact).unwrap().file_type().is_symlink());
    assert_eq!(
        Value::Mapping(read_tree(&real)),
        yaml("alpha: {x: 4, y: v}\nbeta: {z: 0.01}\n")
    );
}

#[test]
fn test_load_waits_for_artifact_lock() {
    let temp = scratch_dir();
    let artifact = temp.path().join("cfg.yaml");
    let spec = pair_spec(temp.path());

    let guard = ArtifactLock::acquire(&artifact).unwrap();
    let worker = thread::spawn(move || Loader::<Pair>::with_spec(&spec).unwrap().load());

    thread::sleep(Duration::from_millis(100));
    assert!(!artifact.exists());

    drop(guard);
    let pair = worker.join().unwrap().unwrap();

    assert_eq!(pair, Pair::default());
    assert!(artifact.is_file());
}

#[test]
fn test_concurrent_loads_agree() {
    init_tracing();
    let temp = scratch_dir();
    fs::write(temp.path().join("cfg.yaml"), "alpha:\n  x: 9\n  stale: true\n").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let spec = pair_spec(temp.path());
            thread::spawn(move || Loader::<Pair>::with_spec(&spec).unwrap().load())
        })
        .collect();

    for handle in handles {
        let pair = handle.join().unwrap().unwrap();
        assert_eq!(pair.alpha.x, 9);
    }
    assert_eq!(
        Value::Mapping(read_tree(&temp.path().join("cfg.yaml"))),
        yaml("alpha: {x: 9, y: v}\nbeta: {z: 0.01}\n")
    );
}

thread_local! {
    // Dropped with the test thread, taking the directory with it
    static SETTINGS_DIR: TempDir = scratch_dir();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Settings {
    retries: u32,
    label: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            retries: 3,
            label: "main".to_string(),
        }
    }
}

impl Schema for Settings {
    fn fields(&self) -> Result<Vec<Field>, SchemaError> {
        Ok(vec![
            Field::leaf("retries", &self.retries)?,
            Field::leaf("label", &self.label)?,
        ])
    }
}

impl Configurable for Settings {
    fn config_spec() -> ConfigSpec {
        SETTINGS_DIR.with(|dir| {
            ConfigSpec::new()
                .with_base_dir(dir.path())
                .with_group("settings", ["retries"])
        })
    }
}

#[test]
fn test_configurable_load_uses_declared_spec() {
    let settings = Settings::load().unwrap();
    assert_eq!(settings, Settings::default());

    let artifact = SETTINGS_DIR.with(|dir| dir.path().join("settings.yaml"));
    assert_eq!(Value::Mapping(read_tree(&artifact)), yaml("retries: 3\n"));
}
