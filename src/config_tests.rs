use super::{load_config_bag, resolve, ConfigBag, RecorderConfig};
use crate::error::{ErrorKind, RecorderError};
use serde_json::json;

fn bag(value: serde_json::Value) -> ConfigBag {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn resolves_all_required_keys() {
    let config = resolve(
        &bag(json!({
            "filename": "updates.txt",
            "directory": "log",
            "package": "stomp_test_support",
        })),
        "UpdateLogger",
    )
    .expect("resolve config");

    assert_eq!(
        config,
        RecorderConfig {
            filename: "updates.txt".to_string(),
            directory: "log".to_string(),
            package: "stomp_test_support".to_string(),
            precision: None,
        }
    );
}

#[test]
fn missing_directory_is_a_config_error_naming_owner_and_key() {
    let err = resolve(
        &bag(json!({ "filename": "updates.txt", "package": "pkg" })),
        "UpdateLogger",
    )
    .expect_err("missing directory should fail");

    assert_eq!(err.kind(), ErrorKind::Config);
    match err {
        RecorderError::MissingKey { owner, key } => {
            assert_eq!(owner, "UpdateLogger");
            assert_eq!(key, "directory");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn mistyped_value_is_rejected() {
    let err = resolve(
        &bag(json!({ "filename": 42, "directory": "log", "package": "pkg" })),
        "UpdateLogger",
    )
    .expect_err("numeric filename should fail");
    assert!(matches!(err, RecorderError::InvalidKey { ref key, .. } if key == "filename"));
}

#[test]
fn blank_value_is_rejected() {
    let err = resolve(
        &bag(json!({ "filename": "updates.txt", "directory": "log", "package": "  " })),
        "UpdateLogger",
    )
    .expect_err("blank package should fail");
    assert!(matches!(err, RecorderError::EmptyKey { ref key, .. } if key == "package"));
}

#[test]
fn precision_is_optional_but_typed() {
    let with_precision = resolve(
        &bag(json!({
            "filename": "u.txt",
            "directory": "log",
            "package": "pkg",
            "precision": 4,
        })),
        "UpdateLogger",
    )
    .expect("resolve with precision");
    assert_eq!(with_precision.precision, Some(4));

    let null_precision = resolve(
        &bag(json!({
            "filename": "u.txt",
            "directory": "log",
            "package": "pkg",
            "precision": null,
        })),
        "UpdateLogger",
    )
    .expect("resolve with null precision");
    assert_eq!(null_precision.precision, None);

    let err = resolve(
        &bag(json!({
            "filename": "u.txt",
            "directory": "log",
            "package": "pkg",
            "precision": -1,
        })),
        "UpdateLogger",
    )
    .expect_err("negative precision should fail");
    assert!(matches!(err, RecorderError::InvalidKey { ref key, .. } if key == "precision"));
}

#[test]
fn load_config_bag_requires_json_object() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let object_path = dir.path().join("config.json");
    std::fs::write(
        &object_path,
        r#"{"filename":"u.txt","directory":"log","package":"pkg"}"#,
    )
    .expect("write config");
    let loaded = load_config_bag(&object_path).expect("load object config");
    assert_eq!(loaded.len(), 3);

    let array_path = dir.path().join("array.json");
    std::fs::write(&array_path, "[1, 2]").expect("write array config");
    let err = load_config_bag(&array_path).expect_err("array config should fail");
    assert!(err.to_string().contains("must be a JSON object"));
}

#[test]
fn output_paths_must_stay_under_package_root() {
    for (directory, filename, bad_key) in [
        ("/tmp/escaped", "updates.txt", "directory"),
        ("../sibling", "updates.txt", "directory"),
        ("log/../../up", "updates.txt", "directory"),
        ("log", "/tmp/updates.txt", "filename"),
        ("log", "../updates.txt", "filename"),
    ] {
        let err = resolve(
            &bag(json!({ "filename": filename, "directory": directory, "package": "pkg" })),
            "UpdateLogger",
        )
        .expect_err("escaping path should fail");
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(
            matches!(err, RecorderError::UnsafePath { ref key, .. } if key == bad_key),
            "{directory}/{filename}: {err}"
        );
    }
}

#[test]
fn nested_relative_directory_is_accepted() {
    let config = resolve(
        &bag(json!({ "filename": "updates.txt", "directory": "./log/run", "package": "pkg" })),
        "UpdateLogger",
    )
    .expect("nested relative directory");
    assert_eq!(config.directory, "./log/run");
}
