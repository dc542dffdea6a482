//! Recorder configuration helpers.
//!
//! The host hands the recorder an untyped bag of parameters. This module pulls
//! the typed settings out of it by name and fails per key, so a misconfigured
//! recorder can be disabled without disturbing the optimizer.
use crate::error::{RecorderError, Result};
use anyhow::Context;
use serde_json::Value;
use std::fs;
use std::path::{Component, Path};

/// String-keyed bag of dynamically typed parameter values.
pub type ConfigBag = serde_json::Map<String, Value>;

/// Bag key holding the output file name.
pub const FILENAME_KEY: &str = "filename";
/// Bag key holding the output directory, relative to the package root.
pub const DIRECTORY_KEY: &str = "directory";
/// Bag key naming the package whose root anchors the output directory.
pub const PACKAGE_KEY: &str = "package";
/// Optional bag key fixing the number of decimal places written per value.
pub const PRECISION_KEY: &str = "precision";

/// Typed settings resolved from a [`ConfigBag`].
///
/// `directory` and `filename` are relative paths that stay under the package
/// root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfig {
    pub filename: String,
    pub directory: String,
    pub package: String,
    pub precision: Option<usize>,
}

/// Resolve the recorder settings from `bag`.
///
/// `owner` is the display name of the component doing the lookup and is
/// carried by every error.
pub fn resolve(bag: &ConfigBag, owner: &str) -> Result<RecorderConfig> {
    Ok(RecorderConfig {
        filename: require_relative_path(bag, FILENAME_KEY, owner)?,
        directory: require_relative_path(bag, DIRECTORY_KEY, owner)?,
        package: require_str(bag, PACKAGE_KEY, owner)?,
        precision: optional_usize(bag, PRECISION_KEY, owner)?,
    })
}

/// Fetch a required, non-empty string value.
pub fn require_str(bag: &ConfigBag, key: &str, owner: &str) -> Result<String> {
    let value = bag.get(key).ok_or_else(|| RecorderError::MissingKey {
        owner: owner.to_string(),
        key: key.to_string(),
    })?;
    let Value::String(text) = value else {
        return Err(RecorderError::InvalidKey {
            owner: owner.to_string(),
            key: key.to_string(),
            expected: "a string",
        });
    };
    if text.trim().is_empty() {
        return Err(RecorderError::EmptyKey {
            owner: owner.to_string(),
            key: key.to_string(),
        });
    }
    Ok(text.clone())
}

/// Fetch a required string that must be a relative path without `..`.
pub fn require_relative_path(bag: &ConfigBag, key: &str, owner: &str) -> Result<String> {
    let text = require_str(bag, key, owner)?;
    let escapes = Path::new(&text).components().any(|component| {
        matches!(
            component,
            Component::RootDir | Component::Prefix(_) | Component::ParentDir
        )
    });
    if escapes {
        return Err(RecorderError::UnsafePath {
            owner: owner.to_string(),
            key: key.to_string(),
            value: text,
        });
    }
    Ok(text)
}

/// Fetch an optional non-negative integer value; `null` counts as absent.
pub fn optional_usize(bag: &ConfigBag, key: &str, owner: &str) -> Result<Option<usize>> {
    match bag.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| RecorderError::InvalidKey {
                owner: owner.to_string(),
                key: key.to_string(),
                expected: "a non-negative integer",
            }),
    }
}

/// Load a config bag from a JSON object on disk.
pub fn load_config_bag(path: &Path) -> anyhow::Result<ConfigBag> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let value: Value = serde_json::from_slice(&bytes).context("parse recorder config JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(anyhow::anyhow!(
            "recorder config {} must be a JSON object (got {})",
            path.display(),
            json_type_name(&other)
        )),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
