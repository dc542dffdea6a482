//! Shared test infrastructure for integration tests.

use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use update_log::{ConfigBag, SearchPathLocator, UpdateLogger};

/// Package name every fixture creates under its temp root.
pub const PACKAGE: &str = "stomp_fixture";

/// Temp package root plus the locator that finds it.
pub struct PackageFixture {
    pub root: TempDir,
}

impl PackageFixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp root");
        std::fs::create_dir(root.path().join(PACKAGE)).expect("create package dir");
        Self { root }
    }

    pub fn package_dir(&self) -> PathBuf {
        self.root.path().join(PACKAGE)
    }

    pub fn locator(&self) -> SearchPathLocator {
        SearchPathLocator::new(vec![self.root.path().to_path_buf()])
    }

    pub fn logger(&self) -> UpdateLogger {
        UpdateLogger::with_locator(self.locator())
    }
}

/// Config bag for `<package>/<directory>/<filename>`.
pub fn config_bag(directory: &str, filename: &str) -> ConfigBag {
    match json!({ "filename": filename, "directory": directory, "package": PACKAGE }) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!("json! object literal"),
    }
}

/// Parsed update log: header fields and numeric body rows.
#[derive(Debug)]
pub struct ParsedLog {
    pub header: BTreeMap<String, usize>,
    /// Number of `#` lines (checked by the lifecycle tests).
    #[allow(dead_code)]
    pub header_lines: usize,
    pub rows: Vec<Vec<f64>>,
}

impl ParsedLog {
    pub fn field(&self, name: &str) -> usize {
        *self
            .header
            .get(name)
            .unwrap_or_else(|| panic!("missing header field {name}"))
    }
}

/// Parse a log file the way a whitespace-delimited float loader would.
pub fn read_log(path: &Path) -> ParsedLog {
    let text = std::fs::read_to_string(path).expect("read update log");
    let mut header = BTreeMap::new();
    let mut header_lines = 0;
    let mut rows = Vec::new();
    for line in text.lines() {
        if let Some(comment) = line.strip_prefix("# ") {
            header_lines += 1;
            let (key, value) = comment.split_once(": ").expect("header key: value");
            header.insert(key.to_string(), value.parse().expect("header integer"));
            continue;
        }
        rows.push(
            line.split_whitespace()
                .map(|token| token.parse().expect("parse float"))
                .collect(),
        );
    }
    ParsedLog {
        header,
        header_lines,
        rows,
    }
}
