//! Package lookup and output path construction.
//!
//! Output directories are configured relative to a named package, so the
//! recorder needs a way to turn a package name into a root directory.
use crate::config::RecorderConfig;
use crate::error::{RecorderError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable listing directories searched for packages.
pub const PACKAGE_PATH_ENV: &str = "UPDATE_LOG_PACKAGE_PATH";

/// Resolves a package name to the directory that roots it.
pub trait PackageLocator {
    fn locate(&self, package: &str) -> Option<PathBuf>;
}

/// Searches an ordered list of roots for a package directory.
///
/// A root matches if it contains a directory named after the package, or if
/// the root itself is that directory.
#[derive(Debug, Clone, Default)]
pub struct SearchPathLocator {
    roots: Vec<PathBuf>,
}

impl SearchPathLocator {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Build a locator from [`PACKAGE_PATH_ENV`]; unset means no roots.
    pub fn from_env() -> Self {
        let roots = env::var_os(PACKAGE_PATH_ENV)
            .map(|raw| env::split_paths(&raw).collect())
            .unwrap_or_default();
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl PackageLocator for SearchPathLocator {
    fn locate(&self, package: &str) -> Option<PathBuf> {
        self.roots.iter().find_map(|root| {
            if root.file_name().is_some_and(|name| name == package) && root.is_dir() {
                return Some(root.clone());
            }
            let candidate = root.join(package);
            candidate.is_dir().then_some(candidate)
        })
    }
}

/// Resolved on-disk locations for one recorder configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPaths {
    dir: PathBuf,
    file: PathBuf,
}

impl LogPaths {
    /// Compose `<package-root>/<directory>/<filename>`.
    pub fn resolve(config: &RecorderConfig, locator: &dyn PackageLocator) -> Result<Self> {
        let root = locator
            .locate(&config.package)
            .ok_or_else(|| RecorderError::PackageNotFound {
                package: config.package.clone(),
            })?;
        let dir = root.join(&config.directory);
        let file = dir.join(&config.filename);
        Ok(Self { dir, file })
    }

    /// Return the output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Return the output file path.
    pub fn file(&self) -> &Path {
        &self.file
    }
}
