//! Per-run storage for rendered updates.
//!
//! Rendered blocks are buffered in memory for the whole run and written to
//! disk once, on commit. The file is written to a temp file beside the target
//! and renamed into place, so readers never see a partial log.
use crate::config::RecorderConfig;
use crate::error::{RecorderError, Result};
use crate::paths::{LogPaths, PackageLocator};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Mode given to committed logs; temp files start out owner-only.
#[cfg(unix)]
const LOG_FILE_MODE: u32 = 0o644;

/// Metadata block written ahead of the update rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub iterations: usize,
    pub timesteps: usize,
    pub dimensions: usize,
    pub rows: usize,
    pub cols: usize,
}

impl Header {
    /// Derive the stacked matrix shape from the run dimensions.
    pub fn new(iterations: usize, timesteps: usize, dimensions: usize) -> Self {
        Self {
            iterations,
            timesteps,
            dimensions,
            rows: dimensions * iterations,
            cols: timesteps,
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# num_iterations: {}", self.iterations)?;
        writeln!(f, "# num_timesteps: {}", self.timesteps)?;
        writeln!(f, "# num_dimensions: {}", self.dimensions)?;
        writeln!(f, "# matrix_rows: {}", self.rows)?;
        writeln!(f, "# matrix_cols: {}", self.cols)
    }
}

/// Buffer and pending output file for one run at a time.
#[derive(Debug, Default)]
pub struct SessionStore {
    paths: Option<LogPaths>,
    pending: Option<NamedTempFile>,
    buffer: Vec<String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare the output location for a new run.
    ///
    /// Creates the leaf output directory if needed (its parent must exist),
    /// removes a log left by an earlier run and opens the pending temp file.
    pub fn begin_run(
        &mut self,
        config: &RecorderConfig,
        locator: &dyn PackageLocator,
    ) -> Result<()> {
        self.discard();

        let paths = LogPaths::resolve(config, locator)?;
        if !paths.dir().is_dir() {
            fs::create_dir(paths.dir()).map_err(|source| RecorderError::CreateDir {
                path: paths.dir().to_path_buf(),
                source,
            })?;
            tracing::info!(dir = %paths.dir().display(), "created update log directory");
        }

        if paths.file().exists() {
            fs::remove_file(paths.file()).map_err(|source| RecorderError::RemoveStale {
                path: paths.file().to_path_buf(),
                source,
            })?;
            tracing::debug!(path = %paths.file().display(), "removed previous update log");
        }

        let pending = tempfile::Builder::new()
            .prefix(".update-log-")
            .suffix(".tmp")
            .tempfile_in(paths.dir())
            .map_err(|source| RecorderError::OpenFile {
                path: paths.file().to_path_buf(),
                source,
            })?;

        self.paths = Some(paths);
        self.pending = Some(pending);
        Ok(())
    }

    /// Buffer one rendered update block.
    pub fn append(&mut self, block: String) {
        self.buffer.push(block);
    }

    /// Number of blocks buffered since the run began.
    pub fn buffered_updates(&self) -> usize {
        self.buffer.len()
    }

    /// Whether a run is open and waiting for commit.
    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Target path of the open run, if any.
    pub fn target(&self) -> Option<PathBuf> {
        self.paths.as_ref().map(|paths| paths.file().to_path_buf())
    }

    /// Write `header` and every buffered block, then move the file into place.
    ///
    /// The buffer is cleared whether or not the write succeeds.
    pub fn commit(&mut self, header: &Header) -> Result<PathBuf> {
        let blocks = std::mem::take(&mut self.buffer);
        let (Some(paths), Some(mut pending)) = (self.paths.take(), self.pending.take()) else {
            return Err(RecorderError::Precondition {
                operation: "commit",
                state: "not started",
            });
        };

        let mut contents = header.to_string();
        for block in &blocks {
            contents.push_str(block);
        }

        let target = paths.file().to_path_buf();
        pending
            .write_all(contents.as_bytes())
            .and_then(|()| pending.flush())
            .and_then(|()| publish_permissions(&pending))
            .map_err(|source| RecorderError::WriteFile {
                path: target.clone(),
                source,
            })?;
        pending
            .persist(&target)
            .map_err(|err| RecorderError::Persist {
                path: target.clone(),
                source: err.error,
            })?;

        Ok(target)
    }

    /// Drop any open run without writing anything.
    pub fn discard(&mut self) {
        self.buffer.clear();
        self.paths = None;
        // Dropping the temp file deletes it.
        self.pending = None;
    }
}

#[cfg(unix)]
fn publish_permissions(pending: &NamedTempFile) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(pending.path(), fs::Permissions::from_mode(LOG_FILE_MODE))
}

#[cfg(not(unix))]
fn publish_permissions(_pending: &NamedTempFile) -> std::io::Result<()> {
    Ok(())
}
