//! Recorder for the per-iteration update matrices of a trajectory optimizer.
//!
//! A run's updates are buffered in memory and written once, when the run ends,
//! to `<package-root>/<directory>/<filename>` with a short `#` header that
//! tells a loader how to reshape the stacked rows.
pub mod config;
pub mod driver;
pub mod error;
pub mod format;
pub mod paths;
pub mod recorder;
pub mod session;

pub use config::{load_config_bag, resolve, ConfigBag, RecorderConfig};
pub use driver::{OptimizerSettings, RunSummary, SyntheticOptimizer};
pub use error::{ErrorKind, RecorderError, Result};
pub use format::render_matrix;
pub use paths::{LogPaths, PackageLocator, SearchPathLocator, PACKAGE_PATH_ENV};
pub use recorder::{
    ModelInfo, NoopRecorder, PlanRequest, RecorderState, RunContext, UpdateLogger,
    UpdateRecorder, UPDATE_LOGGER_NAME,
};
pub use session::{Header, SessionStore};
