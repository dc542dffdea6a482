//! Recorder lifecycle consumed by the optimizer.
//!
//! The optimizer only sees [`UpdateRecorder`], so it can be handed an
//! [`UpdateLogger`], a [`NoopRecorder`] or nothing at all.
use crate::config::{self, ConfigBag, RecorderConfig};
use crate::error::{RecorderError, Result};
use crate::format::render_matrix;
use crate::paths::{PackageLocator, SearchPathLocator};
use crate::session::{Header, SessionStore};
use ndarray::ArrayView2;
use std::fmt;
use std::path::PathBuf;

/// Display name used in diagnostics.
pub const UPDATE_LOGGER_NAME: &str = "UpdateLogger";

/// Robot model handed over at setup. Passed through, never interpreted.
#[derive(Debug, Clone, Default)]
pub struct ModelInfo {
    pub name: String,
}

/// Planning request for one run. Passed through, never interpreted.
#[derive(Debug, Clone, Default)]
pub struct PlanRequest {
    pub planner_id: String,
    pub group_name: String,
}

/// Problem dimensions captured when a run begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunContext {
    pub num_dimensions: usize,
    pub num_timesteps: usize,
}

/// Lifecycle contract between the optimizer and a recorder.
pub trait UpdateRecorder {
    /// Display name used in diagnostics.
    fn name(&self) -> &str;

    /// One-time setup; calls [`UpdateRecorder::configure`].
    fn initialize(
        &mut self,
        model: &ModelInfo,
        group_name: &str,
        bag: &ConfigBag,
    ) -> Result<()>;

    /// Resolve settings from `bag`.
    fn configure(&mut self, bag: &ConfigBag) -> Result<()>;

    /// Start recording a run.
    fn begin_run(&mut self, request: &PlanRequest, run: RunContext) -> Result<()>;

    /// Record the update matrix produced by one iteration.
    fn record_update(
        &mut self,
        start_timestep: usize,
        num_timesteps: usize,
        iteration: usize,
        updates: ArrayView2<'_, f64>,
    ) -> Result<()>;

    /// Finish the run, returning the written log path if there is one.
    fn end_run(
        &mut self,
        success: bool,
        total_iterations: usize,
        final_cost: f64,
    ) -> Result<Option<PathBuf>>;
}

/// Lifecycle position of an [`UpdateLogger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Uninitialized,
    Configured,
    Idle,
    Recording,
}

impl RecorderState {
    fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Configured => "configured",
            Self::Idle => "idle",
            Self::Recording => "recording",
        }
    }
}

impl fmt::Display for RecorderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Writes every update matrix of a run to one text file.
///
/// Lifecycle calls made out of order return [`RecorderError::Precondition`]
/// and leave the recorder untouched. The one exception is `begin_run` during
/// a run that never ended: the abandoned run is discarded and a new one starts.
pub struct UpdateLogger {
    name: String,
    group_name: String,
    locator: Box<dyn PackageLocator>,
    config: Option<RecorderConfig>,
    run: Option<RunContext>,
    store: SessionStore,
    state: RecorderState,
}

impl UpdateLogger {
    /// Create a logger that finds packages via the environment search path.
    pub fn new() -> Self {
        Self::with_locator(SearchPathLocator::from_env())
    }

    /// Create a logger with an explicit package locator.
    pub fn with_locator(locator: impl PackageLocator + 'static) -> Self {
        Self {
            name: UPDATE_LOGGER_NAME.to_string(),
            group_name: String::new(),
            locator: Box::new(locator),
            config: None,
            run: None,
            store: SessionStore::new(),
            state: RecorderState::Uninitialized,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn config(&self) -> Option<&RecorderConfig> {
        self.config.as_ref()
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    fn precondition(&self, operation: &'static str) -> RecorderError {
        tracing::error!(
            recorder = %self.name,
            operation,
            state = %self.state,
            "recorder lifecycle call out of order"
        );
        RecorderError::Precondition {
            operation,
            state: self.state.as_str(),
        }
    }
}

impl Default for UpdateLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateRecorder for UpdateLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, model: &ModelInfo, group_name: &str, bag: &ConfigBag) -> Result<()> {
        if self.state == RecorderState::Recording {
            return Err(self.precondition("initialize"));
        }
        tracing::debug!(recorder = %self.name, model = %model.name, group_name, "initializing");
        self.group_name = group_name.to_string();
        self.configure(bag)
    }

    fn configure(&mut self, bag: &ConfigBag) -> Result<()> {
        if self.state == RecorderState::Recording {
            return Err(self.precondition("configure"));
        }
        match config::resolve(bag, &self.name) {
            Ok(config) => {
                self.config = Some(config);
                self.state = RecorderState::Configured;
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    recorder = %self.name,
                    error = %err,
                    "failed to find the required parameters"
                );
                self.config = None;
                self.state = RecorderState::Uninitialized;
                Err(err)
            }
        }
    }

    fn begin_run(&mut self, request: &PlanRequest, run: RunContext) -> Result<()> {
        if self.state == RecorderState::Recording {
            tracing::warn!(
                recorder = %self.name,
                discarded = self.store.buffered_updates(),
                "previous run never ended; discarding its updates"
            );
            self.store.discard();
            self.run = None;
            self.state = RecorderState::Idle;
        }
        if !matches!(self.state, RecorderState::Configured | RecorderState::Idle) {
            return Err(self.precondition("begin_run"));
        }
        let Some(config) = self.config.as_ref() else {
            return Err(self.precondition("begin_run"));
        };

        if let Err(err) = self.store.begin_run(config, self.locator.as_ref()) {
            tracing::error!(
                recorder = %self.name,
                error = %err,
                "update logging disabled for this run"
            );
            return Err(err);
        }
        tracing::debug!(
            recorder = %self.name,
            planner = %request.planner_id,
            group = %request.group_name,
            dimensions = run.num_dimensions,
            timesteps = run.num_timesteps,
            "recording updates"
        );
        self.run = Some(run);
        self.state = RecorderState::Recording;
        Ok(())
    }

    fn record_update(
        &mut self,
        start_timestep: usize,
        num_timesteps: usize,
        iteration: usize,
        updates: ArrayView2<'_, f64>,
    ) -> Result<()> {
        if self.state != RecorderState::Recording {
            return Err(self.precondition("record_update"));
        }
        let precision = self.config.as_ref().and_then(|config| config.precision);
        self.store.append(render_matrix(updates, precision));
        tracing::trace!(
            iteration,
            start_timestep,
            num_timesteps,
            rows = updates.nrows(),
            cols = updates.ncols(),
            "recorded update"
        );
        Ok(())
    }

    fn end_run(
        &mut self,
        success: bool,
        total_iterations: usize,
        final_cost: f64,
    ) -> Result<Option<PathBuf>> {
        if self.state != RecorderState::Recording {
            return Err(self.precondition("end_run"));
        }
        let Some(run) = self.run.take() else {
            return Err(self.precondition("end_run"));
        };

        let recorded = self.store.buffered_updates();
        if recorded != total_iterations {
            tracing::warn!(
                recorder = %self.name,
                recorded,
                total_iterations,
                "iteration count differs from recorded updates; header uses recorded count"
            );
        }

        let header = Header::new(recorded, run.num_timesteps, run.num_dimensions);
        self.state = RecorderState::Idle;
        let path = self.store.commit(&header)?;

        let filename = self
            .config
            .as_ref()
            .map(|config| config.filename.as_str())
            .unwrap_or_default();
        tracing::info!(
            path = %path.display(),
            success,
            final_cost,
            iterations = recorded,
            "saved update log file, read with 'numpy.loadtxt(\"{filename}\")'"
        );
        Ok(Some(path))
    }
}

/// Recorder that accepts every call and records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl UpdateRecorder for NoopRecorder {
    fn name(&self) -> &str {
        "NoopRecorder"
    }

    fn initialize(
        &mut self,
        _model: &ModelInfo,
        _group_name: &str,
        _bag: &ConfigBag,
    ) -> Result<()> {
        Ok(())
    }

    fn configure(&mut self, _bag: &ConfigBag) -> Result<()> {
        Ok(())
    }

    fn begin_run(&mut self, _request: &PlanRequest, _run: RunContext) -> Result<()> {
        Ok(())
    }

    fn record_update(
        &mut self,
        _start_timestep: usize,
        _num_timesteps: usize,
        _iteration: usize,
        _updates: ArrayView2<'_, f64>,
    ) -> Result<()> {
        Ok(())
    }

    fn end_run(
        &mut self,
        _success: bool,
        _total_iterations: usize,
        _final_cost: f64,
    ) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}
