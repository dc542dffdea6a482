//! Small trajectory optimizer used to exercise a recorder end to end.
//!
//! Each iteration moves the trajectory a fixed fraction of the way towards a
//! smooth target profile. The recorder is injected at construction; any error
//! it reports turns logging off for the current run and nothing else.
use crate::recorder::{PlanRequest, RunContext, UpdateRecorder};
use ndarray::Array2;
use std::f64::consts::PI;
use std::path::PathBuf;

/// Knobs for [`SyntheticOptimizer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerSettings {
    pub num_dimensions: usize,
    pub num_timesteps: usize,
    pub max_iterations: usize,
    pub step_size: f64,
}

/// What one optimization run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub iterations: usize,
    pub final_cost: f64,
    pub log_path: Option<PathBuf>,
}

pub struct SyntheticOptimizer {
    settings: OptimizerSettings,
    recorder: Option<Box<dyn UpdateRecorder>>,
}

impl SyntheticOptimizer {
    pub fn new(settings: OptimizerSettings, recorder: Option<Box<dyn UpdateRecorder>>) -> Self {
        Self { settings, recorder }
    }

    pub fn settings(&self) -> &OptimizerSettings {
        &self.settings
    }

    /// Run one optimization from a zero trajectory.
    pub fn run(&mut self, request: &PlanRequest) -> RunSummary {
        let OptimizerSettings {
            num_dimensions,
            num_timesteps,
            max_iterations,
            step_size,
        } = self.settings;
        let target = target_profile(num_dimensions, num_timesteps);
        let mut trajectory = Array2::<f64>::zeros((num_dimensions, num_timesteps));

        let mut logging = match self.recorder.as_mut() {
            Some(recorder) => {
                let run = RunContext {
                    num_dimensions,
                    num_timesteps,
                };
                match recorder.begin_run(request, run) {
                    Ok(()) => true,
                    Err(err) => {
                        tracing::warn!(recorder = recorder.name(), error = %err, "continuing without update log");
                        false
                    }
                }
            }
            None => false,
        };

        for iteration in 0..max_iterations {
            let updates = (&target - &trajectory) * step_size;
            if logging {
                if let Some(recorder) = self.recorder.as_mut() {
                    if let Err(err) =
                        recorder.record_update(0, num_timesteps, iteration, updates.view())
                    {
                        tracing::warn!(recorder = recorder.name(), error = %err, "dropping update log");
                        logging = false;
                    }
                }
            }
            trajectory += &updates;
        }

        let final_cost = cost(&trajectory, &target);
        let mut log_path = None;
        if logging {
            if let Some(recorder) = self.recorder.as_mut() {
                match recorder.end_run(true, max_iterations, final_cost) {
                    Ok(path) => log_path = path,
                    Err(err) => {
                        tracing::warn!(recorder = recorder.name(), error = %err, "update log not written");
                    }
                }
            }
        }

        tracing::info!(iterations = max_iterations, final_cost, "optimization finished");
        RunSummary {
            iterations: max_iterations,
            final_cost,
            log_path,
        }
    }
}

/// Half-period sine per joint, scaled by joint index.
fn target_profile(num_dimensions: usize, num_timesteps: usize) -> Array2<f64> {
    let denom = num_timesteps.saturating_sub(1).max(1) as f64;
    Array2::from_shape_fn((num_dimensions, num_timesteps), |(dim, step)| {
        (dim + 1) as f64 * (PI * step as f64 / denom).sin()
    })
}

fn cost(trajectory: &Array2<f64>, target: &Array2<f64>) -> f64 {
    (trajectory - target).mapv(|delta| delta * delta).sum()
}
