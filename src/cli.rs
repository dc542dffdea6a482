//! CLI argument parsing for the update-log driver.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "update-log",
    version,
    about = "Record per-iteration trajectory updates to a loadtxt-friendly file",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Record(RecordArgs),
}

/// Record command inputs.
#[derive(Parser, Debug)]
#[command(about = "Run the synthetic optimizer with the update logger attached")]
pub struct RecordArgs {
    /// JSON object with filename, directory, package (and optional precision)
    #[arg(long, value_name = "PATH")]
    pub config: PathBuf,

    /// Directory searched for the configured package (repeatable; defaults to UPDATE_LOG_PACKAGE_PATH)
    #[arg(long, value_name = "DIR")]
    pub package_path: Vec<PathBuf>,

    /// Planning group name passed to the logger
    #[arg(long, default_value = "manipulator")]
    pub group: String,

    /// Degrees of freedom (matrix rows per iteration)
    #[arg(long, default_value_t = 7)]
    pub dimensions: usize,

    /// Time steps (matrix columns)
    #[arg(long, default_value_t = 20)]
    pub timesteps: usize,

    /// Iterations per run
    #[arg(long, default_value_t = 10)]
    pub iterations: usize,

    /// Fraction of the remaining error removed per iteration
    #[arg(long, default_value_t = 0.3)]
    pub step_size: f64,

    /// Number of consecutive runs on the same logger
    #[arg(long, default_value_t = 1)]
    pub runs: usize,
}
