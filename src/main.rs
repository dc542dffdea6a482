use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use update_log::{
    load_config_bag, ModelInfo, OptimizerSettings, PlanRequest, SearchPathLocator,
    SyntheticOptimizer, UpdateLogger, UpdateRecorder,
};

mod cli;

use cli::{Command, RecordArgs, RootArgs};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    match args.command {
        Command::Record(args) => cmd_record(args),
    }
}

fn cmd_record(args: RecordArgs) -> Result<()> {
    let bag = load_config_bag(&args.config)?;
    let locator = if args.package_path.is_empty() {
        SearchPathLocator::from_env()
    } else {
        SearchPathLocator::new(args.package_path.clone())
    };

    let mut logger = UpdateLogger::with_locator(locator);
    let model = ModelInfo {
        name: "synthetic".to_string(),
    };
    // A misconfigured logger only disables logging; the optimizer still runs.
    let recorder: Option<Box<dyn UpdateRecorder>> =
        match logger.initialize(&model, &args.group, &bag) {
            Ok(()) => Some(Box::new(logger)),
            Err(err) => {
                tracing::warn!(error = %err, "update logging disabled");
                None
            }
        };

    let settings = OptimizerSettings {
        num_dimensions: args.dimensions,
        num_timesteps: args.timesteps,
        max_iterations: args.iterations,
        step_size: args.step_size,
    };
    let mut optimizer = SyntheticOptimizer::new(settings, recorder);
    let request = PlanRequest {
        planner_id: "synthetic".to_string(),
        group_name: args.group.clone(),
    };

    for run in 1..=args.runs {
        let summary = optimizer.run(&request);
        match &summary.log_path {
            Some(path) => println!(
                "run {run}: {} iterations, final cost {:.6}, wrote {}",
                summary.iterations,
                summary.final_cost,
                path.display()
            ),
            None => println!(
                "run {run}: {} iterations, final cost {:.6}, no update log",
                summary.iterations, summary.final_cost
            ),
        }
    }
    std::io::Write::flush(&mut std::io::stdout()).context("flush stdout")?;
    Ok(())
}
