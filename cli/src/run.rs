#![deny(missing_docs)]

//! # Run Command
//!
//! Full pipeline: precheck, patch both files, then stage, commit and push.
//! With `--dry-run` nothing is written and git is not invoked.

use crate::options::PlanArgs;
use crate::report::print_report;
use hotpatch_core::{AppResult, CommandExecutor, Orchestrator, RunConfig, RunMode, ShellExecutor};

/// Arguments for the run command.
#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Plan selection and overrides.
    #[clap(flatten)]
    pub plan: PlanArgs,

    /// Compute the patches and report them without writing or committing.
    #[clap(long)]
    pub dry_run: bool,
}

/// Executes the pipeline, running git inside the configured root.
pub fn execute(args: &RunArgs) -> AppResult<()> {
    let config = args.plan.to_config()?;
    let executor = ShellExecutor::in_dir(&config.root);
    execute_with(&config, args.dry_run, &executor)
}

/// Executes the pipeline for an explicit configuration.
///
/// # Arguments
///
/// * `config` - Effective run configuration.
/// * `dry_run` - Compute patches only.
/// * `executor` - Runs git.
pub fn execute_with(
    config: &RunConfig,
    dry_run: bool,
    executor: &impl CommandExecutor,
) -> AppResult<()> {
    let mode = if dry_run {
        RunMode::DryRun
    } else {
        RunMode::Full
    };

    println!("Patching repository at {:?}...", config.root);
    let report = Orchestrator::new(config, executor).run(mode)?;
    print_report(&report);

    if report.pushed {
        println!(
            "Pushed to {} {}.",
            config.commit.remote, config.commit.branch
        );
    }
    Ok(())
}
