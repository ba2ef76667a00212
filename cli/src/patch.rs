#![deny(missing_docs)]

//! # Patch Command
//!
//! Precheck and both patch phases, without touching git.

use crate::options::PlanArgs;
use crate::report::print_report;
use hotpatch_core::{AppResult, Orchestrator, RunMode, ShellExecutor};

/// Arguments for the patch command.
#[derive(clap::Args, Debug, Clone)]
pub struct PatchArgs {
    /// Plan selection and overrides.
    #[clap(flatten)]
    pub plan: PlanArgs,
}

/// Patches the target files in place.
pub fn execute(args: &PatchArgs) -> AppResult<()> {
    let config = args.plan.to_config()?;
    // No commands are issued in patch-only mode.
    let executor = ShellExecutor::default();

    let report = Orchestrator::new(&config, &executor).run(RunMode::PatchOnly)?;
    print_report(&report);
    Ok(())
}
