#![deny(missing_docs)]

//! # Show Plan Command
//!
//! Prints the effective plan (built-in or loaded, with overrides) as YAML.
//! The output is itself a valid `--plan` file.

use crate::options::PlanArgs;
use hotpatch_core::AppResult;

/// Arguments for the show-plan command.
#[derive(clap::Args, Debug, Clone)]
pub struct ShowPlanArgs {
    /// Plan selection and overrides.
    #[clap(flatten)]
    pub plan: PlanArgs,
}

/// Renders the effective plan.
pub fn render(args: &ShowPlanArgs) -> AppResult<String> {
    args.plan.to_config()?.to_yaml()
}

/// Prints the effective plan to stdout.
pub fn execute(args: &ShowPlanArgs) -> AppResult<()> {
    print!("{}", render(args)?);
    Ok(())
}
