#![deny(missing_docs)]

//! # Hotpatch CLI
//!
//! Command line interface for the idempotent patcher.
//!
//! Supported Commands:
//! - `run`: Precheck -> patch source -> patch workflow -> stage -> commit -> push.
//! - `patch`: Precheck and both patch phases only.
//! - `show-plan`: Prints the effective plan as YAML.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod logging;
mod options;
mod patch;
mod report;
mod run;
mod show_plan;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Idempotent source and workflow patcher")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Patch both files, then commit and push.
    Run(run::RunArgs),
    /// Patch both files without touching git.
    Patch(patch::PatchArgs),
    /// Print the effective patch plan as YAML.
    ShowPlan(show_plan::ShowPlanArgs),
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run(args) => run::execute(args),
        Commands::Patch(args) => patch::execute(args),
        Commands::ShowPlan(args) => show_plan::execute(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            eprintln!("Inspect any *.backup files to revert manually.");
            ExitCode::FAILURE
        }
    }
}
