#![deny(missing_docs)]

//! # Plan Options
//!
//! Flags shared by every command that builds a `RunConfig`: an optional
//! YAML plan, then individual overrides on top of it.

use hotpatch_core::{AppResult, BackupPolicy, RunConfig};
use std::path::PathBuf;

/// Arguments selecting and overriding the patch plan.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PlanArgs {
    /// Repository root containing both target files.
    #[clap(long, env = "HOTPATCH_ROOT")]
    pub root: Option<PathBuf>,

    /// YAML plan file. The built-in plan is used when omitted.
    #[clap(long, env = "HOTPATCH_PLAN")]
    pub plan: Option<PathBuf>,

    /// Source file to patch, relative to the root.
    #[clap(long, env = "HOTPATCH_SOURCE")]
    pub source: Option<PathBuf>,

    /// Workflow file to patch, relative to the root.
    #[clap(long, env = "HOTPATCH_WORKFLOW")]
    pub workflow: Option<PathBuf>,

    /// Remote to push to.
    #[clap(long, env = "HOTPATCH_REMOTE")]
    pub remote: Option<String>,

    /// Branch to push.
    #[clap(long, env = "HOTPATCH_BRANCH")]
    pub branch: Option<String>,

    /// How far (in bytes) past a declaration's opening brace a nested block may start.
    #[clap(long, env = "HOTPATCH_NESTED_WINDOW")]
    pub nested_window: Option<usize>,

    /// Replace backups left by earlier runs instead of keeping them.
    #[clap(long)]
    pub overwrite_backup: bool,
}

impl PlanArgs {
    /// Builds the effective configuration.
    pub fn to_config(&self) -> AppResult<RunConfig> {
        let mut config = match &self.plan {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };

        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(source) = &self.source {
            config.source.path = source.clone();
        }
        if let Some(workflow) = &self.workflow {
            config.workflow.path = workflow.clone();
        }
        if let Some(remote) = &self.remote {
            config.commit.remote = remote.clone();
        }
        if let Some(branch) = &self.branch {
            config.commit.branch = branch.clone();
        }
        if let Some(window) = self.nested_window {
            config.set_nested_window(window);
        }
        if self.overwrite_backup {
            config.backup_policy = BackupPolicy::Overwrite;
        }

        Ok(config)
    }
}
