//! # Orchestrator
//!
//! Runs the pipeline:
//!
//! 1. **Precheck**: both target files must exist.
//! 2. **Patch source**: marker gate and in-memory patch of the source file.
//! 3. **Patch workflow**: same for the CI workflow file, then backups and
//!    rewrites of both files. Nothing is written until both patches resolved.
//! 4. **Stage / Commit / Push**: git, via the injected `CommandExecutor`.
//!    When neither file changed, stage and commit are bypassed and only the
//!    push runs.
//!
//! The sequence never goes back. The first failure moves the run to
//! `Aborted` and nothing after it runs. Backups are the only recovery
//! mechanism.

use crate::config::RunConfig;
use crate::document::Document;
use crate::error::{AppError, AppResult};
use crate::patcher::{ensure_backup, patch_source, patch_workflow, BackupOutcome, PatchOutcome};
use crate::process::{CommandExecutor, Git};
use derive_more::Display;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Pipeline state.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Checking the target files exist.
    #[display("precheck")]
    Precheck,
    /// Patching the source file.
    #[display("patch source")]
    PatchSource,
    /// Patching the workflow file.
    #[display("patch workflow")]
    PatchWorkflow,
    /// `git add`. Bypassed when neither file changed.
    #[display("stage")]
    StageChanges,
    /// `git commit`. Bypassed when neither file changed.
    #[display("commit")]
    Commit,
    /// `git push`.
    #[display("push")]
    Push,
    /// Finished successfully.
    #[display("done")]
    Done,
    /// Halted after a failure.
    #[display("aborted")]
    Aborted,
}

/// How far the pipeline goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Patch, then stage, commit and push.
    Full,
    /// Patch only; no git.
    PatchOnly,
    /// Compute patches; write nothing, run nothing.
    DryRun,
}

/// What happened to one target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAction {
    /// The marker was present.
    AlreadyApplied,
    /// The file was rewritten.
    Patched,
    /// The file would be rewritten (dry run).
    WouldPatch,
}

/// Per-file result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Target path.
    pub path: PathBuf,
    /// Action taken.
    pub action: FileAction,
    /// Backup handling, when the file was rewritten.
    pub backup: Option<BackupOutcome>,
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Source file result.
    pub source: FileReport,
    /// Workflow file result.
    pub workflow: FileReport,
    /// Whether a commit was created.
    pub committed: bool,
    /// Whether the push ran.
    pub pushed: bool,
}

/// Sequences precheck, patching and git.
pub struct Orchestrator<'a, E: CommandExecutor + ?Sized> {
    config: &'a RunConfig,
    executor: &'a E,
    state: RunState,
    failed_at: Option<RunState>,
}

impl<'a, E: CommandExecutor + ?Sized> Orchestrator<'a, E> {
    /// Creates an orchestrator in the `Precheck` state.
    pub fn new(config: &'a RunConfig, executor: &'a E) -> Self {
        Self {
            config,
            executor,
            state: RunState::Precheck,
            failed_at: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// State in which the run failed, if it did.
    pub fn failed_at(&self) -> Option<RunState> {
        self.failed_at
    }

    /// Runs the pipeline to `Done` or `Aborted`.
    ///
    /// In `RunMode::Full`, `StageChanges` and `Commit` are skipped when both
    /// files were already patched; `Push` always runs.
    pub fn run(&mut self, mode: RunMode) -> AppResult<RunReport> {
        match self.run_steps(mode) {
            Ok(report) => {
                self.enter(RunState::Done);
                Ok(report)
            }
            Err(err) => {
                error!(state = %self.state, error = %err, "Run aborted");
                self.failed_at = Some(self.state);
                self.state = RunState::Aborted;
                Err(err)
            }
        }
    }

    fn enter(&mut self, state: RunState) {
        info!(state = %state, "Entering state");
        self.state = state;
    }

    fn run_steps(&mut self, mode: RunMode) -> AppResult<RunReport> {
        let config = self.config;

        self.enter(RunState::Precheck);
        let source_path = config.source_path();
        let workflow_path = config.workflow_path();
        for path in [&source_path, &workflow_path] {
            if !path.is_file() {
                return Err(AppError::MissingFile(path.display().to_string()));
            }
        }

        self.enter(RunState::PatchSource);
        let source_doc = Document::read(&source_path)?;
        let source_outcome = patch_source(source_doc.content(), &config.source)?;

        self.enter(RunState::PatchWorkflow);
        let workflow_doc = Document::read(&workflow_path)?;
        let workflow_outcome = patch_workflow(workflow_doc.content(), &config.workflow)?;

        let source = self.write_outcome(source_doc, source_outcome, mode)?;
        let workflow = self.write_outcome(workflow_doc, workflow_outcome, mode)?;

        let mut report = RunReport {
            source,
            workflow,
            committed: false,
            pushed: false,
        };

        if mode != RunMode::Full {
            return Ok(report);
        }

        let git = Git::new(self.executor);
        let changed = report.source.action == FileAction::Patched
            || report.workflow.action == FileAction::Patched;

        if changed {
            self.enter(RunState::StageChanges);
            git.stage(&[config.source.path.as_path(), config.workflow.path.as_path()])?;

            self.enter(RunState::Commit);
            git.commit(&config.commit.message)?;
            report.committed = true;
        } else {
            warn!("Both files already patched, nothing to commit");
        }

        self.enter(RunState::Push);
        git.push(&config.commit.remote, &config.commit.branch)?;
        report.pushed = true;

        Ok(report)
    }

    fn write_outcome(
        &self,
        mut doc: Document,
        outcome: PatchOutcome,
        mode: RunMode,
    ) -> AppResult<FileReport> {
        let path = doc.path().to_path_buf();

        let (action, backup) = match outcome {
            PatchOutcome::AlreadyApplied => (FileAction::AlreadyApplied, None),
            PatchOutcome::Patched(_) if mode == RunMode::DryRun => {
                info!(path = %path.display(), "Would patch (dry run)");
                (FileAction::WouldPatch, None)
            }
            PatchOutcome::Patched(text) => {
                let backup = ensure_backup(&path, doc.content(), self.config.backup_policy)?;
                doc.replace(text)?;
                info!(path = %path.display(), "Patched");
                (FileAction::Patched, Some(backup))
            }
        };

        Ok(FileReport {
            path,
            action,
            backup,
        })
    }
}
