#![deny(missing_docs)]

//! # Hotpatch Core
//!
//! Idempotent, anchor-based patching of source and workflow files, with
//! backups and a git commit/push pipeline.

/// Shared error types.
pub mod error;

/// Explicit run configuration and the built-in plan.
pub mod config;

/// In-memory file documents.
pub mod document;

/// Anchor-based text patching.
pub mod patcher;

/// External command execution.
pub mod process;

/// Pipeline state machine.
pub mod orchestrator;

pub use config::{CommitSpec, RunConfig};
pub use document::Document;
pub use error::{AppError, AppResult};
pub use orchestrator::{FileAction, FileReport, Orchestrator, RunMode, RunReport, RunState};
pub use patcher::{
    AnchorSpec, BackupOutcome, BackupPolicy, PatchOutcome, PatchStep, SourcePatch, WorkflowPatch,
};
pub use process::{CommandExecutor, Git, ShellExecutor};
