#![deny(missing_docs)]

//! # Text Patching
//!
//! Anchor-based insertion into semi-structured text. Insertion points are
//! found by pattern search, not by parsing.
//!
//! - **anchor**: Resolving declarations and block entries to byte offsets.
//! - **apply**: Inserting text at resolved anchors, one step at a time.
//! - **backup**: Snapshotting a file before its first mutation.
//! - **source**: Marker-gated patch recipes for source files.
//! - **workflow**: Duplicating key/value declarations in CI workflows.

/// Anchor resolution.
pub mod anchor;

/// Patch step application.
pub mod apply;

/// Backup files.
pub mod backup;

/// Source file recipes.
pub mod source;

/// Workflow file recipes.
pub mod workflow;

pub use anchor::{locate_block_entry, locate_declaration, AnchorSpec, DEFAULT_NESTED_WINDOW};
pub use apply::{apply_step, apply_steps, insert_at, PatchStep};
pub use backup::{backup_path, ensure_backup, BackupOutcome, BackupPolicy};
pub use source::{patch_source, SourcePatch};
pub use workflow::{patch_workflow, WorkflowPatch};

/// Result of a marker-gated patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The marker was present; the document is unchanged.
    AlreadyApplied,
    /// The patched document.
    Patched(String),
}

impl PatchOutcome {
    /// Returns the patched text, if any.
    pub fn into_patched(self) -> Option<String> {
        match self {
            PatchOutcome::Patched(text) => Some(text),
            PatchOutcome::AlreadyApplied => None,
        }
    }

    /// Returns the document after this outcome, given the original.
    pub fn resolve(&self, original: &str) -> String {
        match self {
            PatchOutcome::Patched(text) => text.clone(),
            PatchOutcome::AlreadyApplied => original.to_string(),
        }
    }

    /// True if the document was changed.
    pub fn is_patched(&self) -> bool {
        matches!(self, PatchOutcome::Patched(_))
    }
}
