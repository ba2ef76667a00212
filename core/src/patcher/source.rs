use crate::error::AppResult;
use crate::patcher::apply::{apply_steps, PatchStep};
use crate::patcher::PatchOutcome;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Patch recipe for the application source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePatch {
    /// File path, relative to the run root.
    pub path: PathBuf,
    /// Substring whose presence means the patch is already applied.
    pub marker: String,
    /// Insertions, applied in order.
    pub steps: Vec<PatchStep>,
}

/// Applies `patch` to `source` unless its marker is already present.
///
/// Nothing is written here; a missing anchor surfaces before the caller
/// touches the filesystem.
pub fn patch_source(source: &str, patch: &SourcePatch) -> AppResult<PatchOutcome> {
    if source.contains(&patch.marker) {
        info!(marker = %patch.marker, "Source already patched");
        return Ok(PatchOutcome::AlreadyApplied);
    }

    let patched = apply_steps(source, &patch.steps)?;
    Ok(PatchOutcome::Patched(patched))
}
