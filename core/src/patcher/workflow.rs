use crate::error::{AppError, AppResult};
use crate::patcher::PatchOutcome;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Patch recipe for the CI workflow file.
///
/// Every `existing_key: value` line gets a sibling `new_key: value` line
/// directly above it, at the same indentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowPatch {
    /// File path, relative to the run root.
    pub path: PathBuf,
    /// Key of the declaration being duplicated.
    pub existing_key: String,
    /// Value shared by both keys.
    pub value: String,
    /// Key of the new declaration.
    pub new_key: String,
}

impl WorkflowPatch {
    /// The line body whose presence means the patch is already applied.
    pub fn marker(&self) -> String {
        format!("{}: {}", self.new_key, self.value)
    }

    fn line_pattern(&self) -> AppResult<Regex> {
        let pattern = format!(
            r"(?m)^([ \t]*)({}: {})",
            regex::escape(&self.existing_key),
            regex::escape(&self.value)
        );
        Ok(Regex::new(&pattern)?)
    }
}

/// Inserts the new key above every matching declaration line.
pub fn patch_workflow(source: &str, patch: &WorkflowPatch) -> AppResult<PatchOutcome> {
    let marker = patch.marker();
    if source.contains(&marker) {
        info!(marker = %marker, "Workflow variable already set");
        return Ok(PatchOutcome::AlreadyApplied);
    }

    let re = patch.line_pattern()?;
    if !re.is_match(source) {
        return Err(AppError::anchor_not_found(format!(
            "{}: {}",
            patch.existing_key, patch.value
        )));
    }

    // Closure replacement: values such as `${{ ... }}` must not be expanded.
    let patched = re.replace_all(source, |caps: &Captures| {
        format!("{indent}{marker}\n{indent}{line}", indent = &caps[1], line = &caps[2])
    });

    Ok(PatchOutcome::Patched(patched.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base_url() -> WorkflowPatch {
        WorkflowPatch {
            path: PathBuf::from(".github/workflows/stage2-testing.yml"),
            existing_key: "GOOGLE_SCRIPT_URL".into(),
            value: "${{ needs.setup.outputs.deployment_url }}".into(),
            new_key: "BASE_URL".into(),
        }
    }

    #[test]
    fn test_new_line_keeps_indentation() {
        let yaml = "jobs:\n  test:\n    env:\n          GOOGLE_SCRIPT_URL: ${{ needs.setup.outputs.deployment_url }}\n";
        let res = patch_workflow(yaml, &base_url()).unwrap().into_patched().unwrap();
        assert_eq!(
            res,
            "jobs:\n  test:\n    env:\n          BASE_URL: ${{ needs.setup.outputs.deployment_url }}\n          GOOGLE_SCRIPT_URL: ${{ needs.setup.outputs.deployment_url }}\n"
        );
    }

    #[test]
    fn test_every_occurrence_is_patched_with_its_own_indent() {
        let yaml = "a:\n  GOOGLE_SCRIPT_URL: ${{ needs.setup.outputs.deployment_url }}\nb:\n\tGOOGLE_SCRIPT_URL: ${{ needs.setup.outputs.deployment_url }}\n";
        let res = patch_workflow(yaml, &base_url()).unwrap().into_patched().unwrap();
        assert!(res.contains("\n  BASE_URL: ${{ needs.setup.outputs.deployment_url }}\n  GOOGLE_SCRIPT_URL"));
        assert!(res.contains("\n\tBASE_URL: ${{ needs.setup.outputs.deployment_url }}\n\tGOOGLE_SCRIPT_URL"));
        assert_eq!(res.matches("BASE_URL: ").count(), 2);
    }

    #[test]
    fn test_already_set_is_left_alone() {
        let yaml = "env:\n  BASE_URL: ${{ needs.setup.outputs.deployment_url }}\n  GOOGLE_SCRIPT_URL: ${{ needs.setup.outputs.deployment_url }}\n";
        let outcome = patch_workflow(yaml, &base_url()).unwrap();
        assert_eq!(outcome, PatchOutcome::AlreadyApplied);
    }

    #[test]
    fn test_missing_declaration_is_reported() {
        let yaml = "env:\n  OTHER: 1\n";
        let err = patch_workflow(yaml, &base_url()).unwrap_err();
        assert!(matches!(err, AppError::AnchorNotFound { .. }));
    }

    #[test]
    fn test_crlf_line_endings_survive() {
        let yaml = "env:\r\n    GOOGLE_SCRIPT_URL: ${{ needs.setup.outputs.deployment_url }}\r\n";
        let res = patch_workflow(yaml, &base_url()).unwrap().into_patched().unwrap();
        assert!(res.ends_with("    GOOGLE_SCRIPT_URL: ${{ needs.setup.outputs.deployment_url }}\r\n"));
        assert!(res.contains("env:\r\n    BASE_URL: "));
    }
}
