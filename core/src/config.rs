//! # Run Configuration
//!
//! Everything a run needs, passed explicitly to the orchestrator: the
//! repository root, both patch recipes and the commit/push target.
//!
//! `RunConfig::default()` is the built-in plan. A YAML plan may override
//! any subset of its fields.

use crate::error::AppResult;
use crate::patcher::{AnchorSpec, BackupPolicy, PatchStep, SourcePatch, WorkflowPatch};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const SHIM: &str = r#"
// BACKWARD COMPATIBILITY LAYER
function handleBackwardCompatibility(e) {
  const oldPage = e.parameter.p || e.parameter.page;
  const tenant = e.parameter.tenant;
  if (!oldPage || !tenant) return null;
  Logger.log('🔄 Backward compat: ?p=' + oldPage + '&tenant=' + tenant);
  const pageMapping = {'status':'status','admin':'manage','events':'events','display':'display','poster':'poster','public':'public','sponsor':'sponsors','config':'config','reports':'reports','diagnostics':'diagnostics'};
  const newPath = pageMapping[oldPage] || oldPage;
  let newUrl = (oldPage === 'status') ? '/status?tenant=' + tenant : '/' + tenant + '/' + newPath;
  for (const key in e.parameter) {
    if (key !== 'p' && key !== 'page' && key !== 'tenant') {
      newUrl += (newUrl.indexOf('?') > 0 ? '&' : '?') + key + '=' + e.parameter[key];
    }
  }
  Logger.log('   → Redirecting to: ' + newUrl);
  return HtmlService.createHtmlOutput('<!DOCTYPE html><html><head><meta http-equiv="refresh" content="0;url=' + newUrl + '"></head><body>Redirecting...</body></html>').setTitle('Redirecting');
}

"#;

const SHIM_CALL: &str = "\n  const backwardCompatRedirect = handleBackwardCompatibility(e);\n  if (backwardCompatRedirect) return backwardCompatRedirect;\n  \n";

const DO_GET: &str = r"function doGet\s*\(\s*e\s*\)\s*\{";

const COMMIT_MESSAGE: &str = "fix: Two critical test infrastructure bugs

Bug 1: ENV VAR mismatch
- Tests looked for BASE_URL but workflow only set GOOGLE_SCRIPT_URL
- Now setting both env vars in stage2-testing.yml

Bug 2: URL format incompatibility
- Tests use old format: ?p=page&tenant=id
- App now uses new format: /tenant/page
- Added backward compatibility in Code.gs

Result: Tests can now hit actual deployment URLs!";

/// Commit and push target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSpec {
    /// Full commit message, may span several lines.
    pub message: String,
    /// Remote to push to.
    pub remote: String,
    /// Branch to push.
    pub branch: String,
}

impl Default for CommitSpec {
    fn default() -> Self {
        Self {
            message: COMMIT_MESSAGE.to_string(),
            remote: "origin".to_string(),
            branch: "main".to_string(),
        }
    }
}

/// Explicit configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Repository root; target paths and git commands are relative to it.
    pub root: PathBuf,
    /// Source file recipe.
    pub source: SourcePatch,
    /// Workflow file recipe.
    pub workflow: WorkflowPatch,
    /// Commit and push target.
    pub commit: CommitSpec,
    /// Handling of pre-existing backups.
    pub backup_policy: BackupPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            source: SourcePatch {
                path: PathBuf::from("Code.gs"),
                marker: "handleBackwardCompatibility".to_string(),
                steps: vec![
                    PatchStep {
                        name: "shim definition".to_string(),
                        anchor: AnchorSpec::Declaration {
                            pattern: DO_GET.to_string(),
                        },
                        text: SHIM.to_string(),
                    },
                    PatchStep {
                        name: "shim call".to_string(),
                        anchor: AnchorSpec::BlockEntry {
                            declaration: DO_GET.to_string(),
                            opener: '{',
                            nested: Some(r"\btry\s*\{".to_string()),
                            window: crate::patcher::DEFAULT_NESTED_WINDOW,
                        },
                        text: SHIM_CALL.to_string(),
                    },
                ],
            },
            workflow: WorkflowPatch {
                path: PathBuf::from(".github/workflows/stage2-testing.yml"),
                existing_key: "GOOGLE_SCRIPT_URL".to_string(),
                value: "${{ needs.setup.outputs.deployment_url }}".to_string(),
                new_key: "BASE_URL".to_string(),
            },
            commit: CommitSpec::default(),
            backup_policy: BackupPolicy::default(),
        }
    }
}

impl RunConfig {
    /// Parses a YAML plan. Missing fields take their built-in values.
    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML plan file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Serializes the plan to YAML.
    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Absolute (root-joined) path of the source file.
    pub fn source_path(&self) -> PathBuf {
        self.root.join(&self.source.path)
    }

    /// Absolute (root-joined) path of the workflow file.
    pub fn workflow_path(&self) -> PathBuf {
        self.root.join(&self.workflow.path)
    }

    /// Sets the nested-block search window on every block-entry step.
    pub fn set_nested_window(&mut self, new_window: usize) {
        for step in &mut self.source.steps {
            if let AnchorSpec::BlockEntry { window, .. } = &mut step.anchor {
                *window = new_window;
            }
        }
    }
}
