use crate::error::AppResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What to do when a backup file already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupPolicy {
    /// Leave an existing backup untouched.
    #[default]
    KeepExisting,
    /// Replace an existing backup with the current content.
    Overwrite,
}

/// Result of `ensure_backup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// A backup was written at this path.
    Created(PathBuf),
    /// A backup already existed at this path and was kept.
    Skipped(PathBuf),
}

/// Returns `<path>.backup`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".backup");
    PathBuf::from(name)
}

/// Writes `content` verbatim to the backup path of `path`.
///
/// The caller must already have checked that the patch marker is absent.
pub fn ensure_backup(path: &Path, content: &str, policy: BackupPolicy) -> AppResult<BackupOutcome> {
    let target = backup_path(path);

    if target.exists() {
        match policy {
            BackupPolicy::KeepExisting => {
                warn!(backup = %target.display(), "Backup already exists, keeping it");
                return Ok(BackupOutcome::Skipped(target));
            }
            BackupPolicy::Overwrite => {
                warn!(backup = %target.display(), "Overwriting existing backup");
            }
        }
    }

    fs::write(&target, content)?;
    info!(backup = %target.display(), "Created backup");
    Ok(BackupOutcome::Created(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new(".github/workflows/ci.yml")),
            PathBuf::from(".github/workflows/ci.yml.backup")
        );
    }

    #[test]
    fn test_backup_is_byte_identical() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Code.gs");
        let content = "function doGet(e) {\r\n  try {\t}\n}\u{1F600}";

        let outcome = ensure_backup(&file, content, BackupPolicy::KeepExisting).unwrap();
        let expected = dir.path().join("Code.gs.backup");
        assert_eq!(outcome, BackupOutcome::Created(expected.clone()));
        assert_eq!(fs::read(&expected).unwrap(), content.as_bytes());
    }

    #[test]
    fn test_existing_backup_is_kept() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Code.gs");
        fs::write(backup_path(&file), "first").unwrap();

        let outcome = ensure_backup(&file, "second", BackupPolicy::KeepExisting).unwrap();
        assert!(matches!(outcome, BackupOutcome::Skipped(_)));
        assert_eq!(fs::read_to_string(backup_path(&file)).unwrap(), "first");
    }

    #[test]
    fn test_existing_backup_is_overwritten_on_request() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Code.gs");
        fs::write(backup_path(&file), "first").unwrap();

        let outcome = ensure_backup(&file, "second", BackupPolicy::Overwrite).unwrap();
        assert!(matches!(outcome, BackupOutcome::Created(_)));
        assert_eq!(fs::read_to_string(backup_path(&file)).unwrap(), "second");
    }

    #[test]
    fn test_write_failure_is_io_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("missing_dir").join("Code.gs");
        let err = ensure_backup(&file, "x", BackupPolicy::KeepExisting).unwrap_err();
        assert!(matches!(err, crate::error::AppError::Io(_)));
    }
}
