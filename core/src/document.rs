//! A text file held in memory between read and whole-file rewrite.

use crate::error::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};

/// File content identified by its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    content: String,
}

impl Document {
    /// Reads the whole file. A missing file is `AppError::MissingFile`.
    pub fn read(path: &Path) -> AppResult<Self> {
        if !path.is_file() {
            return Err(AppError::MissingFile(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            content,
        })
    }

    /// Path the document was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replaces the file on disk with `content` (truncate and write, not atomic).
    pub fn replace(&mut self, content: String) -> AppResult<()> {
        fs::write(&self.path, &content)?;
        self.content = content;
        Ok(())
    }
}
