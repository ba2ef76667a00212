use crate::error::{AppError, AppResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default distance (in bytes) past the outer opener within which a nested block is accepted.
pub const DEFAULT_NESTED_WINDOW: usize = 100;

fn default_opener() -> char {
    '{'
}

fn default_window() -> usize {
    DEFAULT_NESTED_WINDOW
}

/// Declarative description of where a patch goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnchorSpec {
    /// Insert before the first match of `pattern`.
    Declaration {
        /// Regex matched against the whole document.
        pattern: String,
    },
    /// Insert just inside the block opened after a declaration.
    BlockEntry {
        /// Regex locating the declaration.
        declaration: String,
        /// Block opening delimiter.
        #[serde(default = "default_opener")]
        opener: char,
        /// Optional regex for a nested block preferred over the outer one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nested: Option<String>,
        /// How far past the outer opener the nested block may start.
        #[serde(default = "default_window")]
        window: usize,
    },
}

impl AnchorSpec {
    /// Resolves the anchor to a byte offset in `source`.
    pub fn resolve(&self, source: &str) -> AppResult<usize> {
        match self {
            AnchorSpec::Declaration { pattern } => {
                let re = Regex::new(pattern)?;
                locate_declaration(source, &re)
            }
            AnchorSpec::BlockEntry {
                declaration,
                opener,
                nested,
                window,
            } => {
                let decl = Regex::new(declaration)?;
                let nested = nested.as_deref().map(Regex::new).transpose()?;
                locate_block_entry(source, &decl, *opener, nested.as_ref(), *window)
            }
        }
    }

    /// The primary pattern, used in diagnostics.
    pub fn primary_pattern(&self) -> &str {
        match self {
            AnchorSpec::Declaration { pattern } => pattern,
            AnchorSpec::BlockEntry { declaration, .. } => declaration,
        }
    }
}

/// Returns the start offset of the first match of `pattern`.
pub fn locate_declaration(source: &str, pattern: &Regex) -> AppResult<usize> {
    pattern
        .find(source)
        .map(|m| m.start())
        .ok_or_else(|| AppError::anchor_not_found(pattern.as_str()))
}

/// Returns the offset just inside the block that follows `declaration`.
///
/// The outer opener is the first `opener` at or after the declaration start.
/// When `nested` matches less than `window` bytes past the outer opener,
/// the offset just after the first `opener` at or after that match is
/// returned instead. Otherwise the outer block is used.
pub fn locate_block_entry(
    source: &str,
    declaration: &Regex,
    opener: char,
    nested: Option<&Regex>,
    window: usize,
) -> AppResult<usize> {
    let decl_start = locate_declaration(source, declaration)?;

    let outer = source[decl_start..]
        .find(opener)
        .map(|idx| decl_start + idx + opener.len_utf8())
        .ok_or_else(|| AppError::anchor_not_found(declaration.as_str()))?;

    let Some(nested) = nested else {
        return Ok(outer);
    };

    match nested.find_at(source, outer) {
        Some(m) if m.start() - outer < window => match source[m.start()..].find(opener) {
            Some(idx) => {
                let inner = m.start() + idx + opener.len_utf8();
                debug!(outer, inner, "Resolved nested block entry");
                Ok(inner)
            }
            None => {
                warn!(pattern = nested.as_str(), "Nested block has no opener, using outer block");
                Ok(outer)
            }
        },
        Some(m) => {
            warn!(
                pattern = nested.as_str(),
                distance = m.start() - outer,
                window,
                "Nested block outside window, using outer block"
            );
            Ok(outer)
        }
        None => {
            debug!(pattern = nested.as_str(), "No nested block, using outer block");
            Ok(outer)
        }
    }
}
