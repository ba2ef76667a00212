//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A required input file is absent (precheck).
    #[from(ignore)]
    #[display("Missing required file: {_0}")]
    MissingFile(String),

    /// The primary anchor of a patch could not be located.
    #[from(ignore)]
    #[display("Anchor not found: {pattern}")]
    AnchorNotFound {
        /// The pattern that failed to resolve.
        pattern: String,
    },

    /// An external command exited unsuccessfully.
    #[from(ignore)]
    #[display("Command `{command}` failed: {diagnostic}")]
    ExternalCommand {
        /// The command line, for display.
        command: String,
        /// Diagnostic output captured from the command.
        diagnostic: String,
    },

    /// A plan contains an invalid regular expression.
    #[display("Invalid pattern: {_0}")]
    Pattern(regex::Error),

    /// A plan file could not be parsed or serialized.
    #[display("Config Error: {_0}")]
    Config(serde_yaml::Error),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

impl AppError {
    /// Builds an `AnchorNotFound` for the given pattern.
    pub fn anchor_not_found(pattern: impl Into<String>) -> Self {
        AppError::AnchorNotFound {
            pattern: pattern.into(),
        }
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
