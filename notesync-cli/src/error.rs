// ============================================================================
// notesync-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// CliError is the error type of every option-group step and command body.
// It converts from CoreError, which lets binding failures and callable
// failures travel through the dispatcher on the same channel.
//
// KEY COMPONENTS:
// - CliError / CliResult: error enum and result alias
// - CliErrorContext: context helper for missing values

use std::fmt;

use notesync_core::CoreError;
use thiserror::Error;

/// Errors raised by the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Invalid value: {0}")]
    BadParameter(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Run state unavailable: {0}")]
    State(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Exit code for failures after parsing.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for invalid usage, shared with clap's own usage errors.
pub const EXIT_USAGE: i32 = 2;

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::BadParameter(_) => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }
}

/// Type alias for CLI results.
pub type CliResult<T> = Result<T, CliError>;

/// Extension trait turning a missing value into a `CliError::State`.
pub trait CliErrorContext<T> {
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display;
}

impl<T> CliErrorContext<T> for Option<T> {
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display,
    {
        self.ok_or_else(|| CliError::State(context.to_string()))
    }
}
