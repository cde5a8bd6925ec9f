//! Error types for carbonlock.
//!
//! Two layers, deliberately kept apart:
//! - [`LockFault`] classifies what went wrong inside a lock backend. Faults are
//!   logged and collapsed to a boolean at the `LockHandle` boundary; they never
//!   reach callers of `acquire`/`release`.
//! - [`CarbonLockError`] is the user-facing error for configuration loading and
//!   the CLI. Each variant maps to a process exit code.

use crate::exit_codes;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Internal failure taxonomy of a lock backend.
#[derive(Error, Debug)]
pub enum LockFault {
    /// The lock file could not be created.
    #[error("failed to create lock file '{}': {source}", path.display())]
    Create { path: PathBuf, source: io::Error },

    /// The lock is held by someone else.
    #[error("lock '{}' is held by another owner", path.display())]
    Conflict { path: PathBuf },

    /// Any other I/O failure while acquiring.
    #[error("failed to acquire lock '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    /// Giving up the lock failed.
    #[error("failed to release lock '{}': {source}", path.display())]
    Release { path: PathBuf, source: io::Error },

    /// Closing the lock file handle after release failed.
    #[error("failed to close lock file '{}': {source}", path.display())]
    Close { path: PathBuf, source: io::Error },
}

impl LockFault {
    /// Whether this fault is the ordinary "someone else has it" outcome.
    pub fn is_conflict(&self) -> bool {
        matches!(self, LockFault::Conflict { .. })
    }
}

/// Main error type for carbonlock operations above the lock boundary.
#[derive(Error, Debug)]
pub enum CarbonLockError {
    /// User provided invalid arguments.
    #[error("{0}")]
    UserError(String),

    /// Configuration could not be read, parsed, or validated.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Lock could not be obtained within the retry budget.
    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    /// The protected command could not be started.
    #[error("Command failed to start: {0}")]
    CommandError(String),
}

impl CarbonLockError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CarbonLockError::UserError(_) => exit_codes::USER_ERROR,
            CarbonLockError::ConfigError(_) => exit_codes::CONFIG_ERROR,
            CarbonLockError::LockError(_) => exit_codes::LOCK_FAILURE,
            CarbonLockError::CommandError(_) => exit_codes::COMMAND_FAILURE,
        }
    }
}

/// Result type alias for carbonlock operations.
pub type Result<T> = std::result::Result<T, CarbonLockError>;
