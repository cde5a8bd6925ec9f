//! Exit code constants for the carbonlock CLI.
//!
//! - 0: Success
//! - 1: User error (bad args)
//! - 2: Configuration error
//! - 4: Lock not obtained after exhausting retries
//! - 5: Protected command could not be started
//!
//! When `carbonlock run` starts its command, the command's own exit code is
//! passed through instead.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments such as an unknown lock purpose.
pub const USER_ERROR: i32 = 1;

/// Configuration file missing, unparsable, or invalid.
pub const CONFIG_ERROR: i32 = 2;

/// Lock acquisition failure: the lock was still held after all retries.
pub const LOCK_FAILURE: i32 = 4;

/// The protected command could not be spawned.
pub const COMMAND_FAILURE: i32 = 5;
