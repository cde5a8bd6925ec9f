//! CLI argument parsing for carbonlock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Carbonlock: take a storage lock from the shell.
///
/// The backend is picked from the location: local paths use an advisory
/// file lock, `hdfs://` and `viewfs://` locations use the coordination
/// service or filesystem leases depending on configuration.
#[derive(Parser, Debug)]
#[command(name = "carbonlock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for carbonlock.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a command while holding a lock.
    ///
    /// Retries acquisition per configuration, runs the command, then
    /// releases the lock. Exits with the command's exit code.
    Run(RunArgs),

    /// Show the state of a lock.
    ///
    /// Prints the lock path, selected backend, whether the lock is
    /// currently held, and who took it last.
    Status(LockArgs),
}

/// Arguments naming a lock.
#[derive(Args, Debug)]
pub struct LockArgs {
    /// Storage location (table directory, or the lock file itself for
    /// purposes other than metadata).
    pub location: String,

    /// Lock purpose (metadata, table_status, compaction,
    /// system_level_compaction, delete_segment, clean_files).
    #[arg(short, long, default_value = "metadata")]
    pub purpose: String,

    /// Path to a YAML config file.
    #[arg(short, long, env = "CARBONLOCK_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub lock: LockArgs,

    /// Command to run, after `--`.
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
