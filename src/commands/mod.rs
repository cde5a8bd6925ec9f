//! Command implementations for carbonlock.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Handlers return the process exit code on success.

use crate::cli::{Command, LockArgs, RunArgs};
use carbonlock::config::LockConfig;
use carbonlock::error::{CarbonLockError, Result};
use carbonlock::exit_codes;
use carbonlock::locks::{
    read_holder, LockBackend, LockFactory, LockHandle, LockIdentity, LockPurpose,
};
use std::process;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<i32> {
    match command {
        Command::Run(args) => cmd_run(args),
        Command::Status(args) => cmd_status(args),
    }
}

fn load_config(args: &LockArgs) -> Result<LockConfig> {
    match &args.config {
        Some(path) => LockConfig::load(path),
        None => Ok(LockConfig::default()),
    }
}

fn parse_identity(args: &LockArgs) -> Result<LockIdentity> {
    let purpose = LockPurpose::from_str(&args.purpose).ok_or_else(|| {
        let known: Vec<_> = LockPurpose::ALL.iter().map(|p| p.as_str()).collect();
        CarbonLockError::UserError(format!(
            "unknown lock purpose '{}' (expected one of: {})",
            args.purpose,
            known.join(", ")
        ))
    })?;

    if args.location.trim().is_empty() {
        return Err(CarbonLockError::UserError(
            "lock location must not be empty".to_string(),
        ));
    }

    Ok(LockIdentity::new(args.location.clone(), purpose))
}

fn cmd_run(args: RunArgs) -> Result<i32> {
    let identity = parse_identity(&args.lock)?;
    let config = load_config(&args.lock)?;
    let factory = LockFactory::new(&config);

    let mut lock = factory.retrying_lock(identity.clone());
    if !lock.acquire() {
        return Err(CarbonLockError::LockError(format!(
            "{} is still locked after {} attempt(s)",
            identity,
            lock.policy().attempts()
        )));
    }

    // Program name is guaranteed by clap (`required = true`)
    let (program, program_args) = match args.command.split_first() {
        Some(split) => split,
        None => {
            lock.release();
            return Err(CarbonLockError::UserError("no command given".to_string()));
        }
    };

    let status = process::Command::new(program).args(program_args).status();

    if !lock.release() {
        eprintln!("Warning: failed to release lock on {}", identity);
    }

    let status = status
        .map_err(|e| CarbonLockError::CommandError(format!("'{}': {}", program, e)))?;

    // No exit code means the command was killed by a signal
    Ok(status.code().unwrap_or(exit_codes::COMMAND_FAILURE))
}

fn cmd_status(args: LockArgs) -> Result<i32> {
    let identity = parse_identity(&args)?;
    let config = load_config(&args)?;
    let factory = LockFactory::new(&config);
    let mut handle = factory.lock(identity.clone());

    println!("Lock:       {}", identity);
    println!("Path:       {}", identity.lock_path());
    println!("Backend:    {}", handle.kind().as_str());

    match &mut handle {
        LockBackend::Filesystem(fs_handle) => {
            match fs_handle.probe_locked() {
                Ok(true) => println!("State:      HELD"),
                Ok(false) => println!("State:      free"),
                Err(e) => println!("State:      unknown ({})", e),
            }

            match read_holder(fs_handle.path()) {
                Ok(Some(holder)) => {
                    println!("Last holder:");
                    println!("  Owner:    {}", holder.owner);
                    if let Some(pid) = holder.pid {
                        println!("  PID:      {}", pid);
                    }
                    println!(
                        "  Taken:    {}",
                        holder.created_at.format("%Y-%m-%d %H:%M:%S UTC")
                    );
                    println!("  Age:      {}", holder.age_string());
                    println!("  Purpose:  {}", holder.purpose);
                }
                Ok(None) => println!("Last holder: none recorded"),
                Err(e) => println!("Last holder: unreadable ({})", e),
            }
        }
        remote => {
            // Remote backends have no side channel; probe with a real acquire
            if remote.acquire() {
                remote.release();
                println!("State:      free");
            } else {
                println!("State:      held or backend unavailable");
            }
        }
    }

    Ok(exit_codes::SUCCESS)
}
