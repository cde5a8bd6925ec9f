//! Carbonlock: take storage locks from the command line.
//!
//! This is the main entry point for the `carbonlock` CLI. It parses
//! arguments, installs logging, dispatches to the appropriate command
//! handler, and maps errors to exit codes.

mod cli;
mod commands;

use carbonlock::{exit_codes, logging};
use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    match commands::dispatch(cli.command) {
        Ok(code) => ExitCode::from(clamp_exit_code(code)),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);
            ExitCode::from(clamp_exit_code(err.exit_code()))
        }
    }
}

fn clamp_exit_code(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(exit_codes::COMMAND_FAILURE as u8)
}
