//! Chunkflow: run a sequence of LLM agents over documents too large for one call.
//!
//! This is the main entry point for the `chunkflow` CLI. It parses arguments,
//! sets up logging, dispatches to the appropriate command handler, and maps
//! errors to exit codes.

mod cli;
mod commands;
pub mod agent;
pub mod chunker;
pub mod config;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod flow;
pub mod fs;
pub mod llm;
pub mod logging;
pub mod pipeline;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    if let Err(err) = logging::init(&cli.log_level, cli.log_format) {
        eprintln!("Error: {:#}", err);
        return ExitCode::from(exit_codes::USER_ERROR as u8);
    }

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
