//! Command implementations for chunkflow.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

mod chunk;
mod run;
mod validate;

use crate::cli::Command;
use crate::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => run::cmd_run(args),
        Command::Chunk(args) => chunk::cmd_chunk(args),
        Command::Validate(args) => validate::cmd_validate(args),
        Command::Agents(args) => validate::cmd_agents(args),
    }
}
