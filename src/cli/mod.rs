//! CLI argument parsing for chunkflow.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::config::ClientType;
use crate::logging::LogFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Chunkflow: run a sequence of LLM agents over documents too large for one call.
///
/// Each step feeds a file to an agent, splits the rendered prompt into
/// size-bounded chunks, calls the model once per chunk and writes the
/// reassembled answer to the step's output file.
#[derive(Parser, Debug)]
#[command(name = "chunkflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace). `RUST_LOG` refines it.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for chunkflow.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every step of a flow file in order.
    ///
    /// Stops at the first failing step; outputs of earlier steps are kept.
    Run(RunArgs),

    /// Split a composite document into chunks without calling any model.
    Chunk(ChunkArgs),

    /// Check a flow file: structure, agent references and first inputs.
    Validate(FlowArgs),

    /// List the agents defined in a flow file.
    Agents(FlowArgs),
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Flow definition (YAML with `dag_flow` and `agents`).
    pub flow: PathBuf,

    /// Run settings file (YAML). CLI flags override its values.
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Text-generation backend.
    #[arg(long, value_parser = parse_client_type)]
    pub client_type: Option<ClientType>,

    /// Model identifier.
    #[arg(short, long)]
    pub model_id: Option<String>,

    /// Endpoint URL (required for caii, optional override for bedrock).
    #[arg(long)]
    pub url: Option<String>,

    /// Bedrock region.
    #[arg(long)]
    pub region: Option<String>,

    /// Maximum output tokens per call; the chunk budget is twice this in characters.
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Send each prompt in one call instead of chunking it.
    #[arg(long)]
    pub no_chunks: bool,

    /// With --no-chunks, truncate oversized prompts instead of failing.
    #[arg(long)]
    pub truncate_input: bool,

    /// Fail a step when a section had to be dropped from a chunk.
    #[arg(long)]
    pub fail_on_content_loss: bool,

    /// Append run events (NDJSON) to this file.
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// Directory for per-chunk scratch files (defaults to the system temp dir).
    #[arg(long)]
    pub scratch_dir: Option<PathBuf>,

    /// Validate and print the plan without calling the model.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `chunk` command.
#[derive(Parser, Debug)]
pub struct ChunkArgs {
    /// Composite document (sections introduced by `# File: <path>` lines).
    pub document: PathBuf,

    /// Chunk budget in characters.
    #[arg(short, long)]
    pub budget: usize,

    /// Write each chunk to `chunk_NNN.md` in this directory.
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

/// Arguments for commands that only read a flow file.
#[derive(Parser, Debug)]
pub struct FlowArgs {
    /// Flow definition (YAML with `dag_flow` and `agents`).
    pub flow: PathBuf,
}

fn parse_client_type(s: &str) -> Result<ClientType, String> {
    ClientType::from_str(s)
        .ok_or_else(|| format!("unsupported client type '{}' (expected caii or bedrock)", s))
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
