//! Run settings for chunkflow.
//!
//! This module defines `RunConfig`, the optional settings file passed with
//! `--settings`. It supports forward-compatible YAML parsing (unknown fields
//! are kept but ignored), sensible defaults for every field, and validation.
//!
//! ```yaml
//! client:
//!   client_type: caii
//!   model_id: meta/llama-3.1-70b-instruct
//!   url: https://inference.example.com/v1
//!   max_tokens: 8000
//! pipeline:
//!   use_chunks: true
//! ```

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::RunConfig;
pub use types::{ClientSettings, ClientType, PipelineSettings};
