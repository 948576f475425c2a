//! Agents: named, template-driven wrappers around one pipeline call.
//!
//! - **Definition**: the structured agent entry from a flow file
//! - **Prompt**: rendering a definition and an input into one prompt
//! - **Dispatch**: binding a definition to a [`ChunkPipeline`](crate::pipeline::ChunkPipeline)
//!   and executing it

mod definition;
mod dispatch;
pub mod prompt;

pub use definition::AgentDefinition;
pub use dispatch::Agent;
