//! Error types for chunkflow.
//!
//! Every failure bubbles up chunk -> pipeline -> agent -> step -> run with no
//! local recovery. Step-level failures carry the 1-based step index and the
//! agent name so the CLI can report exactly where a run stopped.

use crate::agent::prompt::TemplateError;
use crate::exit_codes;
use crate::llm::RemoteCallError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for chunkflow operations.
#[derive(Error, Debug)]
pub enum FlowError {
    /// Malformed or incomplete flow, agent, step or run settings.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A step names an agent the flow does not define.
    #[error(
        "step {step}: agent '{agent}' is used in dag_flow but not found in agent definitions (available agents: {available})"
    )]
    UnknownAgent {
        step: usize,
        agent: String,
        available: String,
    },

    /// A step's input file does not exist.
    #[error("step {step} ({agent}): input file not found: {}", .path.display())]
    MissingInput {
        step: usize,
        agent: String,
        path: PathBuf,
    },

    /// The text-generation service failed.
    #[error("remote call failed: {0}")]
    RemoteCall(#[from] RemoteCallError),

    /// Direct mode without truncation received a prompt over the size budget.
    #[error(
        "input too long: {chars} characters (~{} tokens), maximum supported is {max_chars} characters (~{} tokens). \
         Enable chunking or input truncation, or process a smaller document.",
        .chars / 4,
        .max_chars / 4
    )]
    InputTooLong { chars: usize, max_chars: usize },

    /// A section header alone exceeded the chunk budget and its body was dropped.
    #[error("section '{label}' does not fit a chunk budget of {budget} characters; its content was omitted")]
    OversizedContentLoss { label: String, budget: usize },

    /// Prompt template rendering failed.
    #[error("prompt template error: {0}")]
    Template(#[from] TemplateError),

    /// Filesystem failure with a user-facing description.
    #[error("{0}")]
    Io(String),

    /// A step failed while its agent was running or its output was being written.
    #[error("step {step} ({agent}) failed: {source}")]
    StepFailed {
        step: usize,
        agent: String,
        #[source]
        source: Box<FlowError>,
    },
}

impl FlowError {
    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            FlowError::InvalidConfiguration(_) => exit_codes::USER_ERROR,
            FlowError::Template(_) => exit_codes::USER_ERROR,
            FlowError::Io(_) => exit_codes::USER_ERROR,
            FlowError::InputTooLong { .. } => exit_codes::USER_ERROR,
            FlowError::UnknownAgent { .. } => exit_codes::STEP_FAILURE,
            FlowError::MissingInput { .. } => exit_codes::STEP_FAILURE,
            FlowError::RemoteCall(_) => exit_codes::REMOTE_FAILURE,
            FlowError::OversizedContentLoss { .. } => exit_codes::CONTENT_LOSS,
            FlowError::StepFailed { source, .. } => match source.as_ref() {
                FlowError::Io(_) => exit_codes::STEP_FAILURE,
                other => other.exit_code(),
            },
        }
    }

    /// Wrap this error with the step that was running when it occurred.
    pub fn in_step(self, step: usize, agent: impl Into<String>) -> Self {
        FlowError::StepFailed {
            step,
            agent: agent.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for chunkflow operations.
pub type Result<T> = std::result::Result<T, FlowError>;
