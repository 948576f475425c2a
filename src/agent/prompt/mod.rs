//! Prompt rendering for agents.
//!
//! This module provides:
//!
//! - **Template**: `{variable}` substitution engine
//! - **Context**: agent fields and input formatted as template variables
//! - **Layout**: the fixed prompt text and output-format instructions
//!
//! Use `{{` to escape and render a literal `{`.

mod context;
mod layout;
mod template;

pub use context::PromptContext;
pub use layout::{OutputFormat, PROMPT_LAYOUT};
pub use template::{TemplateError, render_template};
