//! Values substituted into the prompt layout.

use super::layout::{OutputFormat, input_sample_section, output_sample_section};
use super::template::vars;
use crate::agent::AgentDefinition;
use std::collections::HashMap;
use std::path::Path;

/// Everything one prompt needs, already formatted as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptContext {
    pub name: String,
    pub description: String,
    pub key_traits: String,
    pub objective: String,
    /// One `- item` line per responsibility.
    pub responsibilities: String,
    pub input_sample_section: String,
    pub output_sample_section: String,
    pub output_format: String,
    pub input: String,
}

impl PromptContext {
    pub fn new(definition: &AgentDefinition, input: &str, output_path: &Path) -> Self {
        let responsibilities = definition
            .core_responsibilities
            .iter()
            .map(|r| format!("- {}", r))
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            name: definition.name.clone(),
            description: definition.description.clone().unwrap_or_default(),
            key_traits: definition.key_traits.join(", "),
            objective: definition.objective.clone(),
            responsibilities,
            input_sample_section: input_sample_section(definition.input_sample.as_deref()),
            output_sample_section: output_sample_section(definition.output_sample.as_deref()),
            output_format: OutputFormat::from_path(output_path).instruction().to_string(),
            input: input.to_string(),
        }
    }

    pub fn to_template_vars(&self) -> HashMap<String, String> {
        vars([
            ("name", self.name.as_str()),
            ("description", self.description.as_str()),
            ("key_traits", self.key_traits.as_str()),
            ("objective", self.objective.as_str()),
            ("responsibilities", self.responsibilities.as_str()),
            ("input_sample_section", self.input_sample_section.as_str()),
            ("output_sample_section", self.output_sample_section.as_str()),
            ("output_format", self.output_format.as_str()),
            ("input", self.input.as_str()),
        ])
    }
}
