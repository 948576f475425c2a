//! The fixed agent prompt layout and output-format instructions.

use std::path::Path;

/// Prompt layout rendered for every agent call.
pub const PROMPT_LAYOUT: &str = "\
You are an AI agent with the following characteristics:
- Name: {name}
- Description: {description}
- Key Traits: {key_traits}

Your primary objective is:
{objective}

Your core responsibilities are:
{responsibilities}
{input_sample_section}{output_sample_section}
Based on the input data below, perform your task and generate the required output.
**Output Format Requirement:** {output_format}

--- INPUT DATA ---
{input}
--- END INPUT DATA ---

Generate your response now.
";

/// Output format requested from the model, chosen by output file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    PlainText,
}

impl OutputFormat {
    /// `.json` and `.md` (any case) select structured formats; anything else is plain text.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Self::Json,
            Some("md") => Self::Markdown,
            _ => Self::PlainText,
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Json => {
                "Your final output must be a single, valid JSON object and nothing else."
            }
            Self::Markdown => "Your final output must be formatted in Markdown.",
            Self::PlainText => "Your final output should be plain text.",
        }
    }
}

/// The optional input sample block, empty when the sample is blank.
pub fn input_sample_section(sample: Option<&str>) -> String {
    sample_section(
        sample,
        "INPUT SAMPLE",
        "Here is an example of the type of input you might receive:",
    )
}

/// The optional output sample block, empty when the sample is blank.
pub fn output_sample_section(sample: Option<&str>) -> String {
    sample_section(
        sample,
        "OUTPUT SAMPLE",
        "Here is an example of the expected output format:",
    )
}

fn sample_section(sample: Option<&str>, title: &str, lead: &str) -> String {
    match sample.map(str::trim).filter(|s| !s.is_empty()) {
        Some(sample) => format!("\n--- {title} ---\n{lead}\n{sample}\n--- END {title} ---\n"),
        None => String::new(),
    }
}
