//! Running an agent: render its prompt, then push it through the pipeline.

use super::AgentDefinition;
use super::prompt::{PROMPT_LAYOUT, PromptContext, render_template};
use crate::error::Result;
use crate::pipeline::{ChunkPipeline, PipelineOutput};
use std::path::Path;

/// A validated agent bound to a pipeline. Immutable once built.
#[derive(Debug, Clone)]
pub struct Agent {
    definition: AgentDefinition,
    pipeline: ChunkPipeline,
}

impl Agent {
    /// Bind `definition` to `pipeline`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the definition lacks a name or objective.
    pub fn new(definition: AgentDefinition, pipeline: ChunkPipeline) -> Result<Self> {
        definition.validate()?;
        Ok(Self {
            definition,
            pipeline,
        })
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Render the full prompt for `input`, with the output format taken from
    /// `output_path`'s suffix.
    pub fn render_prompt(&self, input: &str, output_path: &Path) -> Result<String> {
        let context = PromptContext::new(&self.definition, input, output_path);
        Ok(render_template(PROMPT_LAYOUT, &context.to_template_vars())?)
    }

    /// Render the prompt and run it through the pipeline.
    pub fn execute(&self, input: &str, output_path: &Path) -> Result<PipelineOutput> {
        let prompt = self.render_prompt(input, output_path)?;
        tracing::info!(
            agent = %self.definition.name,
            prompt_chars = prompt.chars().count(),
            "executing agent"
        );

        let output = self.pipeline.process(&prompt)?;
        tracing::info!(
            agent = %self.definition.name,
            response_chars = output.text.chars().count(),
            chunks = output.chunk_count,
            "agent finished"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{RemoteCallError, TextGenerator};
    use crate::pipeline::CallMode;
    use std::sync::Arc;

    fn echo_pipeline(max_tokens: u32) -> ChunkPipeline {
        let echo: Arc<dyn TextGenerator> =
            Arc::new(|prompt: &str, _max: u32| Ok::<_, RemoteCallError>(prompt.to_string()));
        ChunkPipeline::new(echo, max_tokens, CallMode::Direct { truncate: false }).unwrap()
    }

    fn summarizer() -> AgentDefinition {
        AgentDefinition {
            name: "summarizer".to_string(),
            objective: "Summarize the repository.".to_string(),
            description: Some("Writes short summaries".to_string()),
            core_responsibilities: vec!["Read every file".to_string(), "Be brief".to_string()],
            key_traits: vec!["concise".to_string(), "accurate".to_string()],
            input_sample: None,
            output_sample: Some("## file.py\nDoes X.".to_string()),
        }
    }

    #[test]
    fn test_invalid_definition_is_rejected() {
        let err = Agent::new(AgentDefinition::default(), echo_pipeline(100)).unwrap_err();
        assert!(err.to_string().contains("'name'"));
    }

    #[test]
    fn test_render_prompt_layout() {
        let agent = Agent::new(summarizer(), echo_pipeline(100)).unwrap();
        let prompt = agent
            .render_prompt("# File: a.py\n\nprint({1})", Path::new("out/summary.md"))
            .unwrap();

        let expected = "\
You are an AI agent with the following characteristics:
- Name: summarizer
- Description: Writes short summaries
- Key Traits: concise, accurate

Your primary objective is:
Summarize the repository.

Your core responsibilities are:
- Read every file
- Be brief

--- OUTPUT SAMPLE ---
Here is an example of the expected output format:
## file.py
Does X.
--- END OUTPUT SAMPLE ---

Based on the input data below, perform your task and generate the required output.
**Output Format Requirement:** Your final output must be formatted in Markdown.

--- INPUT DATA ---
# File: a.py

print({1})
--- END INPUT DATA ---

Generate your response now.
";
        assert_eq!(prompt, expected);
    }

    #[test]
    fn test_prompt_without_samples_and_json_output() {
        let definition = AgentDefinition {
            name: "extractor".to_string(),
            objective: "Extract entities.".to_string(),
            ..Default::default()
        };
        let agent = Agent::new(definition, echo_pipeline(100)).unwrap();
        let prompt = agent.render_prompt("text", Path::new("entities.JSON")).unwrap();

        assert!(!prompt.contains("SAMPLE"));
        assert!(prompt.contains("Your core responsibilities are:\n\n\nBased on"));
        assert!(prompt.contains("single, valid JSON object"));
    }

    #[test]
    fn test_execute_runs_pipeline() {
        let agent = Agent::new(summarizer(), echo_pipeline(10_000)).unwrap();
        let output = agent.execute("payload", Path::new("out.txt")).unwrap();

        assert_eq!(output.chunk_count, 1);
        assert!(output.text.contains("--- INPUT DATA ---\npayload\n"));
        assert!(output.text.contains("should be plain text"));
    }

    #[test]
    fn test_execute_propagates_size_errors() {
        let agent = Agent::new(summarizer(), echo_pipeline(10)).unwrap();
        let err = agent.execute("payload", Path::new("out.txt")).unwrap_err();
        assert!(matches!(err, crate::error::FlowError::InputTooLong { .. }));
    }
}
