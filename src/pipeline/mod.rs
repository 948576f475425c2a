//! Chunk-process-reassemble pipeline.
//!
//! A [`ChunkPipeline`] pushes one rendered prompt through a
//! [`TextGenerator`]. In [`CallMode::Chunked`] the prompt is split by the
//! [`Chunker`], each chunk is sent on its own (in order, one at a time, with
//! no context carried between chunks) and the results are joined with a blank
//! line. In [`CallMode::Direct`] the prompt is sent in a single call, either
//! rejected or truncated when it exceeds the size budget.
//!
//! The size budget is `2 × max_tokens` characters.

mod scratch;


pub use scratch::{RESULT_SEPARATOR, ScratchSpace};

use crate::chunker::{Chunker, OmittedSection, char_len};
use crate::error::{FlowError, Result};
use crate::llm::TextGenerator;
use std::path::PathBuf;
use std::sync::Arc;

/// Marker appended to a prompt cut down to the size budget in direct mode.
pub const TRUNCATION_MARKER: &str =
    "\n\n[INPUT TRUNCATED DUE TO LENGTH - ANALYSIS CONTINUES WITH AVAILABLE CONTENT]";

/// How a prompt is pushed to the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallMode {
    /// Split into chunks and call once per chunk.
    #[default]
    Chunked,
    /// One call with the whole prompt.
    Direct {
        /// Cut oversized prompts to the budget instead of failing.
        truncate: bool,
    },
}

/// Result of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    /// Final reassembled text.
    pub text: String,
    /// Number of generator calls made.
    pub chunk_count: usize,
    /// Sections dropped because their header did not fit the budget.
    pub omitted: Vec<OmittedSection>,
    /// Whether the prompt was truncated (direct mode only).
    pub truncated: bool,
}

/// Runs prompts through a shared text generator.
#[derive(Clone)]
pub struct ChunkPipeline {
    generator: Arc<dyn TextGenerator>,
    max_tokens: u32,
    mode: CallMode,
    scratch_root: Option<PathBuf>,
}

impl std::fmt::Debug for ChunkPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkPipeline")
            .field("generator", &self.generator.describe())
            .field("max_tokens", &self.max_tokens)
            .field("mode", &self.mode)
            .field("scratch_root", &self.scratch_root)
            .finish()
    }
}

impl ChunkPipeline {
    /// Create a pipeline around `generator`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `max_tokens` is zero.
    pub fn new(generator: Arc<dyn TextGenerator>, max_tokens: u32, mode: CallMode) -> Result<Self> {
        if max_tokens == 0 {
            return Err(FlowError::InvalidConfiguration(
                "max_tokens must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            generator,
            max_tokens,
            mode,
            scratch_root: None,
        })
    }

    /// Place scratch directories under `root` instead of the system temp dir.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Maximum characters per generator call.
    pub fn size_budget(&self) -> usize {
        2 * self.max_tokens as usize
    }

    /// Process one prompt according to the configured mode.
    pub fn process(&self, prompt: &str) -> Result<PipelineOutput> {
        match self.mode {
            CallMode::Chunked => self.process_chunked(prompt),
            CallMode::Direct { truncate } => self.process_direct(prompt, truncate),
        }
    }

    fn process_chunked(&self, prompt: &str) -> Result<PipelineOutput> {
        let chunker = Chunker::new(self.size_budget())?;
        let chunking = chunker.chunk(prompt);

        tracing::info!(
            chunks = chunking.len(),
            budget = chunker.budget(),
            prompt_chars = char_len(prompt),
            "processing prompt in chunks"
        );

        let text = self.run_chunks(&chunking.chunks)?;
        Ok(PipelineOutput {
            text,
            chunk_count: chunking.len(),
            omitted: chunking.omitted,
            truncated: false,
        })
    }

    /// Call the generator once per chunk, in order, and join the results.
    ///
    /// The first failing call aborts the whole invocation; staged results are
    /// discarded with the scratch directory.
    pub(crate) fn run_chunks(&self, chunks: &[String]) -> Result<String> {
        let mut scratch = ScratchSpace::create(self.scratch_root.as_deref())?;
        tracing::debug!(scratch = %scratch.path().display(), "staging chunk results");

        for (index, chunk) in chunks.iter().enumerate() {
            tracing::debug!(
                chunk = index + 1,
                of = chunks.len(),
                chars = char_len(chunk),
                "calling generator"
            );
            let result = self
                .generator
                .generate(chunk, self.max_tokens)
                .inspect_err(|e| {
                    tracing::warn!(
                        chunk = index + 1,
                        generator = %self.generator.describe(),
                        transient = e.is_transient(),
                        error = %e,
                        "generator call failed"
                    );
                })?;
            scratch.stage(index, &result)?;
        }

        scratch.collect()
    }

    fn process_direct(&self, prompt: &str, truncate: bool) -> Result<PipelineOutput> {
        let budget = self.size_budget();
        let chars = char_len(prompt);

        let (input, truncated) = if chars <= budget {
            (prompt.to_string(), false)
        } else if truncate {
            let kept: String = prompt.chars().take(budget).collect();
            tracing::warn!(
                original_chars = chars,
                kept_chars = budget,
                "input truncated to fit the size budget"
            );
            (format!("{}{}", kept, TRUNCATION_MARKER), true)
        } else {
            return Err(FlowError::InputTooLong {
                chars,
                max_chars: budget,
            });
        };

        tracing::info!(prompt_chars = char_len(&input), "processing prompt in a single call");
        let text = self.generator.generate(&input, self.max_tokens)?;
        Ok(PipelineOutput {
            text,
            chunk_count: 1,
            omitted: Vec::new(),
            truncated,
        })
    }
}
