//! Size-bounded packing of document sections into chunks.

use super::document::{Document, Section};
use crate::error::{FlowError, Result};

/// Separator placed between two whole sections sharing a chunk.
pub const SECTION_SEPARATOR: &str = "\n\n--------------------\n\n";

/// Marker emitted when a section header alone does not fit the budget.
pub const CONTENT_OMITTED_MARKER: &str = "[Content omitted: header too large for chunk size]";

/// Characters reserved for the blank lines around a split section's body.
const HEADER_OVERHEAD: usize = 4;

/// A degenerate chunk keeps `budget - 50` header characters, or the whole
/// budget when it is no larger than this.
const DEGENERATE_HEADER_SLACK: usize = 50;

/// A section whose body was dropped because its header alone exceeded the budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OmittedSection {
    /// The full (untruncated) section header.
    pub header: String,
    /// Number of body characters that were dropped.
    pub dropped_chars: usize,
    /// Index of the degenerate chunk emitted in place of the section.
    pub chunk_index: usize,
}

/// Ordered chunks produced from one document, plus any content-loss reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunking {
    pub chunks: Vec<String>,
    pub omitted: Vec<OmittedSection>,
}

impl Chunking {
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Splits composite documents into chunks no longer than a character budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    budget: usize,
}

impl Chunker {
    /// Create a chunker with the given budget in characters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `budget` is zero.
    pub fn new(budget: usize) -> Result<Self> {
        if budget == 0 {
            return Err(FlowError::InvalidConfiguration(
                "chunk size must be a positive integer".to_string(),
            ));
        }
        Ok(Self { budget })
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Parse and chunk a composite document.
    pub fn chunk(&self, text: &str) -> Chunking {
        self.chunk_document(&Document::parse(text))
    }

    /// Chunk an already-parsed document.
    ///
    /// Small sections are packed together (joined by [`SECTION_SEPARATOR`])
    /// until the next one would overflow the budget. A section whose rendered
    /// form exceeds the budget on its own flushes the accumulator and is split
    /// across as many chunks as needed, each repeating the section header.
    pub fn chunk_document(&self, document: &Document) -> Chunking {
        let mut out = Chunking::default();
        let mut current = String::new();
        let separator_len = char_len(SECTION_SEPARATOR);

        for section in document.sections() {
            let block = section.render();
            let block_len = char_len(&block);

            if block_len > self.budget {
                if !current.is_empty() {
                    out.chunks.push(std::mem::take(&mut current));
                }
                self.split_section(section, &mut out);
                continue;
            }

            if !current.is_empty() && char_len(&current) + separator_len + block_len > self.budget {
                out.chunks.push(std::mem::replace(&mut current, block));
            } else if current.is_empty() {
                current = block;
            } else {
                current.push_str(SECTION_SEPARATOR);
                current.push_str(&block);
            }
        }

        if !current.is_empty() {
            out.chunks.push(current);
        }

        out
    }

    /// Split one oversized section's body into header-prefixed chunks.
    fn split_section(&self, section: &Section, out: &mut Chunking) {
        let header = section.header();
        let body = section.body.as_str();

        let Some(available) = self
            .budget
            .checked_sub(char_len(&header) + HEADER_OVERHEAD)
            .filter(|&n| n > 0)
        else {
            let keep = match self.budget.checked_sub(DEGENERATE_HEADER_SLACK) {
                Some(n) if n > 0 => n,
                _ => self.budget,
            };
            let kept: String = header.chars().take(keep).collect();
            out.omitted.push(OmittedSection {
                header: header.clone(),
                dropped_chars: char_len(body),
                chunk_index: out.chunks.len(),
            });
            out.chunks
                .push(format!("{kept}...\n\n{CONTENT_OMITTED_MARKER}"));
            return;
        };

        let mut pos = 0;
        while pos < body.len() {
            let mut end = body[pos..]
                .char_indices()
                .nth(available)
                .map_or(body.len(), |(offset, _)| pos + offset);

            // Prefer cutting at the last newline so lines stay whole.
            if end < body.len()
                && let Some(newline) = body[pos..end].rfind('\n')
                && newline > 0
            {
                end = pos + newline;
            }

            let piece = body[pos..end].trim();
            if !piece.is_empty() {
                out.chunks.push(format!("{header}\n\n{piece}"));
            }
            pos = end;
        }
    }
}

/// Length in characters, the unit every budget is expressed in.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}
