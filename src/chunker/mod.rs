//! Bounded-size chunker for composite documents.
//!
//! This module provides:
//!
//! - **Document**: parsing a composite text (many files joined with
//!   `# File: <path>` marker lines) into ordered sections
//! - **Packer**: packing sections into chunks that never exceed a character
//!   budget, splitting oversized sections at line boundaries
//!
//! # Guarantees
//!
//! Every chunk is at most `budget` characters long, except the degenerate case
//! where a section header alone cannot fit; that section is replaced by a
//! truncated header and [`CONTENT_OMITTED_MARKER`], and reported in
//! [`Chunking::omitted`]. Chunk order follows section order, and a split
//! section's pieces follow the original byte order without overlap.

mod document;
mod packer;


pub use document::{Document, PREAMBLE_LABEL, Section};
pub use packer::{
    CONTENT_OMITTED_MARKER, Chunker, Chunking, OmittedSection, SECTION_SEPARATOR,
};
pub(crate) use packer::char_len;
