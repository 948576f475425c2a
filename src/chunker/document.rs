//! Composite document parsing.
//!
//! A composite document is the concatenation of many source files, each
//! introduced by a marker line of the form `# File: <path>`. Text before the
//! first marker is kept as an unlabeled preamble section.

use regex::Regex;
use std::sync::LazyLock;

/// Label used for text that precedes the first section marker.
pub const PREAMBLE_LABEL: &str = "Unknown File (preamble)";

/// Matches a section marker line and captures the section label.
static SECTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# File: (.*)$").expect("Invalid section marker regex"));

/// One labeled (or unlabeled) unit of a composite document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Provenance of the section (the source file path), `None` for the preamble.
    pub label: Option<String>,
    /// Section body, trimmed at both ends.
    pub body: String,
}

impl Section {
    /// The header line a chunk carries for this section.
    pub fn header(&self) -> String {
        format!("File: {}", self.label.as_deref().unwrap_or(PREAMBLE_LABEL))
    }

    /// Render the section as `header + blank line + body`, or just the
    /// header when the body is empty.
    pub fn render(&self) -> String {
        if self.body.is_empty() {
            return self.header();
        }
        format!("{}\n\n{}", self.header(), self.body)
    }
}

/// An ordered sequence of sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    /// Parse a composite document into sections.
    ///
    /// The preamble is only kept when it is non-empty after trimming. Bodies
    /// are trimmed; labels are trimmed and may be empty.
    pub fn parse(text: &str) -> Self {
        let mut sections = Vec::new();
        let markers: Vec<_> = SECTION_MARKER.captures_iter(text).collect();

        let preamble_end = markers
            .first()
            .and_then(|caps| caps.get(0))
            .map_or(text.len(), |m| m.start());
        let preamble = text[..preamble_end].trim();
        if !preamble.is_empty() {
            sections.push(Section {
                label: None,
                body: preamble.to_string(),
            });
        }

        for (i, caps) in markers.iter().enumerate() {
            let (Some(whole), Some(label)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let body_end = markers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(text.len(), |m| m.start());

            sections.push(Section {
                label: Some(label.as_str().trim().to_string()),
                body: text[whole.end()..body_end].trim().to_string(),
            });
        }

        Self { sections }
    }

    /// The sections in document order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}
