//! Configuration types and defaults for chunkflow.
//!
//! This module defines enums, constants, and default value functions
//! used by the run settings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which text-generation backend serves the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClientType {
    /// OpenAI-compatible inference endpoint (default).
    #[default]
    Caii,
    /// Anthropic models behind the Bedrock runtime `invoke` API.
    Bedrock,
}

impl ClientType {
    /// Parse a client type from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "caii" => Some(Self::Caii),
            "bedrock" => Some(Self::Bedrock),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Caii => "caii",
            Self::Bedrock => "bedrock",
        }
    }
}

impl std::fmt::Display for ClientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for the remote text-generation client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Backend selection.
    pub client_type: ClientType,

    /// Model identifier passed to the backend.
    pub model_id: String,

    /// Endpoint override (required for caii).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Bedrock region; falls back to `AWS_REGION` then `AWS_DEFAULT_REGION`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Maximum output tokens per call. Twice this value is the chunk budget in characters.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature (caii only).
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Whole-request timeout for one call.
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,

    /// JWT document (`{"token": "..."}`) for caii; `CDP_TOKEN` is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt: Option<String>,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            client_type: ClientType::default(),
            model_id: String::new(),
            url: None,
            region: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            read_timeout_secs: default_read_timeout_secs(),
            jwt: None,
            extra: BTreeMap::new(),
        }
    }
}

/// Settings for how prompts are pushed through the chunk pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Split prompts into chunks and call the service once per chunk.
    #[serde(default = "default_true")]
    pub use_chunks: bool,

    /// In direct mode, truncate oversized prompts instead of failing.
    pub truncate_input: bool,

    /// Fail the step when a section had to be dropped.
    pub fail_on_content_loss: bool,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            use_chunks: true,
            truncate_input: false,
            fail_on_content_loss: false,
            extra: BTreeMap::new(),
        }
    }
}

// Default value functions for serde
pub(crate) fn default_max_tokens() -> u32 {
    64_000
}
pub(crate) fn default_temperature() -> f32 {
    0.1
}
pub(crate) fn default_read_timeout_secs() -> u64 {
    36_000
}
pub(crate) fn default_true() -> bool {
    true
}
