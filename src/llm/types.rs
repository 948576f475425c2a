//! Wire types for the two backends.

use serde::{Deserialize, Serialize};

/// Anthropic message format version the Bedrock runtime expects.
pub const BEDROCK_ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for Bedrock `invoke` on an Anthropic model.
#[derive(Debug, Serialize)]
pub struct BedrockRequest {
    pub anthropic_version: &'static str,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
}

impl BedrockRequest {
    pub fn new(prompt: &str, max_tokens: u32) -> Self {
        Self {
            anthropic_version: BEDROCK_ANTHROPIC_VERSION,
            max_tokens,
            messages: vec![ChatMessage::user(prompt)],
        }
    }
}

/// A content block in a Bedrock response.
#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(default)]
    pub text: Option<String>,
}

/// Response body from Bedrock `invoke`.
#[derive(Debug, Deserialize)]
pub struct BedrockResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl BedrockResponse {
    /// Text of the first content block.
    pub fn first_text(self) -> Option<String> {
        self.content.into_iter().next().and_then(|block| block.text)
    }
}

/// Request body for an OpenAI-compatible `chat/completions` call.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Error object some gateways return in a 2xx body.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

/// Response body from `chat/completions`.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,

    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

impl ChatCompletionResponse {
    /// Content of the first choice.
    pub fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}
