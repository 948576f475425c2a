//! Text-generation backends.
//!
//! The pipeline only sees [`TextGenerator`]: given a prompt and a token
//! limit, return generated text or a [`RemoteCallError`]. Two HTTP backends
//! implement it:
//!
//! - [`BedrockClient`] posts Anthropic messages to the Bedrock runtime
//!   `invoke` endpoint.
//! - [`CaiiClient`] posts to an OpenAI-compatible `chat/completions` endpoint.
//!
//! [`LlmClient`] picks one from [`ClientSettings`](crate::config::ClientSettings).
//! Calls are blocking and are not retried here.

mod bedrock;
mod caii;
mod client;
pub mod credentials;
mod error;
pub mod types;

pub use bedrock::BedrockClient;
pub use caii::CaiiClient;
pub use client::LlmClient;
pub use error::RemoteCallError;

/// A remote text-generation service.
///
/// Implementations must be shareable across threads; a single generator
/// serves every agent in a flow.
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`, producing at most `max_tokens` tokens.
    fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, RemoteCallError>;

    /// Short human-readable description used in logs.
    fn describe(&self) -> String {
        "text generator".to_string()
    }
}

impl<F> TextGenerator for F
where
    F: Fn(&str, u32) -> Result<String, RemoteCallError> + Send + Sync,
{
    fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, RemoteCallError> {
        self(prompt, max_tokens)
    }
}

/// Turn a blocking HTTP response into its JSON body, mapping non-2xx
/// statuses to [`RemoteCallError::Status`].
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::blocking::Response,
) -> Result<T, RemoteCallError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .unwrap_or_else(|_| "failed to read error response".to_string());
        return Err(RemoteCallError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text()?;
    serde_json::from_str(&body)
        .map_err(|e| RemoteCallError::MalformedResponse(format!("invalid JSON body: {}", e)))
}

/// Strip a trailing slash so paths can be appended with `format!`.
pub(crate) fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
