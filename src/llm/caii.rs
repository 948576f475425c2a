//! OpenAI-compatible inference backend.

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use super::{RemoteCallError, TextGenerator, read_json, trim_base_url};
use reqwest::blocking::Client;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CaiiClient {
    http: Client,
    base_url: String,
    model_id: String,
    api_key: String,
    temperature: f32,
}

impl CaiiClient {
    pub fn new(
        base_url: &str,
        model_id: impl Into<String>,
        api_key: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, RemoteCallError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: trim_base_url(base_url),
            model_id: model_id.into(),
            api_key: api_key.into(),
            temperature,
        })
    }
}

impl TextGenerator for CaiiClient {
    fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, RemoteCallError> {
        let request = ChatCompletionRequest {
            model: self.model_id.clone(),
            messages: vec![ChatMessage::user(prompt)],
            max_tokens,
            temperature: self.temperature,
        };
        tracing::debug!(
            model_id = %self.model_id,
            prompt_chars = prompt.chars().count(),
            max_tokens,
            "calling chat completions"
        );

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        let body: ChatCompletionResponse = read_json(response)?;
        if let Some(error) = body.error {
            return Err(RemoteCallError::Provider(error.message));
        }
        body.first_content().ok_or_else(|| {
            RemoteCallError::MalformedResponse("response has no message content".to_string())
        })
    }

    fn describe(&self) -> String {
        format!("caii:{}", self.model_id)
    }
}
