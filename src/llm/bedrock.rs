//! Bedrock runtime backend for Anthropic models.

use super::types::{BedrockRequest, BedrockResponse};
use super::{RemoteCallError, TextGenerator, read_json, trim_base_url};
use reqwest::Url;
use reqwest::blocking::Client;
use std::time::Duration;

/// Environment variables consulted, in order, when no region is configured.
pub const REGION_ENV_VARS: [&str; 2] = ["AWS_REGION", "AWS_DEFAULT_REGION"];

/// Client for `POST {endpoint}/model/{model_id}/invoke`.
#[derive(Debug, Clone)]
pub struct BedrockClient {
    http: Client,
    endpoint: Url,
    model_id: String,
    token: String,
}

impl BedrockClient {
    /// Build a client against an explicit endpoint.
    pub fn new(
        endpoint: &str,
        model_id: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteCallError> {
        let endpoint = Url::parse(&trim_base_url(endpoint)).map_err(|e| {
            RemoteCallError::Provider(format!("invalid bedrock endpoint '{}': {}", endpoint, e))
        })?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint,
            model_id: model_id.into(),
            token: token.into(),
        })
    }

    /// Public runtime endpoint for a region.
    pub fn regional_endpoint(region: &str) -> String {
        format!("https://bedrock-runtime.{}.amazonaws.com", region.trim())
    }

    /// Resolve the region from an explicit value or the AWS environment.
    pub fn resolve_region(explicit: Option<&str>) -> Option<String> {
        if let Some(region) = explicit.filter(|r| !r.trim().is_empty()) {
            return Some(region.trim().to_string());
        }
        REGION_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty())
    }

    /// `{endpoint}/model/{model_id}/invoke`, with the model id encoded as a
    /// single path segment (inference profile ARNs contain `/`).
    fn invoke_url(&self) -> Result<Url, RemoteCallError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                RemoteCallError::Provider(format!(
                    "bedrock endpoint '{}' cannot take a path",
                    self.endpoint
                ))
            })?
            .pop_if_empty()
            .extend(["model", self.model_id.as_str(), "invoke"]);
        Ok(url)
    }
}

impl TextGenerator for BedrockClient {
    fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, RemoteCallError> {
        let request = BedrockRequest::new(prompt, max_tokens);
        tracing::debug!(
            model_id = %self.model_id,
            prompt_chars = prompt.chars().count(),
            max_tokens,
            "invoking bedrock model"
        );

        let response = self
            .http
            .post(self.invoke_url()?)
            .bearer_auth(&self.token)
            .header("accept", "application/json")
            .json(&request)
            .send()?;

        let body: BedrockResponse = read_json(response)?;
        body.first_text().ok_or_else(|| {
            RemoteCallError::MalformedResponse("response has no text content block".to_string())
        })
    }

    fn describe(&self) -> String {
        format!("bedrock:{}", self.model_id)
    }
}
