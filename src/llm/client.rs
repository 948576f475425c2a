//! Backend selection from run settings.

use super::credentials::{bedrock_api_key, caii_api_key};
use super::{BedrockClient, CaiiClient, RemoteCallError, TextGenerator};
use crate::config::{ClientSettings, ClientType};
use crate::error::{FlowError, Result};
use std::time::Duration;

/// The configured text-generation backend.
#[derive(Debug, Clone)]
pub enum LlmClient {
    Bedrock(BedrockClient),
    Caii(CaiiClient),
}

impl LlmClient {
    /// Build the backend named by `settings.client_type`, resolving its
    /// endpoint and credentials.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        if settings.model_id.trim().is_empty() {
            return Err(FlowError::InvalidConfiguration(
                "client.model_id must not be empty".to_string(),
            ));
        }
        let timeout = Duration::from_secs(settings.read_timeout_secs);

        let client = match settings.client_type {
            ClientType::Bedrock => {
                let endpoint = match settings.url.as_deref().filter(|u| !u.trim().is_empty()) {
                    Some(url) => url.to_string(),
                    None => {
                        let region = BedrockClient::resolve_region(settings.region.as_deref())
                            .ok_or_else(|| {
                                FlowError::InvalidConfiguration(
                                    "bedrock needs client.region, AWS_REGION or AWS_DEFAULT_REGION"
                                        .to_string(),
                                )
                            })?;
                        BedrockClient::regional_endpoint(&region)
                    }
                };
                let token = bedrock_api_key()?;
                LlmClient::Bedrock(BedrockClient::new(
                    &endpoint,
                    &settings.model_id,
                    token,
                    timeout,
                )?)
            }
            ClientType::Caii => {
                let url = settings
                    .url
                    .as_deref()
                    .filter(|u| !u.trim().is_empty())
                    .ok_or_else(|| {
                        FlowError::InvalidConfiguration(
                            "client.url is required for the caii client".to_string(),
                        )
                    })?;
                let api_key = caii_api_key(settings.jwt.as_deref())?;
                LlmClient::Caii(CaiiClient::new(
                    url,
                    &settings.model_id,
                    api_key,
                    settings.temperature,
                    timeout,
                )?)
            }
        };

        tracing::info!(
            client_type = %settings.client_type,
            model_id = %settings.model_id,
            "initialized text-generation client"
        );
        Ok(client)
    }
}

impl TextGenerator for LlmClient {
    fn generate(&self, prompt: &str, max_tokens: u32) -> std::result::Result<String, RemoteCallError> {
        match self {
            LlmClient::Bedrock(client) => client.generate(prompt, max_tokens),
            LlmClient::Caii(client) => client.generate(prompt, max_tokens),
        }
    }

    fn describe(&self) -> String {
        match self {
            LlmClient::Bedrock(client) => client.describe(),
            LlmClient::Caii(client) => client.describe(),
        }
    }
}
