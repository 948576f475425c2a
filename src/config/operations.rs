//! Run settings loading, validation, and derived values.

use super::model::RunConfig;
use super::types::ClientType;
use crate::error::{FlowError, Result};
use crate::pipeline::CallMode;
use std::path::Path;

impl RunConfig {
    /// Load run settings from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            FlowError::Io(format!(
                "failed to read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse run settings from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: RunConfig = serde_yaml::from_str(yaml).map_err(|e| {
            FlowError::InvalidConfiguration(format!("failed to parse settings YAML: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate settings values.
    ///
    /// Validation rules:
    /// - `client.max_tokens` must be positive
    /// - `client.read_timeout_secs` must be positive
    /// - `client.temperature` must be within 0.0..=2.0
    pub fn validate(&self) -> Result<()> {
        let client = &self.client;

        if client.max_tokens == 0 {
            return Err(FlowError::InvalidConfiguration(
                "client.max_tokens must be greater than 0".to_string(),
            ));
        }

        if client.read_timeout_secs == 0 {
            return Err(FlowError::InvalidConfiguration(
                "client.read_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&client.temperature) {
            return Err(FlowError::InvalidConfiguration(format!(
                "client.temperature must be between 0.0 and 2.0 (found {})",
                client.temperature
            )));
        }

        Ok(())
    }

    /// Validate that the selected backend has everything it needs to connect.
    ///
    /// Kept apart from [`validate`](Self::validate) so a settings file may
    /// leave `client.url` to a CLI override.
    pub fn validate_client(&self) -> Result<()> {
        let client = &self.client;

        if client.client_type == ClientType::Caii
            && client.url.as_deref().is_none_or(|u| u.trim().is_empty())
        {
            return Err(FlowError::InvalidConfiguration(
                "client.url is required for the caii client".to_string(),
            ));
        }

        if client.model_id.trim().is_empty() {
            return Err(FlowError::InvalidConfiguration(
                "client.model_id must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Largest prompt, in characters, a single call accepts: `2 × max_tokens`.
    pub fn max_input_chars(&self) -> usize {
        2 * self.client.max_tokens as usize
    }

    /// How prompts are pushed through the pipeline.
    pub fn call_mode(&self) -> CallMode {
        if self.pipeline.use_chunks {
            CallMode::Chunked
        } else {
            CallMode::Direct {
                truncate: self.pipeline.truncate_input,
            }
        }
    }
}
