//! RunConfig struct definition.

use super::types::{ClientSettings, PipelineSettings};
use serde::{Deserialize, Serialize};

/// Settings for one chunkflow run.
///
/// Loaded from an optional YAML file and then overridden by CLI flags.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Remote text-generation client settings.
    pub client: ClientSettings,

    /// Chunk pipeline settings.
    pub pipeline: PipelineSettings,
}
