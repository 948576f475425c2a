//! Agent definitions as they appear in a flow file.

use crate::error::{FlowError, Result};
use serde::{Deserialize, Serialize};

/// A structured agent definition.
///
/// ```yaml
/// - name: code_summarizer
///   objective: Summarize each source file.
///   description: Reads code and writes concise notes.
///   core_responsibilities:
///     - Describe what each file does
///   key_traits: [concise, accurate]
///   input_sample: "# File: main.py ..."
///   output_sample: "## main.py ..."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDefinition {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub objective: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub core_responsibilities: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_traits: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_sample: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_sample: Option<String>,
}

impl AgentDefinition {
    /// Check the required fields are present.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FlowError::InvalidConfiguration(
                "agent definition is missing required field 'name'".to_string(),
            ));
        }
        if self.objective.trim().is_empty() {
            return Err(FlowError::InvalidConfiguration(format!(
                "agent '{}' is missing required field 'objective'",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_definition() {
        let yaml = r#"
name: reviewer
objective: Review the summary.
description: Careful reader
core_responsibilities:
  - Find gaps
  - Suggest fixes
key_traits: [thorough, direct]
input_sample: "summary text"
output_sample: '{"issues": []}'
"#;
        let def: AgentDefinition = serde_yaml::from_str(yaml).unwrap();
        def.validate().unwrap();

        assert_eq!(def.name, "reviewer");
        assert_eq!(def.core_responsibilities, vec!["Find gaps", "Suggest fixes"]);
        assert_eq!(def.key_traits, vec!["thorough", "direct"]);
        assert_eq!(def.output_sample.as_deref(), Some(r#"{"issues": []}"#));
    }

    #[test]
    fn test_missing_name_is_invalid() {
        let def: AgentDefinition = serde_yaml::from_str("objective: do it").unwrap();
        let err = def.validate().unwrap_err();
        assert!(err.to_string().contains("'name'"));
    }

    #[test]
    fn test_blank_objective_is_invalid() {
        let def = AgentDefinition {
            name: "writer".to_string(),
            objective: "  ".to_string(),
            ..Default::default()
        };
        let err = def.validate().unwrap_err();
        assert!(matches!(err, FlowError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("agent 'writer'"));
    }
}
