//! Flow definition file.

use crate::agent::AgentDefinition;
use crate::error::{FlowError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// One step: run `agent` on the contents of `input`, write the result to `output`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepDefinition {
    pub agent: String,
    pub input: PathBuf,
    pub output: PathBuf,
}

/// A flow file: ordered steps plus the agents they use.
///
/// ```yaml
/// dag_flow:
///   - agent: summarizer
///     input: context/repo.md
///     output: out/summary.md
/// agents:
///   - name: summarizer
///     objective: Summarize the repository.
/// ```
///
/// Despite the `dag_flow` key, steps run as a plain ordered list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub dag_flow: Vec<StepDefinition>,

    pub agents: Vec<AgentDefinition>,

    /// Unknown top-level keys preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl FlowConfig {
    /// Load and validate a flow file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            FlowError::InvalidConfiguration(format!(
                "failed to read flow file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate a flow definition.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: FlowConfig = serde_yaml::from_str(yaml).map_err(|e| {
            FlowError::InvalidConfiguration(format!("failed to parse flow YAML: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validation rules:
    /// - `dag_flow` and `agents` are both present and non-empty
    /// - every agent has a `name` and an `objective`, and names are unique
    /// - every step names an agent, an input and an output
    ///
    /// Steps referencing undefined agents are not rejected here; the executor
    /// reports them as `UnknownAgent` when the step is reached.
    pub fn validate(&self) -> Result<()> {
        if self.dag_flow.is_empty() {
            return Err(FlowError::InvalidConfiguration(
                "flow definition must contain a non-empty 'dag_flow' list".to_string(),
            ));
        }
        if self.agents.is_empty() {
            return Err(FlowError::InvalidConfiguration(
                "flow definition must contain a non-empty 'agents' list".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for agent in &self.agents {
            agent.validate()?;
            if !seen.insert(agent.name.as_str()) {
                return Err(FlowError::InvalidConfiguration(format!(
                    "agent '{}' is defined more than once",
                    agent.name
                )));
            }
        }

        for (index, step) in self.dag_flow.iter().enumerate() {
            let n = index + 1;
            if step.agent.trim().is_empty() {
                return Err(FlowError::InvalidConfiguration(format!(
                    "step {} is missing required field 'agent'",
                    n
                )));
            }
            if step.input.as_os_str().is_empty() {
                return Err(FlowError::InvalidConfiguration(format!(
                    "step {} ({}) is missing required field 'input'",
                    n, step.agent
                )));
            }
            if step.output.as_os_str().is_empty() {
                return Err(FlowError::InvalidConfiguration(format!(
                    "step {} ({}) is missing required field 'output'",
                    n, step.agent
                )));
            }
        }

        Ok(())
    }

    /// Agent names in definition order.
    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name.as_str()).collect()
    }

    /// Steps (1-based index, agent name) whose agent is not defined.
    pub fn unknown_agent_references(&self) -> Vec<(usize, &str)> {
        let known: HashSet<&str> = self.agent_names().into_iter().collect();
        self.dag_flow
            .iter()
            .enumerate()
            .filter(|(_, step)| !known.contains(step.agent.as_str()))
            .map(|(i, step)| (i + 1, step.agent.as_str()))
            .collect()
    }

    /// Inputs that must exist before the run starts: those not produced as
    /// the output of an earlier step.
    pub fn external_inputs(&self) -> Vec<(usize, &Path)> {
        let mut produced: HashSet<&Path> = HashSet::new();
        let mut external = Vec::new();
        for (i, step) in self.dag_flow.iter().enumerate() {
            if !produced.contains(step.input.as_path()) {
                external.push((i + 1, step.input.as_path()));
            }
            produced.insert(step.output.as_path());
        }
        external
    }
}
