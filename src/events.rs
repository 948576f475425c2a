//! Run event log.
//!
//! Events are appended to an NDJSON file (one JSON object per line) named
//! with `--events`. The log is an audit trail for a run: which steps started,
//! finished or failed, and where content was lost.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: `run_start`, `step_start`, `step_complete`, `step_failed`,
//!   `content_loss`, `run_complete` or `run_failed`
//! - `actor`: `user@HOST`
//! - `step` / `agent`: present for step-scoped events
//! - `details`: freeform object with action-specific fields

use crate::error::{FlowError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    RunStart,
    StepStart,
    StepComplete,
    StepFailed,
    /// A section's body was dropped because its header did not fit a chunk.
    ContentLoss,
    RunComplete,
    RunFailed,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventAction::RunStart => "run_start",
            EventAction::StepStart => "step_start",
            EventAction::StepComplete => "step_complete",
            EventAction::StepFailed => "step_failed",
            EventAction::ContentLoss => "content_loss",
            EventAction::RunComplete => "run_complete",
            EventAction::RunFailed => "run_failed",
        };
        f.write_str(s)
    }
}

/// An event record for the run log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,

    pub action: EventAction,

    /// The actor running the flow (e.g., `user@HOST`).
    pub actor: String,

    /// 1-based step index for step-scoped events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    pub details: Value,
}

impl Event {
    /// Create a new event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor_string(),
            step: None,
            agent: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Scope this event to a step.
    pub fn for_step(mut self, step: usize, agent: impl Into<String>) -> Self {
        self.step = Some(step);
        self.agent = Some(agent.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| FlowError::Io(format!("failed to serialize event to JSON: {}", e)))
    }
}

fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append-only NDJSON event file.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event as a line, creating the file and its parent
    /// directory if needed.
    pub fn append(&self, event: &Event) -> Result<()> {
        let line = event.to_ndjson_line()?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                FlowError::Io(format!(
                    "failed to create events directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                FlowError::Io(format!(
                    "failed to open events file '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        writeln!(file, "{}", line).map_err(|e| {
            FlowError::Io(format!(
                "failed to write event to '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Append an event, downgrading any failure to a warning.
    pub fn record(&self, event: Event) {
        if let Err(e) = self.append(&event) {
            tracing::warn!(action = %event.action, error = %e, "failed to record run event");
        }
    }
}
