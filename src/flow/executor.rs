//! Sequential step execution.

use super::config::{FlowConfig, StepDefinition};
use crate::agent::Agent;
use crate::chunker::OmittedSection;
use crate::error::{FlowError, Result};
use crate::events::{Event, EventAction, EventLog};
use crate::fs::atomic_write_file;
use crate::pipeline::ChunkPipeline;
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Outcome of one completed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// 1-based step index.
    pub step: usize,
    pub agent: String,
    pub output: PathBuf,
    pub chars_written: usize,
    pub chunk_count: usize,
    pub omitted: usize,
    pub duration: Duration,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub steps: Vec<StepReport>,
    pub duration: Duration,
}

impl RunReport {
    pub fn total_chunks(&self) -> usize {
        self.steps.iter().map(|s| s.chunk_count).sum()
    }

    pub fn total_omitted(&self) -> usize {
        self.steps.iter().map(|s| s.omitted).sum()
    }
}

/// Runs a flow's steps strictly in order, stopping at the first failure.
///
/// Outputs of steps that completed before a failure stay on disk.
#[derive(Debug)]
pub struct FlowExecutor {
    steps: Vec<StepDefinition>,
    agents: HashMap<String, Agent>,
    size_budget: usize,
    fail_on_content_loss: bool,
    events: Option<EventLog>,
}

impl FlowExecutor {
    /// Build every agent in `config` around a clone of `pipeline`.
    pub fn new(config: FlowConfig, pipeline: ChunkPipeline) -> Result<Self> {
        config.validate()?;

        let size_budget = pipeline.size_budget();
        let mut agents = HashMap::with_capacity(config.agents.len());
        for definition in config.agents {
            let agent = Agent::new(definition, pipeline.clone())?;
            agents.insert(agent.name().to_string(), agent);
        }

        Ok(Self {
            steps: config.dag_flow,
            agents,
            size_budget,
            fail_on_content_loss: false,
            events: None,
        })
    }

    /// Append run events to `log`.
    pub fn with_event_log(mut self, log: EventLog) -> Self {
        self.events = Some(log);
        self
    }

    /// Treat a dropped section as a step failure instead of a warning.
    pub fn fail_on_content_loss(mut self, fail: bool) -> Self {
        self.fail_on_content_loss = fail;
        self
    }

    /// Execute every step in order.
    pub fn run(&self) -> Result<RunReport> {
        let started = Instant::now();
        tracing::info!(steps = self.steps.len(), "starting flow");
        self.record(Event::new(EventAction::RunStart).with_details(json!({
            "steps": self.steps.len(),
        })));

        let mut report = RunReport::default();
        for (index, step) in self.steps.iter().enumerate() {
            let n = index + 1;
            match self.run_step(n, step) {
                Ok(step_report) => report.steps.push(step_report),
                Err(e) => {
                    tracing::error!(step = n, agent = %step.agent, error = %e, "step failed, stopping flow");
                    self.record(
                        Event::new(EventAction::StepFailed)
                            .for_step(n, &step.agent)
                            .with_details(json!({ "error": e.to_string() })),
                    );
                    self.record(Event::new(EventAction::RunFailed).with_details(json!({
                        "failed_step": n,
                        "completed_steps": report.steps.len(),
                    })));
                    return Err(e);
                }
            }
        }

        report.duration = started.elapsed();
        tracing::info!(
            steps = report.steps.len(),
            elapsed_ms = report.duration.as_millis() as u64,
            "flow complete"
        );
        self.record(Event::new(EventAction::RunComplete).with_details(json!({
            "steps": report.steps.len(),
            "chunks": report.total_chunks(),
            "omitted_sections": report.total_omitted(),
        })));
        Ok(report)
    }

    fn run_step(&self, n: usize, step: &StepDefinition) -> Result<StepReport> {
        let started = Instant::now();

        let agent = self
            .agents
            .get(&step.agent)
            .ok_or_else(|| FlowError::UnknownAgent {
                step: n,
                agent: step.agent.clone(),
                available: self.available_agents(),
            })?;

        tracing::info!(
            step = n,
            agent = %step.agent,
            input = %step.input.display(),
            output = %step.output.display(),
            "executing step"
        );
        self.record(Event::new(EventAction::StepStart).for_step(n, &step.agent));

        if !step.input.exists() {
            return Err(FlowError::MissingInput {
                step: n,
                agent: step.agent.clone(),
                path: step.input.clone(),
            });
        }
        let input = std::fs::read_to_string(&step.input).map_err(|e| {
            FlowError::Io(format!(
                "failed to read input '{}': {}",
                step.input.display(),
                e
            ))
            .in_step(n, &step.agent)
        })?;

        let output = agent
            .execute(&input, &step.output)
            .map_err(|e| e.in_step(n, &step.agent))?;

        self.report_content_loss(n, step, &output.omitted)?;

        atomic_write_file(&step.output, &output.text).map_err(|e| e.in_step(n, &step.agent))?;

        let report = StepReport {
            step: n,
            agent: step.agent.clone(),
            output: step.output.clone(),
            chars_written: output.text.chars().count(),
            chunk_count: output.chunk_count,
            omitted: output.omitted.len(),
            duration: started.elapsed(),
        };

        tracing::info!(
            step = n,
            agent = %step.agent,
            chars = report.chars_written,
            output = %step.output.display(),
            "step complete"
        );
        self.record(
            Event::new(EventAction::StepComplete)
                .for_step(n, &step.agent)
                .with_details(json!({
                    "output": step.output.display().to_string(),
                    "chars_written": report.chars_written,
                    "chunks": report.chunk_count,
                    "truncated": output.truncated,
                    "duration_ms": report.duration.as_millis() as u64,
                })),
        );

        Ok(report)
    }

    fn report_content_loss(
        &self,
        n: usize,
        step: &StepDefinition,
        omitted: &[OmittedSection],
    ) -> Result<()> {
        for section in omitted {
            tracing::warn!(
                step = n,
                agent = %step.agent,
                section = %section.header,
                dropped_chars = section.dropped_chars,
                budget = self.size_budget,
                "section header exceeds chunk budget, content omitted"
            );
            self.record(
                Event::new(EventAction::ContentLoss)
                    .for_step(n, &step.agent)
                    .with_details(json!({
                        "section": section.header,
                        "dropped_chars": section.dropped_chars,
                        "chunk_index": section.chunk_index,
                        "budget": self.size_budget,
                    })),
            );
        }

        match omitted.first() {
            Some(first) if self.fail_on_content_loss => Err(FlowError::OversizedContentLoss {
                label: first.header.clone(),
                budget: self.size_budget,
            }
            .in_step(n, &step.agent)),
            _ => Ok(()),
        }
    }

    fn available_agents(&self) -> String {
        let mut names: Vec<&str> = self.agents.keys().map(String::as_str).collect();
        names.sort_unstable();
        names.join(", ")
    }

    fn record(&self, event: Event) {
        if let Some(log) = &self.events {
            log.record(event);
        }
    }
}
