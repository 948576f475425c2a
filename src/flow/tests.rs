//! Tests for flow definitions and the step executor.

use super::*;
use crate::error::FlowError;
use crate::events::{Event, EventAction, EventLog};
use crate::exit_codes;
use crate::llm::{RemoteCallError, TextGenerator};
use crate::pipeline::{CallMode, ChunkPipeline};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Answers with `<agent name>: <n chars>` and fails for agents named `broken`.
struct FakeService {
    calls: Mutex<Vec<String>>,
}

impl FakeService {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
        })
    }

    fn agents_called(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl TextGenerator for FakeService {
    fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String, RemoteCallError> {
        let name = prompt
            .lines()
            .find_map(|l| l.strip_prefix("- Name: "))
            .unwrap_or("?")
            .to_string();
        self.calls.lock().unwrap().push(name.clone());
        if name == "broken" {
            return Err(RemoteCallError::Status {
                status: 400,
                body: "prompt rejected".to_string(),
            });
        }
        Ok(format!("{} saw {} chars", name, prompt.chars().count()))
    }
}

fn pipeline(service: Arc<FakeService>, mode: CallMode) -> ChunkPipeline {
    ChunkPipeline::new(service, 50_000, mode).unwrap()
}

fn three_step_flow(dir: &Path, second_agent: &str) -> FlowConfig {
    let yaml = format!(
        r#"
dag_flow:
  - agent: summarizer
    input: {d}/repo.md
    output: {d}/out/summary.md
  - agent: {second}
    input: {d}/out/summary.md
    output: {d}/out/review.json
  - agent: writer
    input: {d}/out/review.json
    output: {d}/out/final.txt
agents:
  - name: summarizer
    objective: Summarize.
  - name: reviewer
    objective: Review.
  - name: broken
    objective: Always fails.
  - name: writer
    objective: Write.
"#,
        d = dir.display(),
        second = second_agent
    );
    FlowConfig::from_yaml(&yaml).unwrap()
}

fn seed_input(dir: &Path) {
    fs::write(dir.join("repo.md"), "# File: a.py\n\nprint(1)\n").unwrap();
}

// =========================================================================
// FlowConfig
// =========================================================================

#[test]
fn test_parse_flow() {
    let config = FlowConfig::from_yaml(
        r#"
dag_flow:
  - agent: a
    input: in.md
    output: out.md
agents:
  - name: a
    objective: Do a.
    key_traits: [fast]
"#,
    )
    .unwrap();

    assert_eq!(config.dag_flow.len(), 1);
    assert_eq!(config.dag_flow[0].input, Path::new("in.md"));
    assert_eq!(config.agent_names(), vec!["a"]);
}

#[test]
fn test_missing_lists_are_invalid() {
    let err = FlowConfig::from_yaml("agents:\n  - name: a\n    objective: x\n").unwrap_err();
    assert!(err.to_string().contains("'dag_flow'"));

    let err =
        FlowConfig::from_yaml("dag_flow:\n  - agent: a\n    input: i\n    output: o\n").unwrap_err();
    assert!(err.to_string().contains("'agents'"));

    let err = FlowConfig::from_yaml("dag_flow: []\nagents: []\n").unwrap_err();
    assert!(matches!(err, FlowError::InvalidConfiguration(_)));
}

#[test]
fn test_duplicate_agent_names_are_invalid() {
    let err = FlowConfig::from_yaml(
        r#"
dag_flow:
  - agent: a
    input: i
    output: o
agents:
  - name: a
    objective: one
  - name: a
    objective: two
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("defined more than once"));
}

#[test]
fn test_step_missing_output_is_invalid() {
    let err = FlowConfig::from_yaml(
        "dag_flow:\n  - agent: a\n    input: i\nagents:\n  - name: a\n    objective: x\n",
    )
    .unwrap_err();
    assert!(err.to_string().contains("step 1 (a) is missing required field 'output'"));
}

#[test]
fn test_agent_without_objective_is_invalid() {
    let err = FlowConfig::from_yaml(
        "dag_flow:\n  - agent: a\n    input: i\n    output: o\nagents:\n  - name: a\n",
    )
    .unwrap_err();
    assert!(err.to_string().contains("'objective'"));
}

#[test]
fn test_unknown_references_and_external_inputs() {
    let config = FlowConfig::from_yaml(
        r#"
dag_flow:
  - agent: a
    input: src.md
    output: mid.md
  - agent: ghost
    input: mid.md
    output: end.md
  - agent: a
    input: notes.md
    output: end2.md
agents:
  - name: a
    objective: x
"#,
    )
    .unwrap();

    assert_eq!(config.unknown_agent_references(), vec![(2, "ghost")]);
    assert_eq!(
        config.external_inputs(),
        vec![(1, Path::new("src.md")), (3, Path::new("notes.md"))]
    );
}

// =========================================================================
// FlowExecutor
// =========================================================================

#[test]
fn test_three_steps_run_in_order() {
    let temp = TempDir::new().unwrap();
    seed_input(temp.path());
    let service = FakeService::new();
    let executor = FlowExecutor::new(
        three_step_flow(temp.path(), "reviewer"),
        pipeline(service.clone(), CallMode::Chunked),
    )
    .unwrap();

    let report = executor.run().unwrap();

    assert_eq!(service.agents_called(), vec!["summarizer", "reviewer", "writer"]);
    assert_eq!(report.steps.len(), 3);
    assert_eq!(report.steps[1].agent, "reviewer");
    assert_eq!(report.total_chunks(), 3);

    let summary = fs::read_to_string(temp.path().join("out/summary.md")).unwrap();
    assert!(summary.starts_with("summarizer saw "));
    assert_eq!(report.steps[0].chars_written, summary.chars().count());
    let last = fs::read_to_string(temp.path().join("out/final.txt")).unwrap();
    assert!(last.starts_with("writer saw "));
}

#[test]
fn test_step_failure_halts_run_and_keeps_earlier_outputs() {
    let temp = TempDir::new().unwrap();
    seed_input(temp.path());
    let service = FakeService::new();
    let executor = FlowExecutor::new(
        three_step_flow(temp.path(), "broken"),
        pipeline(service.clone(), CallMode::Chunked),
    )
    .unwrap();

    let err = executor.run().unwrap_err();

    match &err {
        FlowError::StepFailed { step, agent, source } => {
            assert_eq!(*step, 2);
            assert_eq!(agent, "broken");
            assert!(matches!(**source, FlowError::RemoteCall(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_code(), exit_codes::REMOTE_FAILURE);
    assert_eq!(service.agents_called(), vec!["summarizer", "broken"]);
    assert!(temp.path().join("out/summary.md").exists());
    assert!(!temp.path().join("out/review.json").exists());
    assert!(!temp.path().join("out/final.txt").exists());
}

#[test]
fn test_unknown_agent_fails_at_its_step() {
    let temp = TempDir::new().unwrap();
    seed_input(temp.path());
    let service = FakeService::new();
    let executor = FlowExecutor::new(
        three_step_flow(temp.path(), "ghost"),
        pipeline(service.clone(), CallMode::Chunked),
    )
    .unwrap();

    let err = executor.run().unwrap_err();

    match &err {
        FlowError::UnknownAgent {
            step,
            agent,
            available,
        } => {
            assert_eq!(*step, 2);
            assert_eq!(agent, "ghost");
            assert_eq!(available, "broken, reviewer, summarizer, writer");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_code(), exit_codes::STEP_FAILURE);
    assert!(temp.path().join("out/summary.md").exists());
}

#[test]
fn test_missing_input_names_step_and_path() {
    let temp = TempDir::new().unwrap();
    let service = FakeService::new();
    let executor = FlowExecutor::new(
        three_step_flow(temp.path(), "reviewer"),
        pipeline(service.clone(), CallMode::Chunked),
    )
    .unwrap();

    let err = executor.run().unwrap_err();

    match &err {
        FlowError::MissingInput { step, agent, path } => {
            assert_eq!(*step, 1);
            assert_eq!(agent, "summarizer");
            assert_eq!(path, &temp.path().join("repo.md"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(service.agents_called().is_empty());
}

#[test]
fn test_events_are_recorded() {
    let temp = TempDir::new().unwrap();
    seed_input(temp.path());
    let log_path = temp.path().join("events.ndjson");
    let executor = FlowExecutor::new(
        three_step_flow(temp.path(), "broken"),
        pipeline(FakeService::new(), CallMode::Chunked),
    )
    .unwrap()
    .with_event_log(EventLog::new(&log_path));

    executor.run().unwrap_err();

    let actions: Vec<EventAction> = fs::read_to_string(&log_path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str::<Event>(l).unwrap().action)
        .collect();
    assert_eq!(
        actions,
        vec![
            EventAction::RunStart,
            EventAction::StepStart,
            EventAction::StepComplete,
            EventAction::StepStart,
            EventAction::StepFailed,
            EventAction::RunFailed,
        ]
    );
}

fn oversized_label_flow(dir: &Path) -> FlowConfig {
    fs::write(
        dir.join("wide.md"),
        format!("# File: {}\n\nbody\n", "n".repeat(200)),
    )
    .unwrap();
    FlowConfig::from_yaml(&format!(
        "dag_flow:\n  - agent: a\n    input: {d}/wide.md\n    output: {d}/wide.out\nagents:\n  - name: a\n    objective: x\n",
        d = dir.display()
    ))
    .unwrap()
}

/// Echo generator with a budget small enough that the prompt's section header
/// cannot fit a chunk.
fn tiny_pipeline() -> ChunkPipeline {
    let echo: Arc<dyn TextGenerator> =
        Arc::new(|p: &str, _m: u32| Ok::<_, RemoteCallError>(p.to_string()));
    ChunkPipeline::new(echo, 75, CallMode::Chunked).unwrap()
}

#[test]
fn test_content_loss_is_reported_but_not_fatal() {
    let temp = TempDir::new().unwrap();
    let log_path = temp.path().join("events.ndjson");
    let executor = FlowExecutor::new(oversized_label_flow(temp.path()), tiny_pipeline())
        .unwrap()
        .with_event_log(EventLog::new(&log_path));

    let report = executor.run().unwrap();

    assert_eq!(report.total_omitted(), 1);
    assert!(temp.path().join("wide.out").exists());
    let log = fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("\"content_loss\""));
}

#[test]
fn test_content_loss_can_be_fatal() {
    let temp = TempDir::new().unwrap();
    let executor = FlowExecutor::new(oversized_label_flow(temp.path()), tiny_pipeline())
        .unwrap()
        .fail_on_content_loss(true);

    let err = executor.run().unwrap_err();

    assert_eq!(err.exit_code(), exit_codes::CONTENT_LOSS);
    assert!(!temp.path().join("wide.out").exists());
}
