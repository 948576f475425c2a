//! Implementation of the `chunkflow run` command.
//!
//! 1. Loads and validates the flow file
//! 2. Builds run settings: defaults, then `--settings`, then CLI flags
//! 3. Builds the text-generation client once for the whole run
//! 4. Executes the steps in order and prints a summary

use crate::cli::RunArgs;
use crate::config::RunConfig;
use crate::error::Result;
use crate::events::EventLog;
use crate::flow::{FlowConfig, FlowExecutor, RunReport};
use crate::llm::LlmClient;
use crate::pipeline::{CallMode, ChunkPipeline};
use std::sync::Arc;

/// Execute the `chunkflow run` command.
pub fn cmd_run(args: RunArgs) -> Result<()> {
    let flow = FlowConfig::load(&args.flow)?;
    let settings = resolve_settings(&args)?;
    settings.validate_client()?;

    if args.dry_run {
        print_plan(&flow, &settings);
        return Ok(());
    }

    let client = LlmClient::from_settings(&settings.client)?;
    let mut pipeline =
        ChunkPipeline::new(Arc::new(client), settings.client.max_tokens, settings.call_mode())?;
    if let Some(dir) = &args.scratch_dir {
        pipeline = pipeline.with_scratch_root(dir);
    }

    let mut executor = FlowExecutor::new(flow, pipeline)?
        .fail_on_content_loss(settings.pipeline.fail_on_content_loss);
    if let Some(path) = &args.events {
        let log = EventLog::new(path);
        tracing::info!(events = %log.path().display(), "recording run events");
        executor = executor.with_event_log(log);
    }

    let report = executor.run()?;
    print_report(&report);
    Ok(())
}

/// Defaults, overlaid by the settings file, overlaid by CLI flags.
fn resolve_settings(args: &RunArgs) -> Result<RunConfig> {
    let mut settings = match &args.settings {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    apply_overrides(&mut settings, args);
    settings.validate()?;
    Ok(settings)
}

fn apply_overrides(settings: &mut RunConfig, args: &RunArgs) {
    let client = &mut settings.client;
    if let Some(client_type) = args.client_type {
        client.client_type = client_type;
    }
    if let Some(model_id) = &args.model_id {
        client.model_id = model_id.clone();
    }
    if let Some(url) = &args.url {
        client.url = Some(url.clone());
    }
    if let Some(region) = &args.region {
        client.region = Some(region.clone());
    }
    if let Some(max_tokens) = args.max_tokens {
        client.max_tokens = max_tokens;
    }

    let pipeline = &mut settings.pipeline;
    if args.no_chunks {
        pipeline.use_chunks = false;
    }
    if args.truncate_input {
        pipeline.truncate_input = true;
    }
    if args.fail_on_content_loss {
        pipeline.fail_on_content_loss = true;
    }
}

fn print_plan(flow: &FlowConfig, settings: &RunConfig) {
    let mode = match settings.call_mode() {
        CallMode::Chunked => "chunked".to_string(),
        CallMode::Direct { truncate } => format!("direct (truncate: {})", truncate),
    };

    println!("Dry run: no model calls will be made.");
    println!();
    println!(
        "Client:      {} / {}",
        settings.client.client_type, settings.client.model_id
    );
    println!("Mode:        {}", mode);
    println!("Chunk size:  {} chars", settings.max_input_chars());
    println!();
    println!("Steps:");
    for (i, step) in flow.dag_flow.iter().enumerate() {
        println!(
            "  {}. {}: {} -> {}",
            i + 1,
            step.agent,
            step.input.display(),
            step.output.display()
        );
    }
    for (n, agent) in flow.unknown_agent_references() {
        println!("warning: step {} uses undefined agent '{}'", n, agent);
    }
}

fn print_report(report: &RunReport) {
    println!(
        "Flow complete: {} step(s) in {:.1}s",
        report.steps.len(),
        report.duration.as_secs_f64()
    );
    for step in &report.steps {
        let loss = if step.omitted > 0 {
            format!(", {} section(s) omitted", step.omitted)
        } else {
            String::new()
        };
        println!(
            "  {}. {} -> {} ({} chars, {} chunk(s){})",
            step.step,
            step.agent,
            step.output.display(),
            step.chars_written,
            step.chunk_count,
            loss
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use crate::config::ClientType;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn run_args(argv: &[&str]) -> RunArgs {
        let mut full = vec!["chunkflow", "run", "flow.yaml"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Run(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_flags_override_settings_file() {
        let temp = TempDir::new().unwrap();
        let settings_path = temp.path().join("settings.yaml");
        fs::write(
            &settings_path,
            "client:\n  client_type: caii\n  model_id: from-file\n  max_tokens: 100\npipeline:\n  use_chunks: true\n",
        )
        .unwrap();

        let path = settings_path.to_string_lossy().to_string();
        let args = run_args(&[
            "--settings",
            &path,
            "--client-type",
            "bedrock",
            "--max-tokens",
            "200",
            "--no-chunks",
        ]);
        let settings = resolve_settings(&args).unwrap();

        assert_eq!(settings.client.client_type, ClientType::Bedrock);
        assert_eq!(settings.client.model_id, "from-file");
        assert_eq!(settings.client.max_tokens, 200);
        assert_eq!(settings.call_mode(), CallMode::Direct { truncate: false });
    }

    #[test]
    fn test_defaults_without_settings_file() {
        let args = run_args(&["--url", "https://inference.example.com/v1"]);
        let settings = resolve_settings(&args).unwrap();

        assert_eq!(settings.client.client_type, ClientType::Caii);
        assert_eq!(settings.client.max_tokens, 64_000);
        assert_eq!(
            settings.client.url.as_deref(),
            Some("https://inference.example.com/v1")
        );
        assert_eq!(settings.call_mode(), CallMode::Chunked);
    }

    #[test]
    fn test_zero_max_tokens_flag_is_rejected() {
        let args = run_args(&["--max-tokens", "0"]);
        assert!(resolve_settings(&args).is_err());
    }

    #[test]
    fn test_dry_run_does_not_need_credentials() {
        let temp = TempDir::new().unwrap();
        let flow_path = temp.path().join("flow.yaml");
        fs::write(
            &flow_path,
            "dag_flow:\n  - agent: a\n    input: in.md\n    output: out.md\nagents:\n  - name: a\n    objective: x\n",
        )
        .unwrap();

        let mut args = run_args(&[
            "--model-id",
            "m",
            "--url",
            "https://inference.example.com/v1",
            "--dry-run",
        ]);
        args.flow = flow_path;

        cmd_run(args).unwrap();
    }
}
