//! Implementation of the `chunkflow validate` and `chunkflow agents` commands.

use crate::cli::FlowArgs;
use crate::error::{FlowError, Result};
use crate::flow::FlowConfig;

/// Execute the `chunkflow validate` command.
///
/// Structural problems fail while loading. A step naming an undefined agent
/// fails with `UnknownAgent`. Missing inputs that no earlier step produces are
/// reported as warnings, since they may be created before the run.
pub fn cmd_validate(args: FlowArgs) -> Result<()> {
    let flow = FlowConfig::load(&args.flow)?;

    for (step, path) in flow.external_inputs() {
        if !path.exists() {
            println!(
                "warning: step {} input '{}' does not exist yet",
                step,
                path.display()
            );
        }
    }

    if let Some(&(step, agent)) = flow.unknown_agent_references().first() {
        return Err(FlowError::UnknownAgent {
            step,
            agent: agent.to_string(),
            available: flow.agent_names().join(", "),
        });
    }

    println!(
        "{}: OK ({} step(s), {} agent(s))",
        args.flow.display(),
        flow.dag_flow.len(),
        flow.agents.len()
    );
    Ok(())
}

/// Execute the `chunkflow agents` command.
pub fn cmd_agents(args: FlowArgs) -> Result<()> {
    let flow = FlowConfig::load(&args.flow)?;

    for agent in &flow.agents {
        let uses = flow
            .dag_flow
            .iter()
            .filter(|step| step.agent == agent.name)
            .count();
        println!("{} ({} step(s))", agent.name, uses);
        println!("  objective: {}", agent.objective.trim());
        if let Some(description) = agent.description.as_deref() {
            println!("  description: {}", description.trim());
        }
        if !agent.key_traits.is_empty() {
            println!("  traits: {}", agent.key_traits.join(", "));
        }
    }
    Ok(())
}
