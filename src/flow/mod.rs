//! Flow definition and the step executor.
//!
//! A flow is an ordered list of steps, each naming an agent, an input file and
//! an output file. The executor runs steps one at a time; a step's output file
//! is typically the next step's input.

mod config;
mod executor;

#[cfg(test)]
mod tests;

pub use config::{FlowConfig, StepDefinition};
pub use executor::{FlowExecutor, RunReport, StepReport};
