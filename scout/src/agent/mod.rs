//! Agent configuration and execution.
//!
//! An [`Agent`] is a pure configuration struct: name, instructions, model,
//! provider, tools, and an optional output schema. The [`Runner`] drives it
//! through the reasoning loop until the model produces a final answer.

mod config;
mod result;
mod runner;

pub use config::{Agent, OutputSchema};
pub use result::{NextStep, RunConfig, RunResult, ToolCallRecord, ToolCallRequest};
pub use runner::Runner;
