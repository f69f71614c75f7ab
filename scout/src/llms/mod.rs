//! LLM backend implementations.
//!
//! # Available Backends
//!
//! - [`openai`] - OpenAI-compatible Chat Completions endpoints (OpenAI itself,
//!   or any gateway that speaks the same API)

pub mod openai;

pub use openai::{OpenAI, OpenAIConfig};
