//! OpenAI-compatible chat completions backend.
//!
//! Works against the official OpenAI API as well as any endpoint that speaks
//! the same protocol (the pipeline's default target is an OpenAI-compatible
//! gateway selected via `OPENAI_BASE_URL`).

mod chat;
mod client;
mod config;
mod types;

pub use client::OpenAI;
pub use config::OpenAIConfig;
