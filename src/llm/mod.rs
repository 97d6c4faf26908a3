//! LLM integration module.
//!
//! Provides an OpenAI-compatible client for LLM API calls and
//! the prompts used for report generation.

mod client;
mod prompts;

pub use client::{ChatModel, CompletionRequest, JsonSchemaFormat, LlmClient, LlmResponse, Message};
pub use prompts::{BENCHMARK_REPORT_PROMPT, Prompts};
