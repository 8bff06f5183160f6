//! Trend research via an external LLM provider.
//!
//! The provider is asked for a `{ "trends": [...] }` envelope per genre. Its
//! reply is free text, so the JSON object is located by brace scanning and
//! decoded entry by entry. Nothing in here returns an error to the collector;
//! failures become empty results.

mod adapter;
mod extract;
mod llm;
mod prompt;
mod types;

pub use adapter::{LlmTrendResearcher, TrendResearcher};
pub use extract::{extract_json_object, find_json_object, ExtractError};
pub use llm::{
    AnthropicClient, CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage,
};
pub use prompt::{build_trend_prompt, SYSTEM_PROMPT};
pub use types::{trends_from_envelope, RawTrend, ResearchError};
