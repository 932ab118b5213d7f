//! Provider transport seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mimesis_core::{OutputShape, Usage};
use mimesis_error::MimesisResult;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;

/// Arguments for one logical provider call.
#[derive(Debug, Clone, Copy)]
pub struct TransportCall<'a> {
    /// System instructions
    pub instructions: &'a str,
    /// User content
    pub content: &'a str,
    /// Expected structured output
    pub shape: &'a OutputShape,
    /// Continuation token of the previous call in the chain
    pub previous_token: Option<&'a str>,
    /// Budget for each individual attempt
    pub timeout: Duration,
}

/// Provider-side details kept for debugging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugInfo {
    /// Model that produced the response
    pub model: String,
    /// Creation time reported by the provider
    pub created_at: Option<DateTime<Utc>>,
    /// Reasoning summary, when the provider returned one
    pub reasoning: Option<String>,
}

/// A successfully parsed provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Continuation token for chaining the next call
    pub token: String,
    /// Parsed structured output
    pub output: JsonValue,
    /// Token usage of this call
    pub usage: Usage,
    /// Debug metadata
    pub debug: DebugInfo,
}

/// Executes single provider calls.
///
/// Implementations retry transient conditions (rate limits, timeouts and
/// connection failures) internally and either return a parsed
/// [`Completion`] or a terminal error.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Run one call to completion or terminal failure.
    async fn execute(&self, call: TransportCall<'_>) -> MimesisResult<Completion>;

    /// Release a continuation token no chain references any more.
    ///
    /// Best effort: failures are logged by the implementation and never
    /// returned.
    async fn delete(&self, token: &str);

    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &'static str;

    /// Model identifier.
    fn model_name(&self) -> &str;
}
