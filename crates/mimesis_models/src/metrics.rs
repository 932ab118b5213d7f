//! Metrics for provider calls.
//!
//! OpenTelemetry instruments on the global meter, labelled with provider and
//! model. Without an installed meter provider every call is a no-op.

use mimesis_core::Usage;
use mimesis_error::ProviderErrorKind;
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::OnceLock;

static METRICS: OnceLock<LlmMetrics> = OnceLock::new();

/// Instruments for provider calls.
#[derive(Clone)]
pub struct LlmMetrics {
    /// Meter handle kept alive for metric instruments
    _meter: Meter,
    /// Completed provider calls
    pub requests: Counter<u64>,
    /// Calls that ended in a terminal error
    pub errors: Counter<u64>,
    /// Call duration in seconds, retries included
    pub duration: Histogram<f64>,
    /// Prompt tokens
    pub input_tokens: Counter<u64>,
    /// Generated tokens
    pub output_tokens: Counter<u64>,
    /// Reasoning tokens
    pub reasoning_tokens: Counter<u64>,
    /// Cached prompt tokens
    pub cached_tokens: Counter<u64>,
    /// Continuation tokens the provider failed to delete
    pub orphaned_tokens: Counter<u64>,
}

impl LlmMetrics {
    fn init() -> Self {
        let meter = global::meter("mimesis_llm");

        Self {
            _meter: meter.clone(),
            requests: meter
                .u64_counter("llm.requests")
                .with_description("Completed provider calls")
                .build(),
            errors: meter
                .u64_counter("llm.errors")
                .with_description("Provider calls that failed terminally")
                .build(),
            duration: meter
                .f64_histogram("llm.duration")
                .with_unit("s")
                .with_description("Provider call duration including retries")
                .build(),
            input_tokens: meter
                .u64_counter("llm.tokens.input")
                .with_description("Prompt tokens")
                .build(),
            output_tokens: meter
                .u64_counter("llm.tokens.output")
                .with_description("Generated tokens")
                .build(),
            reasoning_tokens: meter
                .u64_counter("llm.tokens.reasoning")
                .with_description("Reasoning tokens")
                .build(),
            cached_tokens: meter
                .u64_counter("llm.tokens.cached")
                .with_description("Cached prompt tokens")
                .build(),
            orphaned_tokens: meter
                .u64_counter("llm.continuations.orphaned")
                .with_description("Evicted continuation tokens that could not be deleted")
                .build(),
        }
    }

    /// Get the global instance.
    pub fn get() -> &'static Self {
        METRICS.get_or_init(Self::init)
    }

    /// Record a completed call and its usage.
    pub fn record_success(&self, provider: &str, model: &str, duration_secs: f64, usage: &Usage) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("model", model.to_string()),
        ];
        self.requests.add(1, labels);
        self.duration.record(duration_secs, labels);
        self.input_tokens.add(*usage.input_tokens(), labels);
        self.output_tokens.add(*usage.output_tokens(), labels);
        self.reasoning_tokens.add(*usage.reasoning_tokens(), labels);
        self.cached_tokens.add(*usage.cached_tokens(), labels);
    }

    /// Record a terminal failure.
    pub fn record_error(&self, provider: &str, model: &str, kind: &ProviderErrorKind) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("model", model.to_string()),
            KeyValue::new("error_type", classify_error(kind)),
        ];
        self.errors.add(1, labels);
    }

    /// Record a continuation token left behind on the provider.
    pub fn record_orphan(&self, provider: &str) {
        self.orphaned_tokens
            .add(1, &[KeyValue::new("provider", provider.to_string())]);
    }
}

impl Default for LlmMetrics {
    fn default() -> Self {
        Self::get().clone()
    }
}

/// Label for an error kind.
///
/// One of `rate_limit`, `timeout`, `refusal`, `incomplete`, `failed`,
/// `auth`, `http`, `parse`.
pub fn classify_error(kind: &ProviderErrorKind) -> &'static str {
    match kind {
        ProviderErrorKind::RateLimited { .. } | ProviderErrorKind::RateLimitExhausted { .. } => {
            "rate_limit"
        }
        ProviderErrorKind::Timeout
        | ProviderErrorKind::Connection(_)
        | ProviderErrorKind::TimeoutExhausted { .. } => "timeout",
        ProviderErrorKind::Refusal(_) => "refusal",
        ProviderErrorKind::Incomplete(_) => "incomplete",
        ProviderErrorKind::Failed(_) => "failed",
        ProviderErrorKind::MissingApiKey(_) => "auth",
        ProviderErrorKind::HttpStatus { status_code, .. } if matches!(status_code, 401 | 403) => {
            "auth"
        }
        ProviderErrorKind::HttpStatus { .. } => "http",
        ProviderErrorKind::Parse(_) | ProviderErrorKind::MissingPayload => "parse",
    }
}
