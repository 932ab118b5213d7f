//! Token usage accounting.

use serde::{Deserialize, Serialize};

/// Token usage reported for one completed provider call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct Usage {
    /// Prompt tokens
    input_tokens: u64,
    /// Generated tokens (reasoning included)
    output_tokens: u64,
    /// Tokens spent on hidden reasoning
    reasoning_tokens: u64,
    /// Prompt tokens served from the provider cache
    cached_tokens: u64,
}

impl Usage {
    /// Create a usage record.
    pub fn new(input_tokens: u64, output_tokens: u64, reasoning_tokens: u64, cached_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            reasoning_tokens,
            cached_tokens,
        }
    }

    /// Input plus output tokens.
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Cumulative usage totals carried by an entity across ticks.
///
/// Counters only grow.
///
/// # Examples
///
/// ```
/// use mimesis_core::{Usage, UsageCounters};
///
/// let mut counters = UsageCounters::default();
/// counters.record(&Usage::new(100, 40, 10, 25));
/// counters.record(&Usage::new(50, 10, 0, 0));
///
/// assert_eq!(*counters.total_tokens(), 200);
/// assert_eq!(*counters.reasoning_tokens(), 10);
/// assert_eq!(*counters.cached_tokens(), 25);
/// assert_eq!(*counters.requests(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct UsageCounters {
    /// Input plus output tokens
    total_tokens: u64,
    /// Reasoning tokens
    reasoning_tokens: u64,
    /// Cached prompt tokens
    cached_tokens: u64,
    /// Completed requests
    requests: u64,
}

impl UsageCounters {
    /// Fold one completed request into the totals.
    pub fn record(&mut self, usage: &Usage) {
        self.total_tokens += usage.total_tokens();
        self.reasoning_tokens += usage.reasoning_tokens;
        self.cached_tokens += usage.cached_tokens;
        self.requests += 1;
    }

    /// Add another set of totals into this one.
    pub fn absorb(&mut self, other: &UsageCounters) {
        self.total_tokens += other.total_tokens;
        self.reasoning_tokens += other.reasoning_tokens;
        self.cached_tokens += other.cached_tokens;
        self.requests += other.requests;
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
