//! Call statistics and tick reports.

use chrono::{DateTime, Utc};
use mimesis_core::{SimulationState, Usage};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Usage and outcome counters for one or more client calls.
///
/// # Examples
///
/// ```
/// use mimesis_core::Usage;
/// use mimesis_interface::CallStats;
///
/// let mut stats = CallStats::default();
/// stats.record_success(&Usage::new(10, 5, 2, 0));
/// stats.record_error();
///
/// assert_eq!(*stats.total_tokens(), 15);
/// assert_eq!(*stats.requests(), 2);
/// assert_eq!(*stats.errors(), 1);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct CallStats {
    /// Input plus output tokens
    total_tokens: u64,
    /// Reasoning tokens
    reasoning_tokens: u64,
    /// Cached prompt tokens
    cached_tokens: u64,
    /// Requests issued
    requests: u64,
    /// Requests that completed
    successes: u64,
    /// Requests that ended in a terminal error
    errors: u64,
}

impl CallStats {
    /// Record a completed request.
    pub fn record_success(&mut self, usage: &Usage) {
        self.total_tokens += usage.total_tokens();
        self.reasoning_tokens += *usage.reasoning_tokens();
        self.cached_tokens += *usage.cached_tokens();
        self.requests += 1;
        self.successes += 1;
    }

    /// Record a request that failed terminally.
    pub fn record_error(&mut self) {
        self.requests += 1;
        self.errors += 1;
    }

    /// Add another set of counters into this one.
    pub fn absorb(&mut self, other: &CallStats) {
        self.total_tokens += other.total_tokens;
        self.reasoning_tokens += other.reasoning_tokens;
        self.cached_tokens += other.cached_tokens;
        self.requests += other.requests;
        self.successes += other.successes;
        self.errors += other.errors;
    }
}

/// Outcome of one completed phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseReport {
    /// Phase name
    pub name: String,
    /// Position in the tick (0-indexed)
    pub index: usize,
    /// Tick the phase belongs to
    pub tick: u64,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
    /// Usage across every client call the phase made
    pub stats: CallStats,
    /// Phase-specific output
    pub output: JsonValue,
    /// Narrative lines emitted by the phase
    pub narrative: Vec<String>,
}

/// Aggregate produced once per successful tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Unique ID of this run
    pub run_id: Uuid,
    /// Tick number that was executed
    pub tick: u64,
    /// When the tick started
    pub started_at: DateTime<Utc>,
    /// When the state was persisted
    pub finished_at: DateTime<Utc>,
    /// Reports of every phase, in order
    pub phases: Vec<PhaseReport>,
    /// Narrative lines from all phases, in order
    pub narrative: Vec<String>,
    /// Whether every phase succeeded and the state was persisted
    pub success: bool,
    /// The persisted post-tick state
    pub state: SimulationState,
}

impl TickReport {
    /// Sum of the usage of every phase.
    pub fn total_stats(&self) -> CallStats {
        self.phases.iter().fold(CallStats::default(), |mut acc, phase| {
            acc.absorb(&phase.stats);
            acc
        })
    }
}
