//! The phase seam.

use async_trait::async_trait;
use mimesis_client::BatchClient;
use mimesis_core::{EntityScope, SimulationState};
use mimesis_error::MimesisResult;
use serde_json::{Map, Value as JsonValue};
use std::time::Duration;

/// One stage of a tick.
///
/// A phase either issues provider requests through [`PhaseContext::client`]
/// or is pure computation over [`PhaseContext::state`] and earlier outputs.
/// Returning `Err` aborts the whole tick, so per-request fallbacks belong
/// inside the phase.
#[async_trait]
pub trait Phase: Send + Sync {
    /// Unique name within the pipeline. Later phases look up this phase's
    /// output by it.
    fn name(&self) -> &str;

    /// Entity collection the phase's client is scoped to.
    fn scope(&self) -> EntityScope {
        EntityScope::None
    }

    /// Chain depth override. `None` uses the configured depth of the scope.
    fn depth(&self) -> Option<usize> {
        None
    }

    /// Per-attempt timeout for the phase's requests.
    fn timeout(&self) -> Duration {
        Duration::from_secs(60)
    }

    /// Execute the phase.
    async fn run(&self, ctx: &PhaseContext<'_>) -> MimesisResult<PhaseOutcome>;
}

/// What a phase hands to the runner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseOutcome {
    /// Phase-specific output, visible to later phases and narrators
    pub output: JsonValue,
    /// Human-readable lines for the tick report
    pub narrative: Vec<String>,
}

impl PhaseOutcome {
    /// An outcome without narrative.
    pub fn new(output: JsonValue) -> Self {
        Self {
            output,
            narrative: Vec::new(),
        }
    }

    /// Append narrative lines.
    pub fn with_narrative(mut self, lines: impl IntoIterator<Item = String>) -> Self {
        self.narrative.extend(lines);
        self
    }
}

/// Everything a phase may read while it runs.
pub struct PhaseContext<'a> {
    tick: u64,
    state: &'a SimulationState,
    client: &'a BatchClient,
    previous: &'a Map<String, JsonValue>,
}

impl<'a> PhaseContext<'a> {
    /// Assemble a context.
    pub fn new(
        tick: u64,
        state: &'a SimulationState,
        client: &'a BatchClient,
        previous: &'a Map<String, JsonValue>,
    ) -> Self {
        Self {
            tick,
            state,
            client,
            previous,
        }
    }

    /// Number of the tick being executed (the counter it will persist with).
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Working state as loaded at tick start.
    ///
    /// Chain metadata here is stale while the tick runs; the client's
    /// registry holds the live chains.
    pub fn state(&self) -> &SimulationState {
        self.state
    }

    /// Client scoped to this phase's entities, depth and timeout.
    pub fn client(&self) -> &BatchClient {
        self.client
    }

    /// Output of an earlier phase.
    pub fn previous(&self, phase: &str) -> Option<&JsonValue> {
        self.previous.get(phase)
    }

    /// Outputs of every earlier phase, keyed by phase name.
    pub fn previous_outputs(&self) -> &Map<String, JsonValue> {
        self.previous
    }
}
