//! Tick execution.

use crate::{EntityPromptPhase, Phase, PhaseContext};
use chrono::Utc;
use mimesis_client::{BatchClient, ChainRegistry};
use mimesis_core::{EntityHandle, EntityScope, SimStatus, SimulationState, share_entities};
use mimesis_error::{MimesisResult, TickError, TickErrorKind};
use mimesis_interface::{Narrator, PhaseReport, StateStore, TickReport, Transport};
use mimesis_rate_limit::{ChainsConfig, MimesisConfig};
use serde_json::Map;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// Runs ticks: an ordered list of phases between two persisted, paused
/// states.
///
/// Every tick builds its own registries and clients over freshly shared
/// entity handles, so nothing leaks between ticks. The store is written at
/// most once per tick, and only after every phase succeeded.
pub struct TickRunner {
    transport: Arc<dyn Transport>,
    store: Arc<dyn StateStore>,
    chains: ChainsConfig,
    phases: Vec<Box<dyn Phase>>,
    narrators: Vec<Box<dyn Narrator>>,
}

impl std::fmt::Debug for TickRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickRunner")
            .field("provider", &self.transport.provider_name())
            .field("chains", &self.chains)
            .field(
                "phases",
                &self.phases.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field(
                "narrators",
                &self.narrators.iter().map(|n| n.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl TickRunner {
    /// Create a runner without phases or narrators.
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn StateStore>,
        chains: ChainsConfig,
    ) -> Self {
        Self {
            transport,
            store,
            chains,
            phases: Vec::new(),
            narrators: Vec::new(),
        }
    }

    /// Create a runner with one [`EntityPromptPhase`] per configured phase.
    pub fn from_config(
        transport: Arc<dyn Transport>,
        store: Arc<dyn StateStore>,
        config: &MimesisConfig,
    ) -> Self {
        config.phases.iter().cloned().fold(
            Self::new(transport, store, config.chains),
            |runner, phase| runner.with_phase(EntityPromptPhase::new(phase)),
        )
    }

    /// Append a phase to the pipeline.
    pub fn with_phase(mut self, phase: impl Phase + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    /// Add a narrator.
    pub fn with_narrator(mut self, narrator: impl Narrator + 'static) -> Self {
        self.narrators.push(Box::new(narrator));
        self
    }

    /// Names of the configured phases, in order.
    pub fn phase_names(&self) -> Vec<&str> {
        self.phases.iter().map(|phase| phase.name()).collect()
    }

    /// Load the state from the store and run one tick.
    pub async fn run_next(&self) -> MimesisResult<TickReport> {
        let state = self.store.load().await?;
        self.run_tick(state).await
    }

    /// Run one tick starting from `state`.
    ///
    /// # Errors
    ///
    /// - `NotPaused` if `state` is not paused
    /// - `PhaseFailed` if any phase fails; nothing is saved
    /// - `Persistence` if the store rejects the post-tick state
    /// - `CounterOverflow` if the tick counter is already at its maximum
    #[instrument(skip_all, fields(current = state.tick, phases = self.phases.len()))]
    pub async fn run_tick(&self, state: SimulationState) -> MimesisResult<TickReport> {
        if !state.is_paused() {
            return Err(TickError::new(TickErrorKind::NotPaused(state.status.to_string())).into());
        }

        let started_at = Utc::now();
        let tick = state
            .tick
            .checked_add(1)
            .ok_or_else(|| TickError::new(TickErrorKind::CounterOverflow(state.tick)))?;
        let mut working = state;
        working.status = SimStatus::Running;
        info!(
            characters = working.characters.len(),
            locations = working.locations.len(),
            "Tick starting"
        );
        self.notify_tick_start(tick, &working).await;

        let characters = share_entities(&working.characters);
        let locations = share_entities(&working.locations);

        let mut previous = Map::new();
        let mut reports = Vec::with_capacity(self.phases.len());
        for (index, phase) in self.phases.iter().enumerate() {
            let handles: &[EntityHandle] = match phase.scope() {
                EntityScope::Characters => &characters,
                EntityScope::Locations => &locations,
                EntityScope::None => &[],
            };
            let depth = phase
                .depth()
                .unwrap_or_else(|| self.chains.depth_for(phase.scope()));
            let client = BatchClient::new(
                Arc::clone(&self.transport),
                ChainRegistry::new(handles),
                depth,
                phase.timeout(),
            );

            let started = Instant::now();
            let ctx = PhaseContext::new(tick, &working, &client, &previous);
            let outcome = phase.run(&ctx).await.map_err(|e| {
                error!(phase = phase.name(), index, error = %e, "Phase failed, tick aborted");
                TickError::new(TickErrorKind::PhaseFailed {
                    phase: phase.name().to_string(),
                    message: e.to_string(),
                })
            })?;

            let report = PhaseReport {
                name: phase.name().to_string(),
                index,
                tick,
                duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                stats: client.total_stats(),
                output: outcome.output,
                narrative: outcome.narrative,
            };
            info!(
                phase = %report.name,
                duration_ms = report.duration_ms,
                requests = report.stats.requests(),
                errors = report.stats.errors(),
                total_tokens = report.stats.total_tokens(),
                "Phase complete"
            );
            self.notify_phase_complete(&report).await;

            previous.insert(report.name.clone(), report.output.clone());
            reports.push(report);
        }

        working.merge_meta(EntityScope::Characters, &characters);
        working.merge_meta(EntityScope::Locations, &locations);
        working.tick = tick;
        working.status = SimStatus::Paused;

        self.store.save(&working).await.map_err(|e| {
            error!(error = %e, "Failed to persist tick");
            TickError::new(TickErrorKind::Persistence(e.to_string()))
        })?;

        let report = TickReport {
            run_id: Uuid::new_v4(),
            tick,
            started_at,
            finished_at: Utc::now(),
            narrative: reports
                .iter()
                .flat_map(|phase| phase.narrative.iter().cloned())
                .collect(),
            phases: reports,
            success: true,
            state: working,
        };
        let stats = report.total_stats();
        info!(
            run_id = %report.run_id,
            requests = stats.requests(),
            errors = stats.errors(),
            total_tokens = stats.total_tokens(),
            "Tick persisted"
        );
        self.notify_tick_complete(&report).await;

        Ok(report)
    }

    async fn notify_tick_start(&self, tick: u64, state: &SimulationState) {
        for narrator in &self.narrators {
            if let Err(e) = narrator.on_tick_start(tick, state).await {
                error!(narrator = narrator.name(), point = "tick_start", error = %e, "Narrator failed");
            }
        }
    }

    async fn notify_phase_complete(&self, report: &PhaseReport) {
        for narrator in &self.narrators {
            if let Err(e) = narrator.on_phase_complete(report).await {
                error!(narrator = narrator.name(), point = "phase_complete", error = %e, "Narrator failed");
            }
        }
    }

    async fn notify_tick_complete(&self, report: &TickReport) {
        for narrator in &self.narrators {
            if let Err(e) = narrator.on_tick_complete(report).await {
                error!(narrator = narrator.name(), point = "tick_complete", error = %e, "Narrator failed");
            }
        }
    }
}
