//! Mock collaborators for tick tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mimesis_core::{Entity, SimulationState, Usage};
use mimesis_error::{
    MimesisResult, ProviderError, ProviderErrorKind, WebhookError, WebhookErrorKind,
};
use mimesis_interface::{
    Completion, DebugInfo, Narrator, PhaseReport, TickReport, Transport, TransportCall,
};
use mimesis_runner::{Phase, PhaseContext, PhaseOutcome};
use serde_json::{Value as JsonValue, json};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Three characters-and-locations world at tick 0.
pub fn sample_state() -> SimulationState {
    SimulationState {
        characters: vec![
            Entity::new("bob").with_field("mood", json!("restless")),
            Entity::new("elvira").with_field("mood", json!("curious")),
        ],
        locations: vec![Entity::new("harbour")],
        ..Default::default()
    }
}

/// Request observed by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct SeenCall {
    pub shape: String,
    pub content: JsonValue,
    pub previous: Option<String>,
}

/// Transport whose answers depend only on the request.
///
/// Tokens are `"{shape}-{entity}-t{tick}"` (`world` for unscoped requests),
/// outputs are `{"narrative": "{entity} acts in tick {tick}"}` and every call
/// uses 10 input, 5 output and 1 reasoning token.
#[derive(Default)]
pub struct MockWorldTransport {
    failing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<SeenCall>>,
    deleted: Mutex<Vec<String>>,
}

impl MockWorldTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Refuse every request about `entity` (`world` for unscoped requests).
    pub fn fail_for(&self, entity: &str) {
        self.failing.lock().unwrap().insert(entity.to_string());
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<SeenCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockWorldTransport {
    async fn execute(&self, call: TransportCall<'_>) -> MimesisResult<Completion> {
        let content: JsonValue = serde_json::from_str(call.content).unwrap();
        self.calls.lock().unwrap().push(SeenCall {
            shape: call.shape.name().clone(),
            content: content.clone(),
            previous: call.previous_token.map(str::to_string),
        });

        let entity = content["entity"]["id"].as_str().unwrap_or("world").to_string();
        let tick = content["tick"].as_u64().unwrap();
        if self.failing.lock().unwrap().contains(&entity) {
            return Err(ProviderError::new(ProviderErrorKind::Refusal("scripted".to_string())).into());
        }

        Ok(Completion {
            token: format!("{}-{}-t{}", call.shape.name(), entity, tick),
            output: json!({ "narrative": format!("{} acts in tick {}", entity, tick) }),
            usage: Usage::new(10, 5, 1, 0),
            debug: DebugInfo::default(),
        })
    }

    async fn delete(&self, token: &str) {
        self.deleted.lock().unwrap().push(token.to_string());
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-world"
    }
}

/// Pure phase that records its runs and can fail a set number of times.
pub struct ScriptedPhase {
    name: String,
    failures_left: AtomicUsize,
    runs: Arc<AtomicUsize>,
}

impl ScriptedPhase {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            failures_left: AtomicUsize::new(0),
            runs: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing_once(self) -> Self {
        self.failures_left.store(1, Ordering::SeqCst);
        self
    }

    /// Shared run counter, readable after the phase moves into a runner.
    pub fn runs(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.runs)
    }
}

#[async_trait]
impl Phase for ScriptedPhase {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: &PhaseContext<'_>) -> MimesisResult<PhaseOutcome> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(ProviderError::new(ProviderErrorKind::Failed("scripted".to_string())).into());
        }

        let seen: Vec<&String> = ctx.previous_outputs().keys().collect();
        Ok(PhaseOutcome::new(json!({ "phase": self.name, "seen": seen }))
            .with_narrative([format!("{} done", self.name)]))
    }
}

/// Narrator recording every lifecycle point as a short string.
#[derive(Default, Clone)]
pub struct RecordingNarrator {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingNarrator {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Narrator for RecordingNarrator {
    fn name(&self) -> &str {
        "recording"
    }

    async fn on_tick_start(&self, tick: u64, _state: &SimulationState) -> MimesisResult<()> {
        self.events.lock().unwrap().push(format!("start:{}", tick));
        Ok(())
    }

    async fn on_phase_complete(&self, report: &PhaseReport) -> MimesisResult<()> {
        self.events.lock().unwrap().push(format!("phase:{}", report.name));
        Ok(())
    }

    async fn on_tick_complete(&self, report: &TickReport) -> MimesisResult<()> {
        self.events.lock().unwrap().push(format!("complete:{}", report.tick));
        Ok(())
    }
}

/// Narrator failing at every lifecycle point.
pub struct FailingNarrator;

#[async_trait]
impl Narrator for FailingNarrator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn on_tick_start(&self, _tick: u64, _state: &SimulationState) -> MimesisResult<()> {
        Err(WebhookError::new(WebhookErrorKind::Delivery("narrator down".to_string())).into())
    }

    async fn on_phase_complete(&self, _report: &PhaseReport) -> MimesisResult<()> {
        Err(WebhookError::new(WebhookErrorKind::Delivery("narrator down".to_string())).into())
    }

    async fn on_tick_complete(&self, _report: &TickReport) -> MimesisResult<()> {
        Err(WebhookError::new(WebhookErrorKind::Delivery("narrator down".to_string())).into())
    }
}
