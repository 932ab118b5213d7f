//! Tick lifecycle observers.

use crate::{PhaseReport, TickReport};
use async_trait::async_trait;
use mimesis_core::SimulationState;
use mimesis_error::MimesisResult;

/// Observer notified at the three tick lifecycle points.
///
/// Errors returned here are logged by the runner and never abort a tick.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// A tick is starting from `state`.
    async fn on_tick_start(&self, _tick: u64, _state: &SimulationState) -> MimesisResult<()> {
        Ok(())
    }

    /// A phase finished successfully.
    async fn on_phase_complete(&self, _report: &PhaseReport) -> MimesisResult<()> {
        Ok(())
    }

    /// The tick has been persisted.
    async fn on_tick_complete(&self, report: &TickReport) -> MimesisResult<()>;
}
