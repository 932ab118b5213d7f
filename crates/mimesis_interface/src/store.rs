//! Storage collaborator seam.

use async_trait::async_trait;
use mimesis_core::SimulationState;
use mimesis_error::MimesisResult;

/// Loads and persists the simulation state document.
///
/// `save` must replace the durable state as a single unit: readers observe
/// either the previous document or the new one, never a mix.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the current durable state.
    async fn load(&self) -> MimesisResult<SimulationState>;

    /// Persist a complete state.
    async fn save(&self, state: &SimulationState) -> MimesisResult<()>;
}
