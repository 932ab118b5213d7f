//! Test utilities for tick runner tests.
//!
//! Deterministic mock transport, scripted phases and recording narrators.

pub mod mock_world;

#[allow(unused_imports)]
pub use mock_world::{
    FailingNarrator, MockWorldTransport, RecordingNarrator, ScriptedPhase, SeenCall, sample_state,
};
