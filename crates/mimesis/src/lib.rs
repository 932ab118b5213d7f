//! Mimesis - LLM-driven tick simulation
//!
//! Mimesis advances a simulated world one tick at a time. Each tick runs an
//! ordered pipeline of phases; phases prompt a language model once per
//! entity, concurrently, and every entity keeps a short chain of provider
//! continuation tokens per purpose so it remembers earlier ticks.
//!
//! # Features
//!
//! - **Chained requests**: per-entity sliding windows of continuation tokens
//! - **Batch execution**: order-preserving fan-out with per-item failures
//! - **Bounded retry**: rate limits and timeouts retried with provider reset hints
//! - **Atomic ticks**: a failed tick never touches storage and can be replayed
//! - **Narrators**: console, JSON-lines file and chat webhook observers
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use mimesis::{JsonStateStore, MimesisConfig, ResponsesTransport, TickRunner};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MimesisConfig::load()?;
//!     let transport = Arc::new(ResponsesTransport::from_config(&config)?);
//!     let store = Arc::new(JsonStateStore::new("world.json"));
//!
//!     let report = TickRunner::from_config(transport, store, &config)
//!         .run_next()
//!         .await?;
//!     println!("tick {}: {:?}", report.tick, report.narrative);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `mimesis_error` - Error types
//! - `mimesis_core` - Entities, chain keys, requests, simulation state
//! - `mimesis_interface` - Transport, narrator and state store traits
//! - `mimesis_rate_limit` - Configuration, retry and request limits
//! - `mimesis_models` - Responses API transport
//! - `mimesis_client` - Chain registry and batch client
//! - `mimesis_storage` - State stores
//! - `mimesis_runner` - Tick orchestration
//!
//! This crate re-exports everything for convenience.

pub use mimesis_client::*;
pub use mimesis_core::*;
pub use mimesis_error::*;
pub use mimesis_interface::*;
pub use mimesis_models::{LlmMetrics, ResponsesTransport, strict_schema};
pub use mimesis_rate_limit::*;
pub use mimesis_runner::*;
pub use mimesis_storage::*;

#[cfg(feature = "observability")]
pub mod observability;

#[cfg(feature = "observability")]
pub use observability::{
    ObservabilityConfig, init_observability, init_observability_with_config,
    shutdown_observability,
};
