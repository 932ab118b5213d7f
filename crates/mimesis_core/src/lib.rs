//! Core data types for the Mimesis simulation engine.
//!
//! Entities, chain addressing, usage accounting, requests and the
//! simulation state document shared by every other Mimesis crate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chain;
mod entity;
mod request;
mod state;
mod usage;

pub use chain::ChainKey;
pub use entity::{Entity, EntityHandle, ProviderMeta, lock_entity, share_entities};
pub use request::{OutputShape, Request, RequestBuilder, RequestBuilderError};
pub use state::{EntityScope, SimStatus, SimulationState};
pub use usage::{Usage, UsageCounters};
