//! Simulation state storage.
//!
//! Two [`mimesis_interface::StateStore`] implementations:
//! - [`JsonStateStore`]: one JSON document on disk, replaced atomically
//! - [`InMemoryStateStore`]: process-local, for tests and embedding

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod json;
mod memory;

pub use json::JsonStateStore;
pub use memory::InMemoryStateStore;
