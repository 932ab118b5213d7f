//! Trait definitions and report types for the Mimesis simulation engine.
//!
//! The seams between crates live here: the provider [`Transport`], the
//! [`StateStore`] collaborator, and [`Narrator`] observers, together with the
//! report values passed across them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod narrator;
mod report;
mod store;
mod transport;

pub use narrator::Narrator;
pub use report::{CallStats, PhaseReport, TickReport};
pub use store::StateStore;
pub use transport::{Completion, DebugInfo, Transport, TransportCall};
