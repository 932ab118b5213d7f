//! Chain registry and batch request executor.
//!
//! [`BatchClient`] is the only surface phase logic talks to. It resolves
//! continuation tokens through a [`ChainRegistry`], delegates each request to
//! a [`mimesis_interface::Transport`], commits successful continuations back
//! into the registry with sliding-window eviction, and accumulates usage on
//! the owning entity.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod batch;
mod registry;

pub use batch::BatchClient;
pub use mimesis_interface::CallStats;
pub use registry::ChainRegistry;
