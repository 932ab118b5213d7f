//! Configuration, retry and rate limiting.
//!
//! This crate holds the pieces of the transport that do not depend on the
//! wire format:
//! - [`MimesisConfig`]: layered TOML configuration (bundled defaults, user
//!   config, working directory)
//! - [`parse_reset_hint`]: decoding of provider rate-limit reset hints
//! - [`RetryPolicy`]: bounded retry of transient provider conditions
//! - [`RequestLimiter`]: requests-per-minute and in-flight limits

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod limiter;
mod reset;
mod retry;

pub use config::{
    ChainsConfig, LimitsConfig, MimesisConfig, PhaseConfig, ProviderSettings, RetryConfig,
    StorageConfig,
};
pub use limiter::{RequestLimiter, RequestPermit};
pub use reset::{RESET_HEADERS, parse_reset_hint, reset_hint_from_headers};
pub use retry::RetryPolicy;
