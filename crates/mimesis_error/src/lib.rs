//! Error types for the Mimesis simulation engine.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use mimesis_error::{MimesisResult, ProviderError, ProviderErrorKind};
//!
//! fn call_provider() -> MimesisResult<String> {
//!     Err(ProviderError::new(ProviderErrorKind::Refusal("no".to_string())))?
//! }
//!
//! assert!(call_provider().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chain;
mod config;
mod error;
mod json;
mod provider;
mod request;
mod storage;
mod tick;
mod webhook;

pub use chain::{ChainError, ChainErrorKind};
pub use config::{ConfigError, ConfigErrorKind};
pub use error::{MimesisError, MimesisErrorKind, MimesisResult};
pub use json::{JsonError, JsonErrorKind};
pub use provider::{ProviderError, ProviderErrorKind};
pub use request::{RequestError, RequestErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use tick::{TickError, TickErrorKind};
pub use webhook::{WebhookError, WebhookErrorKind};
