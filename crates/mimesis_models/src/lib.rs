//! Provider transport for the Mimesis simulation engine.
//!
//! [`ResponsesTransport`] implements [`mimesis_interface::Transport`] over an
//! OpenAI-style Responses API: structured JSON output, continuation through
//! `previous_response_id`, silent retry of rate limits and timeouts, and
//! classification of refusals, truncation and failures.
//!
//! ```no_run
//! use mimesis_interface::{Transport, TransportCall};
//! use mimesis_core::OutputShape;
//! use mimesis_models::ResponsesTransport;
//! use mimesis_rate_limit::MimesisConfig;
//! use serde_json::json;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MimesisConfig::load()?;
//! let transport = ResponsesTransport::from_config(&config)?;
//! let shape = OutputShape::new("greeting", json!({
//!     "type": "object",
//!     "properties": { "text": { "type": "string" } }
//! }));
//! let completion = transport
//!     .execute(TransportCall {
//!         instructions: "Greet the user.",
//!         content: "Hello",
//!         shape: &shape,
//!         previous_token: None,
//!         timeout: Duration::from_secs(30),
//!     })
//!     .await?;
//! println!("{}", completion.output);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classify;
mod client;
mod dto;
mod metrics;
mod schema;

pub use classify::{interpret_response, status_error, transport_error};
pub use client::ResponsesTransport;
pub use dto::{
    ContentPart, IncompleteDetails, InputTokensDetails, OutputItem, OutputTokensDetails,
    ReasoningConfig, ResponseStatus, ResponsesRequest, ResponsesRequestBuilder, ResponsesResponse,
    SummaryPart, TextConfig, TextFormat, WireError, WireUsage,
};
pub use metrics::{LlmMetrics, classify_error};
pub use schema::strict_schema;
