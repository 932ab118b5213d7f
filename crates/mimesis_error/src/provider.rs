//! Provider error types and transient classification.

/// Provider-specific error conditions.
///
/// Variants split into transient conditions that the transport retries
/// (`RateLimited`, `Timeout`, `Connection`) and terminal conditions that are
/// raised on first occurrence or after retries run out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ProviderErrorKind {
    /// API key not found in the configured environment variable
    #[display("API key environment variable {} not set", _0)]
    MissingApiKey(String),
    /// Provider answered 429; wait this long before the next attempt
    #[display("Rate limited, retry after {}ms", retry_after_ms)]
    RateLimited {
        /// Wait derived from the reset header, safety margin included
        retry_after_ms: u64,
    },
    /// The per-request timeout budget elapsed
    #[display("Request timed out")]
    Timeout,
    /// Network or connection failure (treated like a timeout)
    #[display("Connection failed: {}", _0)]
    Connection(String),
    /// Rate limiting persisted through every attempt
    #[display("Rate limit exhausted after {} attempts", attempts)]
    RateLimitExhausted {
        /// Number of attempts made
        attempts: u32,
    },
    /// Timeouts persisted through every attempt
    #[display("Timeout exhausted after {} attempts", attempts)]
    TimeoutExhausted {
        /// Number of attempts made
        attempts: u32,
    },
    /// The model refused for safety reasons
    #[display("Model refused: {}", _0)]
    Refusal(String),
    /// The output was truncated or otherwise incomplete
    #[display("Incomplete response: {}", _0)]
    Incomplete(String),
    /// The provider reported a failed response
    #[display("Response failed: {}", _0)]
    Failed(String),
    /// Non-success HTTP status other than 429
    #[display("HTTP {} error: {}", status_code, message)]
    HttpStatus {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason
        message: String,
    },
    /// Response body could not be decoded or did not match the shape
    #[display("Failed to parse response: {}", _0)]
    Parse(String),
    /// Completed response carried no structured payload
    #[display("Response carried no structured output")]
    MissingPayload,
}

impl ProviderErrorKind {
    /// Whether this condition is retried inside the transport.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderErrorKind::RateLimited { .. }
                | ProviderErrorKind::Timeout
                | ProviderErrorKind::Connection(_)
        )
    }

    /// Convert a transient condition into its terminal form after `attempts` tries.
    ///
    /// Connection failures count as timeouts. Terminal kinds are returned unchanged.
    pub fn exhausted(self, attempts: u32) -> Self {
        match self {
            ProviderErrorKind::RateLimited { .. } => {
                ProviderErrorKind::RateLimitExhausted { attempts }
            }
            ProviderErrorKind::Timeout | ProviderErrorKind::Connection(_) => {
                ProviderErrorKind::TimeoutExhausted { attempts }
            }
            other => other,
        }
    }
}

/// Provider error with source location tracking.
///
/// # Examples
///
/// ```
/// use mimesis_error::{ProviderError, ProviderErrorKind};
///
/// let err = ProviderError::new(ProviderErrorKind::TimeoutExhausted { attempts: 3 });
/// assert!(format!("{}", err).contains("3 attempts"));
/// assert!(!err.kind.is_transient());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The kind of error that occurred
    pub kind: ProviderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
