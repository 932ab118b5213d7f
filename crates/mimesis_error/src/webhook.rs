//! Chat webhook delivery errors.

/// How a webhook post went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum WebhookErrorKind {
    /// The post never produced a response (connect, timeout, body)
    #[display("Webhook post failed: {}", _0)]
    Delivery(String),
    /// The endpoint answered with a non-success status
    #[display("Webhook returned status {}", _0)]
    Rejected(u16),
}

/// Webhook error with location tracking.
///
/// # Examples
///
/// ```
/// use mimesis_error::{WebhookError, WebhookErrorKind};
///
/// let err = WebhookError::new(WebhookErrorKind::Rejected(500));
/// assert_eq!(err.kind, WebhookErrorKind::Rejected(500));
/// assert!(format!("{}", err).contains("status 500"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Webhook Error: {} at line {} in {}", kind, line, file)]
pub struct WebhookError {
    /// The kind of error that occurred
    pub kind: WebhookErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl WebhookError {
    /// Create a new webhook error with caller location tracking.
    #[track_caller]
    pub fn new(kind: WebhookErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
