//! Top-level error wrapper types.

use crate::{
    ChainError, ConfigError, JsonError, ProviderError, RequestError, StorageError, TickError,
    WebhookError,
};

/// Every error condition a Mimesis crate can surface.
///
/// # Examples
///
/// ```
/// use mimesis_error::{MimesisError, WebhookError, WebhookErrorKind};
///
/// let webhook_err = WebhookError::new(WebhookErrorKind::Rejected(502));
/// let err: MimesisError = webhook_err.into();
/// assert!(format!("{}", err).contains("Webhook Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MimesisErrorKind {
    /// Chat webhook delivery error
    #[from(WebhookError)]
    Webhook(WebhookError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Request assembly error
    #[from(RequestError)]
    Request(RequestError),
    /// Provider transport error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Chain addressing error
    #[from(ChainError)]
    Chain(ChainError),
    /// Tick orchestration error
    #[from(TickError)]
    Tick(TickError),
    /// State storage error
    #[from(StorageError)]
    Storage(StorageError),
}

/// Mimesis error with kind discrimination.
///
/// # Examples
///
/// ```
/// use mimesis_error::{ConfigError, ConfigErrorKind, MimesisResult};
///
/// fn might_fail() -> MimesisResult<()> {
///     Err(ConfigError::new(ConfigErrorKind::MissingStatePath))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Mimesis Error: {}", _0)]
pub struct MimesisError(Box<MimesisErrorKind>);

impl MimesisError {
    /// Create a new error from a kind.
    pub fn new(kind: MimesisErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MimesisErrorKind {
        &self.0
    }

    /// The provider error kind, if this error came from the transport.
    pub fn provider_kind(&self) -> Option<&crate::ProviderErrorKind> {
        match self.kind() {
            MimesisErrorKind::Provider(e) => Some(&e.kind),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to MimesisErrorKind
impl<T> From<T> for MimesisError
where
    T: Into<MimesisErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Mimesis operations.
pub type MimesisResult<T> = std::result::Result<T, MimesisError>;
