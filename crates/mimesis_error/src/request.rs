//! Request assembly errors.

/// Why a request could not be assembled before sending.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RequestErrorKind {
    /// An engine request lacked instructions, content, or an output shape
    #[display("Incomplete engine request: {}", _0)]
    Incomplete(String),
    /// The provider request body could not be built from a transport call
    #[display("Invalid provider request body: {}", _0)]
    InvalidBody(String),
}

/// Request assembly error with location tracking.
///
/// # Examples
///
/// ```
/// use mimesis_error::{RequestError, RequestErrorKind};
///
/// let err = RequestError::new(RequestErrorKind::Incomplete("`shape` must be initialized".into()));
/// assert!(format!("{}", err).contains("Incomplete engine request"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Request Error: {} at line {} in {}", kind, line, file)]
pub struct RequestError {
    /// The kind of error that occurred
    pub kind: RequestErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl RequestError {
    /// Create a new request error with caller location tracking.
    #[track_caller]
    pub fn new(kind: RequestErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
