//! Chain addressing errors.

/// Specific chain error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ChainErrorKind {
    /// Key did not split into `purpose:entity_id` with both parts non-empty
    #[display("Invalid chain key '{}': expected 'purpose:entity_id'", _0)]
    InvalidKey(String),
}

/// Chain error with location tracking.
///
/// # Examples
///
/// ```
/// use mimesis_error::{ChainError, ChainErrorKind};
///
/// let err = ChainError::new(ChainErrorKind::InvalidKey("bob".to_string()));
/// assert!(format!("{}", err).contains("purpose:entity_id"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Chain Error: {} at line {} in {}", kind, line, file)]
pub struct ChainError {
    /// The specific error condition
    pub kind: ChainErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ChainError {
    /// Create a new ChainError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ChainErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
