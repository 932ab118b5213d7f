//! JSON encoding errors outside the provider transport.

/// What failed to encode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum JsonErrorKind {
    /// The content document sent to a phase's requests
    #[display("Failed to encode phase content: {}", _0)]
    PhaseContent(String),
    /// A narration event written by the file narrator
    #[display("Failed to encode narration: {}", _0)]
    Narration(String),
}

/// JSON error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} at line {} in {}", kind, line, file)]
pub struct JsonError {
    /// The kind of error that occurred
    pub kind: JsonErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Create a new JSON error at the current location.
    #[track_caller]
    pub fn new(kind: JsonErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
