//! Tick orchestration error types.

/// Specific error conditions for tick execution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum TickErrorKind {
    /// Loaded state was not in the `paused` status
    #[display("Simulation is not paused (status: {})", _0)]
    NotPaused(String),
    /// A phase reported failure; the tick is aborted
    #[display("Phase '{}' failed: {}", phase, message)]
    PhaseFailed {
        /// Phase name
        phase: String,
        /// Failure description
        message: String,
    },
    /// The post-tick state could not be persisted
    #[display("Failed to persist tick state: {}", _0)]
    Persistence(String),
    /// The loaded tick counter cannot be advanced
    #[display("Tick counter {} cannot advance", _0)]
    CounterOverflow(u64),
}

/// Error type for tick execution.
///
/// # Examples
///
/// ```
/// use mimesis_error::{TickError, TickErrorKind};
///
/// let err = TickError::new(TickErrorKind::NotPaused("running".to_string()));
/// assert!(format!("{}", err).contains("not paused"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Tick Error: {} at line {} in {}", kind, line, file)]
pub struct TickError {
    /// The specific error condition
    pub kind: TickErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl TickError {
    /// Create a new TickError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TickErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
