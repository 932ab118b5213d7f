//! Configuration and command-line setup errors.

/// Where configuration went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A configuration source could not be read or merged
    #[display("Failed to load configuration: {}", _0)]
    Load(String),
    /// The merged sources did not match the configuration schema
    #[display("Failed to parse configuration: {}", _0)]
    Parse(String),
    /// The effective configuration could not be rendered back to TOML
    #[display("Failed to render configuration: {}", _0)]
    Render(String),
    /// No state file was named on the command line or in `storage.state_path`
    #[display("No state file given: pass --state or set storage.state_path")]
    MissingStatePath,
}

/// Configuration error with source location.
///
/// # Examples
///
/// ```
/// use mimesis_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::MissingStatePath);
/// assert!(format!("{}", err).contains("storage.state_path"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The kind of error that occurred
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new configuration error at the current location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
