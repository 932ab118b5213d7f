//! Layered TOML configuration.
//!
//! Sources, later overriding earlier:
//! 1. Bundled defaults (`mimesis.toml` compiled into the library)
//! 2. `~/.config/mimesis/mimesis.toml`
//! 3. `./mimesis.toml`

use config::{Config, File, FileFormat};
use mimesis_core::EntityScope;
use mimesis_error::{ConfigError, ConfigErrorKind, MimesisError, MimesisResult};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../mimesis.toml");

/// Provider connection and generation settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Model identifier
    pub model: String,
    /// Base URL of the Responses API
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Reasoning effort knob (`minimal`, `low`, `medium`, `high`)
    pub reasoning_effort: Option<String>,
    /// Output verbosity knob (`low`, `medium`, `high`)
    pub verbosity: Option<String>,
    /// Maximum output tokens per response
    pub max_output_tokens: Option<u32>,
    /// Context truncation strategy (`auto` or `disabled`)
    pub truncation: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            model: "gpt-5-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            reasoning_effort: None,
            verbosity: None,
            max_output_tokens: None,
            truncation: None,
        }
    }
}

/// Retry bounds for transient provider conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per call, first attempt included
    pub max_attempts: u32,
    /// Wait after a timeout before the next attempt
    pub timeout_delay_ms: u64,
    /// Added to every rate-limit wait
    pub rate_limit_margin_ms: u64,
    /// Rate-limit wait when the provider sends no usable reset hint
    pub default_rate_limit_wait_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            timeout_delay_ms: 1000,
            rate_limit_margin_ms: 500,
            default_rate_limit_wait_ms: 1000,
        }
    }
}

/// Client-side request limits. `None` means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Requests per minute
    pub rpm: Option<u32>,
    /// Requests in flight at once
    pub max_concurrent: Option<u32>,
}

/// Default chain depths per entity collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainsConfig {
    /// Depth for character-scoped clients
    pub character_depth: usize,
    /// Depth for location-scoped clients
    pub location_depth: usize,
}

impl Default for ChainsConfig {
    fn default() -> Self {
        Self {
            character_depth: 3,
            location_depth: 2,
        }
    }
}

impl ChainsConfig {
    /// Default depth for a scope. Unscoped clients are stateless.
    pub fn depth_for(&self, scope: EntityScope) -> usize {
        match scope {
            EntityScope::Characters => self.character_depth,
            EntityScope::Locations => self.location_depth,
            EntityScope::None => 0,
        }
    }
}

/// Where the simulation state lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// State document path
    pub state_path: Option<String>,
}

/// One entry of the configured phase pipeline.
///
/// ```toml
/// [[phases]]
/// name = "intention"
/// scope = "characters"
/// instructions = "Decide what this character attempts next."
/// timeout_secs = 60
///
/// [phases.shape]
/// type = "object"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PhaseConfig {
    /// Phase name, unique within a tick
    pub name: String,
    /// Entity collection the phase prompts for
    #[serde(default)]
    pub scope: EntityScope,
    /// Chain purpose; defaults to the phase name
    #[serde(default)]
    pub purpose: Option<String>,
    /// System instructions for every request of the phase
    pub instructions: String,
    /// JSON schema of each response
    pub shape: JsonValue,
    /// Chain depth override
    #[serde(default)]
    pub depth: Option<usize>,
    /// Per-attempt timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Fail the phase (and the tick) when any of its requests fails
    #[serde(default)]
    pub required: bool,
}

fn default_timeout_secs() -> u64 {
    60
}

impl PhaseConfig {
    /// Chain purpose of this phase.
    pub fn purpose(&self) -> &str {
        self.purpose.as_deref().unwrap_or(&self.name)
    }

    /// Per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level Mimesis configuration.
///
/// # Example
///
/// ```no_run
/// use mimesis_rate_limit::MimesisConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = MimesisConfig::load()?;
/// println!("model: {}", config.provider.model);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MimesisConfig {
    /// Provider settings
    #[serde(default)]
    pub provider: ProviderSettings,
    /// Retry bounds
    #[serde(default)]
    pub retry: RetryConfig,
    /// Request limits
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Chain depths
    #[serde(default)]
    pub chains: ChainsConfig,
    /// Storage settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Ordered phase pipeline
    #[serde(default)]
    pub phases: Vec<PhaseConfig>,
}

impl MimesisConfig {
    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped when absent.
    #[instrument]
    pub fn load() -> MimesisResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/mimesis/mimesis.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("mimesis").required(false));

        Self::deserialize_from(builder)
    }

    /// Load bundled defaults overlaid with a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> MimesisResult<Self> {
        debug!("Loading configuration from file");

        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()));

        Self::deserialize_from(builder)
    }

    /// Parse configuration from TOML text without the bundled defaults.
    pub fn from_toml_str(text: &str) -> MimesisResult<Self> {
        Self::deserialize_from(Config::builder().add_source(File::from_str(text, FileFormat::Toml)))
    }

    /// The phase named `name`, if configured.
    pub fn phase(&self, name: &str) -> Option<&PhaseConfig> {
        self.phases.iter().find(|phase| phase.name == name)
    }

    fn deserialize_from(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> MimesisResult<Self> {
        builder
            .build()
            .map_err(|e| {
                MimesisError::from(ConfigError::new(ConfigErrorKind::Load(e.to_string())))
            })?
            .try_deserialize()
            .map_err(|e| {
                MimesisError::from(ConfigError::new(ConfigErrorKind::Parse(e.to_string())))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = MimesisConfig::from_toml_str("").unwrap();
        assert_eq!(config.retry, RetryConfig::default());
        assert_eq!(config.provider.api_key_env, "OPENAI_API_KEY");
        assert!(config.phases.is_empty());
    }

    #[test]
    fn test_chain_depth_by_scope() {
        let chains = ChainsConfig {
            character_depth: 4,
            location_depth: 1,
        };
        assert_eq!(chains.depth_for(EntityScope::Characters), 4);
        assert_eq!(chains.depth_for(EntityScope::Locations), 1);
        assert_eq!(chains.depth_for(EntityScope::None), 0);
    }
}
