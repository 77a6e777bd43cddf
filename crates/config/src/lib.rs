//! Configuration loading, validation, and management for Hearthline.
//!
//! Loads configuration from `~/.hearthline/config.toml` with environment
//! variable overrides. Validates all settings at load time — bad numeric
//! dynamics (a zero window bound, a decay rate that empties the window in a
//! single step) are construction errors, never silently tolerated.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.hearthline/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// Context window tuning
    #[serde(default)]
    pub context: ContextSettings,

    /// LLM generation parameters
    #[serde(default)]
    pub generation: GenerationSettings,

    /// History retention and sweep cadence
    #[serde(default)]
    pub history: HistorySettings,

    /// External provider endpoint
    #[serde(default)]
    pub provider: ProviderSettings,
}

/// Tuning for the per-author context window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSettings {
    /// Maximum resident turns per author
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Maximum age of a resident turn, in seconds
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,

    /// Relevance lost per minute of age, applied once per update pass
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,
}

fn default_max_length() -> usize {
    100
}
fn default_max_age_secs() -> u64 {
    900
}
fn default_decay_rate() -> f64 {
    0.05
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            max_age_secs: default_max_age_secs(),
            decay_rate: default_decay_rate(),
        }
    }
}

/// Parameters for completion requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Model identifier passed to the provider
    #[serde(default = "default_model")]
    pub model: String,

    /// Base sampling temperature (may be nudged per turn by sentiment)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Hard deadline for a single completion call, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_model() -> String {
    "alphamonarch-7b".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    150
}
fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// History-log retention and background sweep cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySettings {
    /// How often the background sweep runs, in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// How long history entries are kept, in seconds
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,
}

fn default_sweep_interval_secs() -> u64 {
    3600
}
fn default_retention_secs() -> u64 {
    24 * 60 * 60
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
            retention_secs: default_retention_secs(),
        }
    }
}

/// External LLM endpoint settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key, if the endpoint requires one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:1234/v1".into()
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
        }
    }
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .finish()
    }
}

impl EngineConfig {
    /// Load configuration from the default path (~/.hearthline/config.toml).
    ///
    /// Environment overrides (highest priority):
    /// - `HEARTHLINE_API_URL`
    /// - `HEARTHLINE_API_KEY`
    /// - `HEARTHLINE_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(url) = std::env::var("HEARTHLINE_API_URL") {
            config.provider.base_url = url;
        }
        if config.provider.api_key.is_none() {
            config.provider.api_key = std::env::var("HEARTHLINE_API_KEY").ok();
        }
        if let Ok(model) = std::env::var("HEARTHLINE_MODEL") {
            config.generation.model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".hearthline")
    }

    /// Validate the configuration.
    ///
    /// Invariant violations here are programming/deployment errors and fail
    /// fast rather than producing an engine that decays everything to zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.context.max_length == 0 {
            return Err(ConfigError::ValidationError(
                "context.max_length must be at least 1".into(),
            ));
        }

        if self.context.max_age_secs == 0 {
            return Err(ConfigError::ValidationError(
                "context.max_age_secs must be greater than 0".into(),
            ));
        }

        if self.context.decay_rate <= 0.0 || self.context.decay_rate >= 1.0 {
            return Err(ConfigError::ValidationError(
                "context.decay_rate must be in (0, 1)".into(),
            ));
        }

        if self.generation.temperature < 0.0 || self.generation.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "generation.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.generation.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "generation.request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.history.retention_secs == 0 || self.history.sweep_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "history retention and sweep interval must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for onboarding docs).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for hearthline_core::Error {
    fn from(err: ConfigError) -> Self {
        hearthline_core::Error::Config {
            message: err.to_string(),
        }
    }
}
