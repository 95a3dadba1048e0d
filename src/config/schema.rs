//! Configuration schema types
//!
//! This module defines the structure of `emrlink.toml`. Every section has
//! defaults, so an empty file is a valid configuration.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main emrlink configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmrLinkConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Where the active adapter selection is persisted
    #[serde(default)]
    pub storage: StorageConfig,

    /// Outbound HTTP settings shared by the vendor adapters
    #[serde(default)]
    pub http: HttpConfig,

    /// Clinical assistant provider
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EmrLinkConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.storage.validate()?;
        self.http.validate()?;
        self.assistant.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Persisted settings location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the active adapter name and configuration
    #[serde(default = "default_settings_path")]
    pub settings_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
        }
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.settings_path.trim().is_empty() {
            return Err("storage.settings_path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Outbound HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout applied when an adapter config does not set its own
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl HttpConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_seconds == 0 || self.timeout_seconds > 600 {
            return Err("http.timeout_seconds must be between 1 and 600".to_string());
        }
        Ok(())
    }
}

/// Assistant provider selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantProvider {
    /// OpenAI chat completions
    #[default]
    OpenAi,
    /// Google Med-PaLM on Vertex AI
    MedPalm,
}

impl std::fmt::Display for AssistantProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssistantProvider::OpenAi => write!(f, "openai"),
            AssistantProvider::MedPalm => write!(f, "medpalm"),
        }
    }
}

impl std::str::FromStr for AssistantProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(AssistantProvider::OpenAi),
            "medpalm" => Ok(AssistantProvider::MedPalm),
            other => Err(format!(
                "Invalid assistant provider '{other}'. Must be one of: openai, medpalm"
            )),
        }
    }
}

/// Clinical assistant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default)]
    pub provider: AssistantProvider,

    /// OpenAI API key or Vertex AI access token
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Model name; defaults per provider when absent
    #[serde(default)]
    pub model: Option<String>,

    /// Override for the provider's API root
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Insights and recommendations below this confidence are dropped
    #[serde(default)]
    pub min_confidence: f64,

    /// Google Cloud project (Med-PaLM only)
    #[serde(default)]
    pub project_id: Option<String>,

    /// Vertex AI region (Med-PaLM only)
    #[serde(default = "default_location")]
    pub location: String,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            provider: AssistantProvider::default(),
            api_key: None,
            model: None,
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            min_confidence: 0.0,
            project_id: None,
            location: default_location(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl AssistantConfig {
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("assistant.temperature must be between 0.0 and 2.0".to_string());
        }
        if self.max_tokens == 0 {
            return Err("assistant.max_tokens must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err("assistant.min_confidence must be between 0.0 and 1.0".to_string());
        }
        if self.timeout_seconds == 0 {
            return Err("assistant.timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }

    /// Model to request, falling back to the provider default
    pub fn model_name(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(model), _) => model,
            (None, AssistantProvider::OpenAi) => "gpt-4",
            (None, AssistantProvider::MedPalm) => "medpalm2",
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_settings_path() -> String {
    ".emrlink/settings.json".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_location() -> String {
    "us-central1".to_string()
}

fn default_local_path() -> String {
    "/var/log/emrlink".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
