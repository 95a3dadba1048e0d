//! Configuration management for emrlink.
//!
//! Two kinds of configuration live here:
//!
//! - the application file `emrlink.toml` ([`EmrLinkConfig`]), loaded once at
//!   startup by [`load_config`];
//! - per-vendor adapter settings ([`EmrAdapterConfig`]), supplied when an
//!   adapter is configured and persisted by the settings store.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use emrlink::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("emrlink.toml")?;
//!
//! println!("Settings file: {}", config.storage.settings_path);
//! println!("HTTP timeout: {}s", config.http.timeout_seconds);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [storage]
//! settings_path = ".emrlink/settings.json"
//!
//! [http]
//! timeout_seconds = 30
//!
//! [assistant]
//! provider = "openai"
//! api_key = "${OPENAI_API_KEY}"
//! model = "gpt-4"
//!
//! [logging]
//! local_enabled = false
//! local_path = "/var/log/emrlink"
//! local_rotation = "daily"
//! ```
//!
//! # Environment Variables
//!
//! `${VAR_NAME}` placeholders are substituted before parsing, and any
//! `EMRLINK_<SECTION>_<KEY>` variable overrides the parsed value:
//!
//! ```bash
//! export OPENAI_API_KEY="sk-..."
//! export EMRLINK_HTTP_TIMEOUT_SECONDS=10
//! ```

pub mod adapter;
pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use adapter::EmrAdapterConfig;
pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApplicationConfig, AssistantConfig, AssistantProvider, EmrLinkConfig, HttpConfig,
    LoggingConfig, StorageConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
