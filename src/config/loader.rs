//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::EmrLinkConfig;
use super::secret::secret_string;
use crate::domain::errors::EmrLinkError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into EmrLinkConfig
/// 4. Applies environment variable overrides (EMRLINK_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use emrlink::config::loader::load_config;
///
/// let config = load_config("emrlink.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<EmrLinkConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(EmrLinkError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        EmrLinkError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Loads configuration from `path` if it exists, otherwise starts from defaults
///
/// Environment overrides and validation apply in both cases.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<EmrLinkConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "Configuration file not found, using defaults");
    let mut config = EmrLinkConfig::default();
    apply_env_overrides(&mut config)?;
    config.validate().map_err(|e| {
        EmrLinkError::Configuration(format!("Configuration validation failed: {e}"))
    })?;
    Ok(config)
}

/// Parses TOML text through substitution, overrides and validation
pub fn parse_config(contents: &str) -> Result<EmrLinkConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: EmrLinkConfig = toml::from_str(&contents)
        .map_err(|e| EmrLinkError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        EmrLinkError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| EmrLinkError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        lines.push(processed.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(EmrLinkError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using EMRLINK_* prefix
///
/// Environment variables follow the pattern: EMRLINK_<SECTION>_<KEY>
/// For example: EMRLINK_HTTP_TIMEOUT_SECONDS, EMRLINK_ASSISTANT_API_KEY
fn apply_env_overrides(config: &mut EmrLinkConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("EMRLINK_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Storage overrides
    if let Ok(val) = std::env::var("EMRLINK_STORAGE_SETTINGS_PATH") {
        config.storage.settings_path = val;
    }

    // HTTP overrides
    if let Ok(val) = std::env::var("EMRLINK_HTTP_TIMEOUT_SECONDS") {
        config.http.timeout_seconds = parse_override("EMRLINK_HTTP_TIMEOUT_SECONDS", &val)?;
    }

    // Assistant overrides
    if let Ok(val) = std::env::var("EMRLINK_ASSISTANT_PROVIDER") {
        config.assistant.provider = val.parse().map_err(EmrLinkError::Configuration)?;
    }
    if let Ok(val) = std::env::var("EMRLINK_ASSISTANT_API_KEY") {
        config.assistant.api_key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("EMRLINK_ASSISTANT_MODEL") {
        config.assistant.model = Some(val);
    }
    if let Ok(val) = std::env::var("EMRLINK_ASSISTANT_BASE_URL") {
        config.assistant.base_url = Some(val);
    }
    if let Ok(val) = std::env::var("EMRLINK_ASSISTANT_MIN_CONFIDENCE") {
        config.assistant.min_confidence =
            parse_override("EMRLINK_ASSISTANT_MIN_CONFIDENCE", &val)?;
    }
    if let Ok(val) = std::env::var("EMRLINK_ASSISTANT_PROJECT_ID") {
        config.assistant.project_id = Some(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("EMRLINK_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("EMRLINK_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        EmrLinkError::Configuration(format!("Invalid value for {name}: '{value}'"))
    })
}
