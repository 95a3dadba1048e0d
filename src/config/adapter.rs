//! EMR adapter configuration
//!
//! [`EmrAdapterConfig`] is the credential and endpoint bag handed to a vendor
//! adapter. It is persisted as JSON (camelCase keys) by the settings store and
//! is the identity used by the adapter factory's instance cache.

use super::secret::{expose, is_blank, secret_string, SecretString, REDACTED};
use crate::domain::errors::EmrError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default per-request timeout for vendor calls
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Vendor credential and endpoint configuration
///
/// Unknown keys are kept in `extra` so vendor-specific settings survive a
/// persist/load cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmrAdapterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<SecretString>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<SecretString>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<SecretString>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinic_id: Option<String>,

    /// OAuth2 token endpoint override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,

    /// Vendor-specific settings not modelled above
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl EmrAdapterConfig {
    /// Set a field by its camelCase key
    ///
    /// Unknown keys land in `extra` as strings.
    ///
    /// # Errors
    ///
    /// Returns an error if `timeoutSeconds` is not a positive integer
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), String> {
        let value = value.into();
        match key {
            "baseUrl" => self.base_url = Some(value),
            "apiUrl" => self.api_url = Some(value),
            "apiKey" => self.api_key = Some(secret_string(value)),
            "username" => self.username = Some(value),
            "password" => self.password = Some(secret_string(value)),
            "clientId" => self.client_id = Some(value),
            "clientSecret" => self.client_secret = Some(secret_string(value)),
            "clinicId" => self.clinic_id = Some(value),
            "tokenUrl" => self.token_url = Some(value),
            "timeoutSeconds" => {
                let seconds: u64 = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("timeoutSeconds must be a positive integer, got '{value}'"))?;
                if seconds == 0 {
                    return Err("timeoutSeconds must be > 0".to_string());
                }
                self.timeout_seconds = Some(seconds);
            }
            other => {
                self.extra
                    .insert(other.to_string(), serde_json::Value::String(value));
            }
        }
        Ok(())
    }

    /// Chainable form of [`set`](Self::set) for building configs in code
    ///
    /// # Errors
    ///
    /// Same as [`set`](Self::set)
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Result<Self, String> {
        self.set(key, value)?;
        Ok(self)
    }

    /// Build a config from `key=value` pairs
    ///
    /// # Errors
    ///
    /// Returns an error for a pair without `=` or an invalid value
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("Expected key=value, got '{pair}'"))?;
            config.set(key.trim(), value.trim())?;
        }
        Ok(config)
    }

    /// Returns true if the camelCase key holds a non-blank value
    pub fn has(&self, key: &str) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        match key {
            "baseUrl" => present(&self.base_url),
            "apiUrl" => present(&self.api_url),
            "apiKey" => !is_blank(self.api_key.as_ref()),
            "username" => present(&self.username),
            "password" => !is_blank(self.password.as_ref()),
            "clientId" => present(&self.client_id),
            "clientSecret" => !is_blank(self.client_secret.as_ref()),
            "clinicId" => present(&self.clinic_id),
            "tokenUrl" => present(&self.token_url),
            "timeoutSeconds" => self.timeout_seconds.is_some(),
            other => match self.extra.get(other) {
                None | Some(serde_json::Value::Null) => false,
                Some(serde_json::Value::String(s)) => !s.trim().is_empty(),
                Some(_) => true,
            },
        }
    }

    /// Fail unless every listed key is present
    ///
    /// # Errors
    ///
    /// Returns [`EmrError::MissingConfig`] naming every missing key, in the
    /// order given
    pub fn require(&self, vendor: &str, keys: &[&str]) -> Result<(), EmrError> {
        let missing: Vec<String> = keys
            .iter()
            .filter(|key| !self.has(key))
            .map(|key| key.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(EmrError::MissingConfig {
                vendor: vendor.to_string(),
                fields: missing,
            })
        }
    }

    /// Per-request timeout, falling back to `default`
    pub fn timeout_or(&self, default: Duration) -> Duration {
        self.timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(default)
    }

    /// Per-request timeout, falling back to 30 seconds
    pub fn timeout(&self) -> Duration {
        self.timeout_or(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
    }

    /// Plain text of the API key, if set
    pub fn api_key_str(&self) -> Option<&str> {
        self.api_key.as_ref().map(expose)
    }

    /// Plain text of the password, if set
    pub fn password_str(&self) -> Option<&str> {
        self.password.as_ref().map(expose)
    }

    /// Plain text of the client secret, if set
    pub fn client_secret_str(&self) -> Option<&str> {
        self.client_secret.as_ref().map(expose)
    }

    /// Identity of this configuration for instance caching
    ///
    /// Two configs with equal fields (secrets included) have the same
    /// fingerprint. The digest never reveals the secrets it covers.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let digest = Sha256::digest(&canonical);
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// JSON form with secrets replaced by a placeholder, for display
    pub fn redacted(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        if let Some(map) = value.as_object_mut() {
            for key in ["apiKey", "password", "clientSecret"] {
                if let Some(slot) = map.get_mut(key) {
                    *slot = serde_json::Value::String(REDACTED.to_string());
                }
            }
        }
        value
    }
}

impl PartialEq for EmrAdapterConfig {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint() == other.fingerprint()
    }
}

impl Eq for EmrAdapterConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    fn oscar_config() -> EmrAdapterConfig {
        EmrAdapterConfig::from_pairs([
            "baseUrl=https://oscar.example.com",
            "username=doctor",
            "password=s3cret",
            "clinicId=clinic-1",
        ])
        .unwrap()
    }

    #[test]
    fn test_equal_configs_share_fingerprint() {
        assert_eq!(oscar_config().fingerprint(), oscar_config().fingerprint());
        assert_eq!(oscar_config(), oscar_config());
    }

    #[test]
    fn test_secret_changes_fingerprint() {
        let other = oscar_config().with("password", "different").unwrap();
        assert_ne!(oscar_config().fingerprint(), other.fingerprint());
    }

    #[test]
    fn test_fingerprint_does_not_leak_secret() {
        let fingerprint = oscar_config().fingerprint();
        assert_eq!(fingerprint.len(), 64);
        assert!(!fingerprint.contains("s3cret"));
    }

    #[test]
    fn test_require_names_every_missing_field() {
        let config = EmrAdapterConfig::from_pairs(["username=doctor"]).unwrap();
        let err = config
            .require("OSCAR", &["baseUrl", "username", "password", "clinicId"])
            .unwrap_err();

        match err {
            EmrError::MissingConfig { vendor, fields } => {
                assert_eq!(vendor, "OSCAR");
                assert_eq!(fields, vec!["baseUrl", "password", "clinicId"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let config = EmrAdapterConfig::from_pairs(["apiUrl=  ", "apiKey="]).unwrap();
        assert!(!config.has("apiUrl"));
        assert!(!config.has("apiKey"));
    }

    #[test]
    fn test_unknown_keys_go_to_extra_and_round_trip() {
        let config = EmrAdapterConfig::from_pairs(["apiUrl=https://cc", "region=eu"]).unwrap();
        assert!(config.has("region"));

        let json = serde_json::to_string(&config).unwrap();
        let back: EmrAdapterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.extra.get("region"), Some(&serde_json::json!("eu")));
        assert_eq!(back, config);
    }

    #[test]
    fn test_redacted_hides_secrets() {
        let redacted = oscar_config().redacted();
        assert_eq!(redacted["password"], REDACTED);
        assert_eq!(redacted["username"], "doctor");
        assert!(!redacted.to_string().contains("s3cret"));
    }

    #[test]
    fn test_debug_hides_secrets() {
        assert!(!format!("{:?}", oscar_config()).contains("s3cret"));
    }

    #[test]
    fn test_timeout_parsing() {
        let config = EmrAdapterConfig::from_pairs(["timeoutSeconds=5"]).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(EmrAdapterConfig::default().timeout(), Duration::from_secs(30));
        assert!(EmrAdapterConfig::from_pairs(["timeoutSeconds=0"]).is_err());
        assert!(EmrAdapterConfig::from_pairs(["timeoutSeconds=soon"]).is_err());
        assert!(EmrAdapterConfig::from_pairs(["novalue"]).is_err());
    }
}
