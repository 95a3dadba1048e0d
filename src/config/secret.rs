//! Secure credential handling using the secrecy crate
//!
//! API keys, passwords and client secrets for the vendor adapters and the
//! assistant provider are held as [`SecretString`]. The value is zeroed on drop,
//! redacted from `Debug`, and only reachable through `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use emrlink::config::{secret_string, SecretString};
//! use secrecy::ExposeSecret;
//!
//! let api_key: SecretString = secret_string("cc-api-key".to_string());
//! let exposed: &str = api_key.expose_secret().as_ref();
//! assert_eq!(exposed, "cc-api-key");
//!
//! // Debug output is redacted
//! assert!(!format!("{api_key:?}").contains("cc-api-key"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, ExposeSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Placeholder written wherever a secret would otherwise be displayed
pub const REDACTED: &str = "********";

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Type alias for a secret string
pub type SecretString = Secret<SecretValue>;

/// Wrap a String as a SecretString
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Wrap an optional String as an optional SecretString
#[inline]
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(secret_string)
}

/// Borrow the plain text of a secret
#[inline]
pub fn expose(secret: &SecretString) -> &str {
    secret.expose_secret().as_ref()
}

/// Returns true if the optional secret is absent or blank
pub fn is_blank(secret: Option<&SecretString>) -> bool {
    secret.map_or(true, |s| s.expose_secret().is_blank())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("test-password".to_string());
        assert_eq!(expose(&secret), "test-password");
    }

    #[test]
    fn test_secret_string_opt() {
        assert!(secret_string_opt(Some("x".to_string())).is_some());
        assert!(secret_string_opt(None).is_none());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-data".to_string());
        let debug_output = format!("{secret:?}");

        assert!(!debug_output.contains("sensitive-data"));
        assert!(debug_output.contains("REDACTED") || debug_output.contains("Secret"));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&secret_string("  ".to_string()))));
        assert!(!is_blank(Some(&secret_string("k".to_string()))));
    }

    #[test]
    fn test_secret_serde() {
        #[derive(Serialize, Deserialize)]
        struct Credentials {
            password: SecretString,
        }

        let creds = Credentials {
            password: secret_string("test123".to_string()),
        };

        let json = serde_json::to_string(&creds).unwrap();
        assert!(json.contains("test123"));

        let back: Credentials = serde_json::from_str(&json).unwrap();
        assert_eq!(expose(&back.password), "test123");
    }
}
