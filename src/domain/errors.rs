//! Domain error types
//!
//! This module defines the error hierarchy for emrlink. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main emrlink error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum EmrLinkError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// EMR adapter errors
    #[error("EMR error: {0}")]
    Emr(#[from] EmrError),

    /// Clinical assistant errors
    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persisted settings errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// EMR adapter errors
///
/// Every variant carries the vendor name so callers can log and present the
/// failure without knowing which adapter produced it.
#[derive(Debug, Error)]
pub enum EmrError {
    /// Requested patient does not exist in the vendor system
    #[error("{vendor}: patient not found: {patient_id}")]
    PatientNotFound { vendor: String, patient_id: String },

    /// Requested consultation does not exist in the vendor system
    #[error("{vendor}: consultation not found: {consultation_id}")]
    ConsultationNotFound {
        vendor: String,
        consultation_id: String,
    },

    /// Vendor rejected the credentials
    #[error("{vendor}: authentication failed: {message}")]
    AuthenticationFailed { vendor: String, message: String },

    /// Network-level failure (DNS, refused connection, timeout)
    #[error("{vendor}: connection error during {operation}: {message}")]
    Connection {
        vendor: String,
        operation: String,
        message: String,
    },

    /// Vendor answered with an unexpected status or rejected a write
    #[error("{vendor}: {operation} failed{}: {message}", status_suffix(.status))]
    Request {
        vendor: String,
        operation: String,
        status: Option<u16>,
        message: String,
    },

    /// Vendor answered with a payload that cannot be translated
    #[error("{vendor}: invalid response for {operation}: {message}")]
    InvalidResponse {
        vendor: String,
        operation: String,
        message: String,
    },

    /// Mandatory adapter configuration is absent
    #[error("Missing required configuration for {vendor} adapter: {}", .fields.join(", "))]
    MissingConfig { vendor: String, fields: Vec<String> },

    /// No constructor registered for the vendor name
    #[error("Unsupported EMR adapter: {0}")]
    UnsupportedVendor(String),

    /// No instance exists yet for the vendor name
    #[error("EMR adapter not configured: {0}")]
    NotConfigured(String),

    /// Caller supplied a query the adapter refuses to run
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with status {s}")).unwrap_or_default()
}

impl EmrError {
    /// Returns true if the error means the requested record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EmrError::PatientNotFound { .. } | EmrError::ConsultationNotFound { .. }
        )
    }

    /// Returns true if the vendor rejected the credentials
    pub fn is_authentication(&self) -> bool {
        matches!(self, EmrError::AuthenticationFailed { .. })
    }
}

/// Clinical assistant errors
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The provider call failed at the transport level or returned an error status
    #[error("{provider} request failed: {message}")]
    Request { provider: String, message: String },

    /// The provider answered with something that is not a completion
    #[error("{provider} returned an invalid response: {message}")]
    InvalidResponse { provider: String, message: String },

    /// The provider is missing settings it needs
    #[error("{provider} is not configured: {message}")]
    Configuration { provider: String, message: String },
}

// Conversion from std::io::Error
impl From<std::io::Error> for EmrLinkError {
    fn from(err: std::io::Error) -> Self {
        EmrLinkError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for EmrLinkError {
    fn from(err: serde_json::Error) -> Self {
        EmrLinkError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for EmrLinkError {
    fn from(err: toml::de::Error) -> Self {
        EmrLinkError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emrlink_error_display() {
        let err = EmrLinkError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_emr_error_conversion() {
        let emr_err = EmrError::NotConfigured("OSCAR".to_string());
        let err: EmrLinkError = emr_err.into();
        assert!(matches!(err, EmrLinkError::Emr(_)));
    }

    #[test]
    fn test_missing_config_names_every_field() {
        let err = EmrError::MissingConfig {
            vendor: "OSCAR".to_string(),
            fields: vec!["baseUrl".to_string(), "clinicId".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required configuration for OSCAR adapter: baseUrl, clinicId"
        );
    }

    #[test]
    fn test_request_error_includes_status_when_known() {
        let err = EmrError::Request {
            vendor: "EPIC".to_string(),
            operation: "get_patient_data".to_string(),
            status: Some(500),
            message: "boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "EPIC: get_patient_data failed with status 500: boom"
        );

        let err = EmrError::Request {
            vendor: "EPIC".to_string(),
            operation: "save_consultation".to_string(),
            status: None,
            message: "no id".to_string(),
        };
        assert_eq!(err.to_string(), "EPIC: save_consultation failed: no id");
    }

    #[test]
    fn test_not_found_classification() {
        let err = EmrError::PatientNotFound {
            vendor: "GENERIC".to_string(),
            patient_id: "PAT-404".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_authentication());
        assert!(!EmrError::UnsupportedVendor("X".to_string()).is_not_found());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: EmrLinkError = io_err.into();
        assert!(matches!(err, EmrLinkError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: EmrLinkError = json_err.into();
        assert!(matches!(err, EmrLinkError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: EmrLinkError = toml_err.into();
        assert!(matches!(err, EmrLinkError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
