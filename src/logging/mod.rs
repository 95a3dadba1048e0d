//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Human-readable console output on stderr
//! - JSON file logging with rotation
//!
//! Vendor calls are logged with `vendor` and `operation` fields, never with
//! credentials.
//!
//! # Example
//!
//! ```no_run
//! use emrlink::logging::init_logging;
//! use emrlink::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(vendor = "OSCAR", "Adapter configured");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log an outbound vendor request
///
/// # Example
///
/// ```no_run
/// use emrlink::log_vendor_request;
///
/// log_vendor_request!("CLINICCLOUD", "get_patient_data", "/pacientes/cc-1");
/// ```
#[macro_export]
macro_rules! log_vendor_request {
    ($vendor:expr, $operation:expr, $path:expr) => {
        tracing::debug!(
            vendor = %$vendor,
            operation = $operation,
            path = %$path,
            "Sending vendor request"
        );
    };
}

/// Log a failed vendor call with its error
///
/// # Example
///
/// ```no_run
/// use emrlink::log_vendor_failure;
/// use emrlink::domain::EmrError;
///
/// let error = EmrError::NotConfigured("OSCAR".to_string());
/// log_vendor_failure!("OSCAR", "test_connection", &error);
/// ```
#[macro_export]
macro_rules! log_vendor_failure {
    ($vendor:expr, $operation:expr, $error:expr) => {
        tracing::warn!(
            vendor = %$vendor,
            operation = $operation,
            error = %$error,
            "Vendor call failed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use emrlink::log_error_with_context;
/// use emrlink::domain::EmrLinkError;
///
/// let error = EmrLinkError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
