//! Result type alias for emrlink
//!
//! This module provides a convenient Result type alias that uses EmrLinkError
//! as the error type.

use super::errors::EmrLinkError;

/// Result type alias for emrlink operations
///
/// # Examples
///
/// ```
/// use emrlink::domain::result::Result;
/// use emrlink::domain::errors::EmrLinkError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(EmrLinkError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, EmrLinkError>;
