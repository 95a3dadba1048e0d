//! HTTP plumbing shared by the REST adapters
//!
//! [`VendorHttp`] owns one `reqwest::Client` per adapter instance and turns
//! transport faults, status codes and undecodable bodies into [`EmrError`]
//! values tagged with the vendor and operation.

use crate::domain::{EmrError, EmrLinkError, Result};
use crate::{log_vendor_failure, log_vendor_request};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Vendor-scoped HTTP client
#[derive(Debug, Clone)]
pub struct VendorHttp {
    vendor: &'static str,
    base_url: String,
    base: url::Url,
    client: Client,
}

impl VendorHttp {
    /// Build a client rooted at `base_url` with a per-request timeout
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL is not absolute http(s) or
    /// the TLS backend cannot be initialised
    pub fn new(vendor: &'static str, base_url: &str, timeout: Duration) -> Result<Self> {
        let base = url::Url::parse(base_url.trim()).map_err(|e| {
            EmrLinkError::Configuration(format!("{vendor}: invalid base URL '{base_url}': {e}"))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(EmrLinkError::Configuration(format!(
                "{vendor}: base URL must use http or https, got '{}'",
                base.scheme()
            )));
        }

        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()
            .map_err(|e| {
                EmrLinkError::Configuration(format!("{vendor}: failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            vendor,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            base,
            client,
        })
    }

    pub fn vendor(&self) -> &'static str {
        self.vendor
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Absolute URL for a path below the base URL
    ///
    /// Paths that are already absolute http(s) URLs are returned unchanged.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Absolute URL for `segments` below the base URL
    ///
    /// Each segment is percent-encoded on its own, `/`, `?` and `#`
    /// included, so a segment always stays one path component.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty, `.` or `..` segments, which
    /// cannot be expressed as a single component
    pub fn url_for(&self, segments: &[&str]) -> Result<String> {
        if let Some(bad) = segments.iter().find(|s| matches!(s.trim(), "" | "." | "..")) {
            return Err(EmrLinkError::Validation(format!(
                "{}: '{bad}' is not a valid resource id",
                self.vendor
            )));
        }

        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        Ok(url.into())
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path))
    }

    /// Send a request, mapping transport failures to [`EmrError::Connection`]
    pub async fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<Response> {
        let request = request.build().map_err(|e| self.connection_error(operation, &e))?;
        log_vendor_request!(self.vendor, operation, request.url().path());

        self.client
            .execute(request)
            .await
            .map_err(|e| self.connection_error(operation, &e))
    }

    /// Send and decode a JSON body from a 2xx response
    ///
    /// A 404 becomes `not_found`; any other non-success status becomes an
    /// error via [`status_error`](Self::status_error).
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
        not_found: impl FnOnce() -> EmrError,
    ) -> Result<T> {
        let response = self.send(operation, request).await?;
        match response.status() {
            status if status.is_success() => self.decode(operation, response).await,
            StatusCode::NOT_FOUND => Err(not_found().into()),
            _ => Err(self.status_error(operation, response).await),
        }
    }

    /// Decode a JSON body, mapping failures to [`EmrError::InvalidResponse`]
    pub async fn decode<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        response: Response,
    ) -> Result<T> {
        let body = response
            .bytes()
            .await
            .map_err(|e| self.connection_error(operation, &e))?;
        serde_json::from_slice(&body).map_err(|e| self.invalid_response(operation, e.to_string()))
    }

    /// Send a write and decode its acknowledgement
    ///
    /// An empty 2xx body decodes as `T::default()`.
    pub async fn write_json<T: DeserializeOwned + Default>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = self.send(operation, request).await?;
        if !response.status().is_success() {
            return Err(self.status_error(operation, response).await);
        }
        let body = response
            .text()
            .await
            .map_err(|e| self.connection_error(operation, &e))?;
        if body.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&body).map_err(|e| self.invalid_response(operation, e.to_string()))
    }

    /// Items of a list response
    ///
    /// Accepts a bare array, an object wrapping the array under `key`, or
    /// `null`; a wrapper without `key` reads as empty.
    pub fn unwrap_list<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        body: serde_json::Value,
        key: &str,
    ) -> Result<Vec<T>> {
        use serde_json::Value;

        let items = match body {
            Value::Array(_) => body,
            Value::Object(mut map) => map.remove(key).unwrap_or(Value::Array(Vec::new())),
            Value::Null => Value::Array(Vec::new()),
            other => {
                return Err(self.invalid_response(
                    operation,
                    format!("expected a list of {key}, got {other}"),
                ))
            }
        };
        serde_json::from_value(items).map_err(|e| self.invalid_response(operation, e.to_string()))
    }

    /// Error for a non-success response, carrying the status and body text
    pub async fn status_error(&self, operation: &'static str, response: Response) -> EmrLinkError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        } else {
            body
        };

        let error = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => EmrError::AuthenticationFailed {
                vendor: self.vendor.to_string(),
                message: format!("{operation} rejected with status {}: {message}", status.as_u16()),
            },
            _ => EmrError::Request {
                vendor: self.vendor.to_string(),
                operation: operation.to_string(),
                status: Some(status.as_u16()),
                message,
            },
        };
        log_vendor_failure!(self.vendor, operation, &error);
        error.into()
    }

    pub fn connection_error(&self, operation: &'static str, err: &reqwest::Error) -> EmrLinkError {
        let error = EmrError::Connection {
            vendor: self.vendor.to_string(),
            operation: operation.to_string(),
            message: err.to_string(),
        };
        log_vendor_failure!(self.vendor, operation, &error);
        error.into()
    }

    pub fn invalid_response(&self, operation: &'static str, message: impl Into<String>) -> EmrLinkError {
        EmrError::InvalidResponse {
            vendor: self.vendor.to_string(),
            operation: operation.to_string(),
            message: message.into(),
        }
        .into()
    }

    /// A write the vendor acknowledged without success
    pub fn rejected(&self, operation: &'static str, message: impl Into<String>) -> EmrLinkError {
        EmrError::Request {
            vendor: self.vendor.to_string(),
            operation: operation.to_string(),
            status: None,
            message: message.into(),
        }
        .into()
    }

    pub fn patient_not_found(&self, patient_id: &str) -> EmrError {
        EmrError::PatientNotFound {
            vendor: self.vendor.to_string(),
            patient_id: patient_id.to_string(),
        }
    }

    pub fn consultation_not_found(&self, consultation_id: &str) -> EmrError {
        EmrError::ConsultationNotFound {
            vendor: self.vendor.to_string(),
            consultation_id: consultation_id.to_string(),
        }
    }
}

/// Outcome of a connectivity probe
///
/// Authentication rejections read as `false`. Any other status the vendor
/// answers with is reported as a connection error.
pub fn connection_outcome(result: Result<()>) -> Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(EmrLinkError::Emr(err)) if err.is_authentication() => Ok(false),
        Err(EmrLinkError::Emr(EmrError::Request {
            vendor,
            operation,
            status,
            message,
        })) => {
            let message = match status {
                Some(code) => format!("HTTP {code}: {message}"),
                None => message,
            };
            Err(EmrError::Connection {
                vendor,
                operation,
                message,
            }
            .into())
        }
        Err(err) => Err(err),
    }
}

/// Parse a required vendor date, rejecting payloads that omit or garble it
pub fn required_date(
    http: &VendorHttp,
    operation: &'static str,
    field: &str,
    value: Option<&str>,
) -> Result<chrono::DateTime<chrono::Utc>> {
    let raw = value.ok_or_else(|| http.invalid_response(operation, format!("missing {field}")))?;
    crate::domain::dates::parse_timestamp(raw)
        .ok_or_else(|| http.invalid_response(operation, format!("unparseable {field} '{raw}'")))
}

/// Parse an optional vendor date, dropping values that do not parse
pub fn optional_date(value: Option<&str>) -> Option<chrono::DateTime<chrono::Utc>> {
    value.and_then(crate::domain::dates::parse_timestamp)
}

/// Vendor numbers arrive as JSON numbers or numeric strings
pub fn number_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Vendor ids arrive as JSON strings or numbers
pub fn id_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
