//! OAuth2 client-credentials token cache
//!
//! Tokens are fetched on first use and reused until shortly before they
//! expire. The cache sits behind a `tokio::sync::Mutex` so concurrent calls on
//! one adapter share a single token request.

use super::http::VendorHttp;
use crate::domain::{EmrError, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Tokens are refreshed this long before their reported expiry
const EXPIRY_MARGIN_SECONDS: i64 = 60;

/// Lifetime assumed when the token endpoint omits `expires_in`
const DEFAULT_EXPIRES_IN: i64 = 3600;

/// Upper bound on a cached token's lifetime, whatever the vendor reports
const MAX_EXPIRES_IN: i64 = 86_400;

/// Client-credentials grant parameters
#[derive(Clone)]
pub struct ClientCredentials {
    pub token_path: String,
    pub client_id: String,
    pub client_secret: crate::config::SecretString,
    pub scope: Option<String>,
    /// Extra headers the vendor wants on the token request
    pub headers: Vec<(&'static str, String)>,
}

#[derive(Debug, Default)]
struct TokenState {
    access_token: Option<String>,
    token_expiry: Option<DateTime<Utc>>,
}

impl TokenState {
    fn valid_token(&self, now: DateTime<Utc>) -> Option<&str> {
        match (&self.access_token, self.token_expiry) {
            (Some(token), Some(expiry)) if now < expiry => Some(token),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct ClientCredentialsRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Cached bearer token for one adapter instance
#[derive(Clone, Default)]
pub struct TokenCache {
    state: Arc<Mutex<TokenState>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current bearer token, requesting a new one when absent or expired
    ///
    /// # Errors
    ///
    /// A rejected grant is [`EmrError::AuthenticationFailed`]; transport
    /// faults are [`EmrError::Connection`]
    pub async fn bearer(&self, http: &VendorHttp, credentials: &ClientCredentials) -> Result<String> {
        let mut state = self.state.lock().await;
        if let Some(token) = state.valid_token(Utc::now()) {
            return Ok(token.to_string());
        }

        tracing::debug!(
            vendor = http.vendor(),
            token_path = %credentials.token_path,
            client_id = %credentials.client_id,
            "Requesting OAuth2 access token"
        );

        let body = ClientCredentialsRequest {
            grant_type: "client_credentials",
            client_id: &credentials.client_id,
            client_secret: crate::config::secret::expose(&credentials.client_secret),
            scope: credentials.scope.as_deref(),
        };

        let mut request = http.post(&credentials.token_path).form(&body);
        for (name, value) in &credentials.headers {
            request = request.header(*name, value);
        }

        let response = http.send("authenticate", request).await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    EmrError::AuthenticationFailed {
                        vendor: http.vendor().to_string(),
                        message: format!("token request rejected with status {status}: {message}"),
                    }
                }
                _ => EmrError::Request {
                    vendor: http.vendor().to_string(),
                    operation: "authenticate".to_string(),
                    status: Some(status.as_u16()),
                    message,
                },
            }
            .into());
        }

        let token: TokenResponse = http.decode("authenticate", response).await?;
        let expiry = token_expiry(Utc::now(), token.expires_in);

        state.access_token = Some(token.access_token.clone());
        state.token_expiry = Some(expiry);

        tracing::info!(vendor = http.vendor(), expires_at = %expiry, "Acquired OAuth2 access token");

        Ok(token.access_token)
    }

    /// Drop the cached token so the next call re-authenticates
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        *state = TokenState::default();
    }
}

/// When a token granted at `now` should be refreshed
fn token_expiry(now: DateTime<Utc>, expires_in: Option<u64>) -> DateTime<Utc> {
    let lifetime = expires_in
        .map(|secs| i64::try_from(secs).unwrap_or(i64::MAX).min(MAX_EXPIRES_IN))
        .unwrap_or(DEFAULT_EXPIRES_IN);
    let usable = (lifetime - EXPIRY_MARGIN_SECONDS).max(0);

    ChronoDuration::try_seconds(usable)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .unwrap_or_else(|| now + ChronoDuration::seconds(DEFAULT_EXPIRES_IN - EXPIRY_MARGIN_SECONDS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::domain::EmrLinkError;
    use mockito::{Matcher, Server};
    use std::time::Duration;

    fn credentials() -> ClientCredentials {
        ClientCredentials {
            token_path: "/oauth2/token".to_string(),
            client_id: "client".to_string(),
            client_secret: secret_string("secret".to_string()),
            scope: None,
            headers: Vec::new(),
        }
    }

    #[test]
    fn test_token_state_expiry() {
        let now = Utc::now();
        let state = TokenState {
            access_token: Some("t".to_string()),
            token_expiry: Some(now - ChronoDuration::seconds(1)),
        };
        assert!(state.valid_token(now).is_none());

        let state = TokenState {
            access_token: Some("t".to_string()),
            token_expiry: Some(now + ChronoDuration::seconds(30)),
        };
        assert_eq!(state.valid_token(now), Some("t"));
    }

    #[test]
    fn test_token_expiry_bounds() {
        let now = Utc::now();
        let day = now + ChronoDuration::seconds(MAX_EXPIRES_IN - EXPIRY_MARGIN_SECONDS);

        assert_eq!(token_expiry(now, Some(100_000_000_000_000_000)), day);
        assert_eq!(token_expiry(now, Some(u64::MAX)), day);
        assert_eq!(
            token_expiry(now, None),
            now + ChronoDuration::seconds(DEFAULT_EXPIRES_IN - EXPIRY_MARGIN_SECONDS)
        );
        assert_eq!(token_expiry(now, Some(600)), now + ChronoDuration::seconds(540));
        assert_eq!(token_expiry(now, Some(30)), now);
    }

    #[tokio::test]
    async fn test_huge_expires_in_still_caches_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth2/token")
            .with_status(200)
            .with_body(r#"{"access_token":"long","expires_in":18446744073709551615}"#)
            .expect(1)
            .create_async()
            .await;

        let http = VendorHttp::new("EPIC", &server.url(), Duration::from_secs(5)).unwrap();
        let cache = TokenCache::new();

        assert_eq!(cache.bearer(&http, &credentials()).await.unwrap(), "long");
        assert_eq!(cache.bearer(&http, &credentials()).await.unwrap(), "long");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_token_is_cached() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth2/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
                Matcher::UrlEncoded("client_id".into(), "client".into()),
                Matcher::UrlEncoded("client_secret".into(), "secret".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"access_token":"abc","expires_in":3600,"token_type":"Bearer"}"#)
            .expect(1)
            .create_async()
            .await;

        let http = VendorHttp::new("EPIC", &server.url(), Duration::from_secs(5)).unwrap();
        let cache = TokenCache::new();

        assert_eq!(cache.bearer(&http, &credentials()).await.unwrap(), "abc");
        assert_eq!(cache.bearer(&http, &credentials()).await.unwrap(), "abc");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_grant_is_authentication_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/oauth2/token")
            .with_status(401)
            .with_body(r#"{"error":"invalid_client"}"#)
            .create_async()
            .await;

        let http = VendorHttp::new("EPIC", &server.url(), Duration::from_secs(5)).unwrap();
        let err = TokenCache::new().bearer(&http, &credentials()).await.unwrap_err();
        assert!(matches!(err, EmrLinkError::Emr(ref e) if e.is_authentication()));
    }
}
