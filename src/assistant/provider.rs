//! Assistant provider trait and shared HTTP handling

use super::types::{AssistantQuery, AssistantResponse};
use crate::config::{AssistantConfig, SecretString};
use crate::domain::{AssistantError, EmrLinkError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Language model backend behind the clinical assistant
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Short provider name, e.g. `openai`
    fn name(&self) -> &str;

    /// Send one query and reshape the completion
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Request`] on transport failures and error
    /// statuses, [`AssistantError::InvalidResponse`] when the reply carries
    /// no completion
    async fn process_query(&self, query: &AssistantQuery) -> Result<AssistantResponse>;
}

/// HTTP client and credentials shared by the provider implementations
#[derive(Debug, Clone)]
pub(crate) struct ProviderHttp {
    provider: &'static str,
    client: Client,
    api_key: SecretString,
}

impl ProviderHttp {
    pub(crate) fn new(provider: &'static str, config: &AssistantConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.expose_secret().is_blank())
            .ok_or_else(|| configuration(provider, "api_key is required"))?;

        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()
            .map_err(|e| configuration(provider, &format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            provider,
            client,
            api_key,
        })
    }

    pub(crate) fn post(&self, url: &str) -> RequestBuilder {
        let key: &str = self.api_key.expose_secret().as_ref();
        self.client.post(url).bearer_auth(key)
    }

    /// Send a request and decode its JSON body
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| self.request_error(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.request_error(e.to_string()))?;

        if !status.is_success() {
            let detail = error_detail(&body);
            tracing::warn!(provider = self.provider, status = status.as_u16(), "Assistant request rejected");
            return Err(self.request_error(format!("HTTP {}: {detail}", status.as_u16())));
        }

        serde_json::from_slice(&body).map_err(|e| self.invalid_response(e.to_string()))
    }

    pub(crate) fn request_error(&self, message: String) -> EmrLinkError {
        AssistantError::Request {
            provider: self.provider.to_string(),
            message,
        }
        .into()
    }

    pub(crate) fn invalid_response(&self, message: String) -> EmrLinkError {
        AssistantError::InvalidResponse {
            provider: self.provider.to_string(),
            message,
        }
        .into()
    }
}

pub(crate) fn configuration(provider: &str, message: &str) -> EmrLinkError {
    AssistantError::Configuration {
        provider: provider.to_string(),
        message: message.to_string(),
    }
    .into()
}

/// `error.message` from an API error body, else the body text itself
fn error_detail(body: &[u8]) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_slice(body).ok();
    let message = parsed.as_ref().and_then(|v| {
        v.pointer("/error/message")
            .or_else(|| v.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
    });

    message.unwrap_or_else(|| {
        let text = String::from_utf8_lossy(body);
        text.chars().take(200).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    #[test]
    fn test_missing_api_key_is_configuration_error() {
        let config = AssistantConfig::default();
        let err = ProviderHttp::new("openai", &config).unwrap_err();
        assert!(matches!(
            err,
            EmrLinkError::Assistant(AssistantError::Configuration { .. })
        ));

        let config = AssistantConfig {
            api_key: Some(secret_string("   ".to_string())),
            ..AssistantConfig::default()
        };
        assert!(ProviderHttp::new("openai", &config).is_err());
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(
            error_detail(br#"{"error": {"message": "Incorrect API key provided"}}"#),
            "Incorrect API key provided"
        );
        assert_eq!(error_detail(br#"{"message": "quota exceeded"}"#), "quota exceeded");
        assert_eq!(error_detail(b"Bad Gateway"), "Bad Gateway");
    }
}
