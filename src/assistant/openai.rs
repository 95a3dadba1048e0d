//! OpenAI chat completions provider

use super::parse::parse_completion;
use super::prompt::{user_message, SYSTEM_PROMPT};
use super::provider::{AiProvider, ProviderHttp};
use super::types::{AssistantQuery, AssistantResponse};
use crate::config::AssistantConfig;
use crate::domain::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const PROVIDER_NAME: &str = "openai";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completions client asking for a JSON object reply
#[derive(Debug)]
pub struct OpenAiProvider {
    http: ProviderHttp,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    min_confidence: f64,
}

impl OpenAiProvider {
    /// # Errors
    ///
    /// Returns a configuration error when no API key is set
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let http = ProviderHttp::new(PROVIDER_NAME, config)?;
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');

        Ok(Self {
            http,
            endpoint: format!("{base_url}/chat/completions"),
            model: config.model_name().to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            min_confidence: config.min_confidence,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn process_query(&self, query: &AssistantQuery) -> Result<AssistantResponse> {
        let user = user_message(query)?;
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: ResponseFormat { kind: "json_object" },
        };

        tracing::info!(
            provider = PROVIDER_NAME,
            model = %self.model,
            with_patient = query.context.is_some(),
            "Sending assistant query"
        );

        let reply: ChatResponse = self
            .http
            .send_json(self.http.post(&self.endpoint).json(&body))
            .await?;

        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| self.http.invalid_response("no content in response".to_string()))?;

        Ok(parse_completion(&content, PROVIDER_NAME, self.min_confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::domain::{AssistantError, EmrLinkError};
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn config(base_url: &str) -> AssistantConfig {
        AssistantConfig {
            api_key: Some(secret_string("sk-test".to_string())),
            base_url: Some(base_url.to_string()),
            ..AssistantConfig::default()
        }
    }

    #[tokio::test]
    async fn test_process_query_sends_chat_request() {
        let mut server = Server::new_async().await;
        let completion = json!({
            "answer": "Ana's last visit was routine.",
            "confidence": 0.7,
            "insights": [{"category": "follow-up", "description": "Due for annual review", "confidence": 0.8}]
        })
        .to_string();

        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4",
                "max_tokens": 2048,
                "response_format": {"type": "json_object"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"choices": [{"message": {"role": "assistant", "content": completion}}]}).to_string())
            .create_async()
            .await;

        let provider = OpenAiProvider::new(&config(&server.url())).unwrap();
        let response = provider
            .process_query(&AssistantQuery::new("When was the last visit?"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.provider, "openai");
        assert_eq!(response.answer, "Ana's last visit was routine.");
        assert_eq!(response.insights.len(), 1);
    }

    #[tokio::test]
    async fn test_error_status_maps_to_request_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error": {"message": "Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let provider = OpenAiProvider::new(&config(&server.url())).unwrap();
        let err = provider
            .process_query(&AssistantQuery::new("hello"))
            .await
            .unwrap_err();

        match err {
            EmrLinkError::Assistant(AssistantError::Request { provider, message }) => {
                assert_eq!(provider, "openai");
                assert!(message.contains("401"));
                assert!(message.contains("Incorrect API key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_invalid_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let provider = OpenAiProvider::new(&config(&server.url())).unwrap();
        let err = provider
            .process_query(&AssistantQuery::new("hello"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EmrLinkError::Assistant(AssistantError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_default_endpoint() {
        let config = AssistantConfig {
            api_key: Some(secret_string("sk-test".to_string())),
            ..AssistantConfig::default()
        };
        let provider = OpenAiProvider::new(&config).unwrap();
        assert_eq!(provider.endpoint, "https://api.openai.com/v1/chat/completions");
        assert_eq!(provider.model(), "gpt-4");
    }
}
