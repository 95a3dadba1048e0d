//! Med-PaLM provider on Vertex AI

use super::parse::parse_completion;
use super::prompt::combined_prompt;
use super::provider::{configuration, AiProvider, ProviderHttp};
use super::types::{AssistantQuery, AssistantResponse};
use crate::config::AssistantConfig;
use crate::domain::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const PROVIDER_NAME: &str = "medpalm";

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: [Instance<'a>; 1],
    parameters: Parameters,
}

#[derive(Debug, Serialize)]
struct Instance<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Parameters {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(default)]
    content: Option<String>,
}

/// Vertex AI `:predict` client for the Med-PaLM models
///
/// The API key field carries an OAuth access token for the Google Cloud
/// project; minting that token is left to the caller.
#[derive(Debug)]
pub struct MedPalmProvider {
    http: ProviderHttp,
    endpoint: String,
    temperature: f32,
    max_tokens: u32,
    min_confidence: f64,
}

impl MedPalmProvider {
    /// # Errors
    ///
    /// Returns a configuration error when the access token or project id is
    /// missing
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let http = ProviderHttp::new(PROVIDER_NAME, config)?;
        let project = config
            .project_id
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| configuration(PROVIDER_NAME, "project_id is required"))?;
        let location = config.location.trim();

        let base_url = match config.base_url.as_deref() {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{location}-aiplatform.googleapis.com/v1"),
        };

        Ok(Self {
            http,
            endpoint: format!(
                "{base_url}/projects/{project}/locations/{location}/publishers/google/models/{}:predict",
                config.model_name()
            ),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            min_confidence: config.min_confidence,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AiProvider for MedPalmProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn process_query(&self, query: &AssistantQuery) -> Result<AssistantResponse> {
        let prompt = combined_prompt(query)?;
        let body = PredictRequest {
            instances: [Instance { content: &prompt }],
            parameters: Parameters {
                temperature: self.temperature,
                max_output_tokens: self.max_tokens,
            },
        };

        tracing::info!(
            provider = PROVIDER_NAME,
            with_patient = query.context.is_some(),
            "Sending assistant query"
        );

        let reply: PredictResponse = self
            .http
            .send_json(self.http.post(&self.endpoint).json(&body))
            .await?;

        let content = reply
            .predictions
            .into_iter()
            .next()
            .and_then(|p| p.content)
            .ok_or_else(|| self.http.invalid_response("no prediction content".to_string()))?;

        Ok(parse_completion(&content, PROVIDER_NAME, self.min_confidence))
    }
}
