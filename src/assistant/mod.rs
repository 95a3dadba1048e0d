//! Clinical assistant
//!
//! A thin layer over a language model provider. [`ClinicalAssistant`] pulls
//! the patient's record through the active EMR adapter, hands it to an
//! [`AiProvider`] with the clinician's question, and reshapes the completion
//! into an [`AssistantResponse`].
//!
//! # Example
//!
//! ```no_run
//! use emrlink::assistant::{create_provider, ClinicalAssistant};
//! use emrlink::adapters::emr::EmrAdapterFactory;
//! use emrlink::config::AssistantConfig;
//! use emrlink::core::settings::{EmrConfigService, MemorySettingsStore};
//! use emrlink::domain::PatientId;
//! use std::sync::Arc;
//!
//! # async fn example() -> emrlink::domain::Result<()> {
//! let emr = Arc::new(EmrConfigService::new(
//!     Arc::new(EmrAdapterFactory::new()),
//!     Arc::new(MemorySettingsStore::new()),
//! ));
//! let provider = create_provider(&AssistantConfig::default())?;
//! let assistant = ClinicalAssistant::new(emr, provider);
//!
//! let patient_id = PatientId::new("PAT-001").map_err(emrlink::domain::EmrLinkError::Validation)?;
//! let response = assistant.ask("Summarise active problems", Some(&patient_id)).await?;
//! println!("{} ({:.0}%)", response.answer, response.confidence * 100.0);
//! # Ok(())
//! # }
//! ```

pub mod medpalm;
pub mod openai;
pub mod parse;
pub mod prompt;
mod provider;
pub mod service;
pub mod types;

pub use medpalm::MedPalmProvider;
pub use openai::OpenAiProvider;
pub use parse::parse_completion;
pub use provider::AiProvider;
pub use service::ClinicalAssistant;
pub use types::{
    AssistantQuery, AssistantResponse, ClinicalInsight, PatientContext, Priority, Recommendation,
    TimelineEvent,
};

use crate::config::{AssistantConfig, AssistantProvider};
use crate::domain::Result;
use std::sync::Arc;

/// Build the provider selected in `config`
///
/// # Errors
///
/// Returns a configuration error when the provider's required settings are
/// missing
pub fn create_provider(config: &AssistantConfig) -> Result<Arc<dyn AiProvider>> {
    let provider: Arc<dyn AiProvider> = match config.provider {
        AssistantProvider::OpenAi => Arc::new(OpenAiProvider::new(config)?),
        AssistantProvider::MedPalm => Arc::new(MedPalmProvider::new(config)?),
    };
    tracing::debug!(provider = provider.name(), model = config.model_name(), "Created assistant provider");
    Ok(provider)
}
