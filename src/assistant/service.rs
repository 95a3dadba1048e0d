//! Clinical assistant over the active EMR adapter

use super::provider::AiProvider;
use super::types::{AssistantQuery, AssistantResponse, PatientContext};
use crate::core::settings::EmrConfigService;
use crate::domain::{EmrHistoryOptions, EmrLinkError, PatientId, Result};
use std::sync::Arc;

/// Answers clinicians' questions, grounding them in the patient's record
///
/// Patient data is read through whichever adapter the config service has
/// active at the time of the call.
pub struct ClinicalAssistant {
    emr: Arc<EmrConfigService>,
    provider: Arc<dyn AiProvider>,
}

impl ClinicalAssistant {
    pub fn new(emr: Arc<EmrConfigService>, provider: Arc<dyn AiProvider>) -> Self {
        Self { emr, provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Demographics and history for one patient
    ///
    /// Both are fetched concurrently; either failing fails the call.
    pub async fn patient_context(
        &self,
        patient_id: &PatientId,
        options: Option<&EmrHistoryOptions>,
    ) -> Result<PatientContext> {
        let adapter = self.emr.get_adapter();
        tracing::debug!(
            vendor = adapter.vendor(),
            patient_id = %patient_id,
            "Loading patient context"
        );

        let (patient, history) = futures::try_join!(
            adapter.get_patient_data(patient_id),
            adapter.get_patient_history(patient_id, options),
        )?;

        Ok(PatientContext::new(patient).with_history(history))
    }

    /// Ask a question, optionally about one patient
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank question; EMR and provider
    /// errors propagate unchanged
    pub async fn ask(&self, question: &str, patient_id: Option<&PatientId>) -> Result<AssistantResponse> {
        if question.trim().is_empty() {
            return Err(EmrLinkError::Validation("Question cannot be empty".to_string()));
        }

        let mut query = AssistantQuery::new(question);
        if let Some(patient_id) = patient_id {
            query = query.with_context(self.patient_context(patient_id, None).await?);
        }

        let response = self.provider.process_query(&query).await?;
        tracing::info!(
            provider = self.provider.name(),
            confidence = response.confidence,
            insights = response.insights.len(),
            recommendations = response.recommendations.len(),
            "Assistant answered"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::emr::EmrAdapterFactory;
    use crate::core::settings::MemorySettingsStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Echoes the patient name back and records the query it saw
    #[derive(Default)]
    struct EchoProvider {
        seen: Mutex<Option<AssistantQuery>>,
    }

    #[async_trait]
    impl AiProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn process_query(&self, query: &AssistantQuery) -> Result<AssistantResponse> {
            let answer = query
                .context
                .as_ref()
                .map(|c| c.patient.full_name.clone())
                .unwrap_or_else(|| "no patient".to_string());
            *self.seen.lock().unwrap() = Some(query.clone());
            Ok(AssistantResponse::unstructured(answer, "echo"))
        }
    }

    fn assistant() -> (ClinicalAssistant, Arc<EchoProvider>) {
        let service = EmrConfigService::new(
            Arc::new(EmrAdapterFactory::new()),
            Arc::new(MemorySettingsStore::new()),
        );
        let provider = Arc::new(EchoProvider::default());
        (
            ClinicalAssistant::new(Arc::new(service), provider.clone()),
            provider,
        )
    }

    #[tokio::test]
    async fn test_ask_with_patient_attaches_record_and_history() {
        let (assistant, provider) = assistant();
        let patient_id = PatientId::new("PAT-001").unwrap();

        let response = assistant
            .ask("Summarise active problems", Some(&patient_id))
            .await
            .unwrap();
        assert_eq!(response.answer, "Juan Carlos Martínez");

        let seen = provider.seen.lock().unwrap().clone().unwrap();
        let context = seen.context.unwrap();
        assert_eq!(context.patient.id, patient_id);
        assert_eq!(context.history.unwrap().allergies.len(), 2);
    }

    #[tokio::test]
    async fn test_ask_without_patient() {
        let (assistant, provider) = assistant();
        let response = assistant.ask("Dosing of amoxicillin?", None).await.unwrap();
        assert_eq!(response.answer, "no patient");
        assert!(provider.seen.lock().unwrap().as_ref().unwrap().context.is_none());
    }

    #[tokio::test]
    async fn test_unknown_patient_propagates() {
        let (assistant, provider) = assistant();
        let patient_id = PatientId::new("PAT-404").unwrap();

        let err = assistant.ask("Anything?", Some(&patient_id)).await.unwrap_err();
        assert!(matches!(err, EmrLinkError::Emr(ref e) if e.is_not_found()));
        assert!(provider.seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let (assistant, _) = assistant();
        assert!(matches!(
            assistant.ask("   ", None).await,
            Err(EmrLinkError::Validation(_))
        ));
        assert_eq!(assistant.provider_name(), "echo");
    }
}
