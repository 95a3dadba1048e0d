//! Active EMR adapter selection
//!
//! [`EmrConfigService`] owns the one adapter the rest of the application talks
//! to. A new adapter only becomes current after its connection test passes,
//! and the `(name, config)` pair is persisted so the next session starts with
//! the same adapter.

use super::store::SettingsStore;
use crate::adapters::emr::{EmrAdapter, EmrAdapterFactory, GenericEmrAdapter, GENERIC};
use crate::config::EmrAdapterConfig;
use crate::domain::Result;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};

/// Settings key holding the active adapter's vendor name
pub const ADAPTER_NAME_KEY: &str = "emrAdapterName";

/// Settings key holding the active adapter's configuration
pub const ADAPTER_CONFIG_KEY: &str = "emrAdapterConfig";

#[derive(Clone)]
struct ActiveAdapter {
    name: String,
    config: EmrAdapterConfig,
    adapter: Arc<dyn EmrAdapter>,
}

/// Holds and persists the currently active EMR adapter
///
/// # Example
///
/// ```rust,no_run
/// use emrlink::adapters::emr::EmrAdapterFactory;
/// use emrlink::config::EmrAdapterConfig;
/// use emrlink::core::settings::{EmrConfigService, FileSettingsStore};
/// use std::sync::Arc;
///
/// # async fn example() -> emrlink::domain::Result<()> {
/// let service = EmrConfigService::new(
///     Arc::new(EmrAdapterFactory::new()),
///     Arc::new(FileSettingsStore::new(".emrlink/settings.json")),
/// );
///
/// let config = EmrAdapterConfig::from_pairs([
///     "baseUrl=https://fhir.example.com/api/FHIR/R4",
///     "clientId=emrlink",
///     "clientSecret=s3cret",
/// ])
/// .map_err(emrlink::domain::EmrLinkError::Configuration)?;
///
/// if service.configure_adapter("EPIC", config).await? {
///     println!("Now using {}", service.get_current_adapter_name());
/// }
/// # Ok(())
/// # }
/// ```
pub struct EmrConfigService {
    factory: Arc<EmrAdapterFactory>,
    store: Arc<dyn SettingsStore>,
    fallback: Arc<dyn EmrAdapter>,
    current: RwLock<Option<ActiveAdapter>>,
}

impl EmrConfigService {
    /// Create the service and restore the persisted adapter, if any
    ///
    /// Restoring builds the adapter through the factory without a network
    /// call. Unreadable or invalid persisted state is logged and ignored.
    pub fn new(factory: Arc<EmrAdapterFactory>, store: Arc<dyn SettingsStore>) -> Self {
        let fallback = factory
            .get_adapter(GENERIC, None)
            .unwrap_or_else(|_| Arc::new(GenericEmrAdapter::new()) as Arc<dyn EmrAdapter>);

        let service = Self {
            factory,
            store,
            fallback,
            current: RwLock::new(None),
        };

        match service.restore() {
            Ok(Some(active)) => {
                tracing::info!(adapter = %active.name, "Restored persisted EMR adapter");
                *service.write() = Some(active);
            }
            Ok(None) => {
                tracing::debug!("No persisted EMR adapter, using GENERIC");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable persisted EMR adapter settings");
            }
        }

        service
    }

    fn restore(&self) -> Result<Option<ActiveAdapter>> {
        let Some(name) = self.store.get(ADAPTER_NAME_KEY)? else {
            return Ok(None);
        };
        let Some(name) = name.as_str().map(str::to_string) else {
            return Err(crate::domain::EmrLinkError::Storage(format!(
                "{ADAPTER_NAME_KEY} is not a string: {name}"
            )));
        };

        let config: EmrAdapterConfig = match self.store.get(ADAPTER_CONFIG_KEY)? {
            Some(Value::Null) | None => EmrAdapterConfig::default(),
            Some(value) => serde_json::from_value(value)?,
        };

        let adapter = self.factory.get_adapter(&name, Some(&config))?;
        Ok(Some(ActiveAdapter {
            name: name.trim().to_ascii_uppercase(),
            config,
            adapter,
        }))
    }

    /// Switch to a new adapter if its connection test passes
    ///
    /// # Returns
    ///
    /// `Ok(true)` once the adapter is persisted and current. `Ok(false)` if the
    /// connection test failed or returned false; the previous adapter stays
    /// current and nothing is persisted.
    ///
    /// # Errors
    ///
    /// Configuration errors from the factory (unknown vendor, missing fields)
    /// and failures to persist the settings
    pub async fn configure_adapter(&self, name: &str, config: EmrAdapterConfig) -> Result<bool> {
        let adapter = self.factory.get_adapter(name, Some(&config))?;
        let vendor = name.trim().to_ascii_uppercase();

        tracing::info!(adapter = %vendor, "Testing EMR adapter before activation");
        match adapter.test_connection().await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(adapter = %vendor, "EMR adapter rejected the credentials, keeping current adapter");
                return Ok(false);
            }
            Err(e) => {
                tracing::warn!(adapter = %vendor, error = %e, "EMR connection test failed, keeping current adapter");
                return Ok(false);
            }
        }

        self.store.set_many(vec![
            (ADAPTER_NAME_KEY, Value::String(vendor.clone())),
            (ADAPTER_CONFIG_KEY, serde_json::to_value(&config)?),
        ])?;

        *self.write() = Some(ActiveAdapter {
            name: vendor.clone(),
            config,
            adapter,
        });

        tracing::info!(adapter = %vendor, "Activated EMR adapter");
        Ok(true)
    }

    /// Current adapter, or the GENERIC demo adapter when none is configured
    pub fn get_adapter(&self) -> Arc<dyn EmrAdapter> {
        self.read()
            .as_ref()
            .map(|active| Arc::clone(&active.adapter))
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }

    pub fn get_current_adapter_name(&self) -> String {
        self.read()
            .as_ref()
            .map(|active| active.name.clone())
            .unwrap_or_else(|| GENERIC.to_string())
    }

    /// Whether an adapter other than the built-in fallback has been configured
    pub fn has_configured_adapter(&self) -> bool {
        self.read().is_some()
    }

    /// Configuration of the current adapter
    ///
    /// Secrets stay wrapped; use [`EmrAdapterConfig::redacted`] for display.
    pub fn current_config(&self) -> Option<EmrAdapterConfig> {
        self.read().as_ref().map(|active| active.config.clone())
    }

    /// Forget the persisted adapter and revert to GENERIC
    ///
    /// # Errors
    ///
    /// Returns a storage error if the settings cannot be cleared
    pub fn reset_config(&self) -> Result<()> {
        self.store.remove(ADAPTER_NAME_KEY)?;
        self.store.remove(ADAPTER_CONFIG_KEY)?;
        *self.write() = None;

        tracing::info!("Reset EMR adapter configuration to GENERIC");
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<ActiveAdapter>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<ActiveAdapter>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::MemorySettingsStore;
    use crate::domain::{
        ConsultationUpdate, EmrConsultation, EmrError, EmrLinkError, EmrHistoryOptions, EmrPatientHistory,
        EmrPatientMetrics, EmrPatientSearchResult, EmrSearchQuery, EmrTreatment, MetricType,
        PatientData, PatientId, RecordId,
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Clone, Copy)]
    enum Probe {
        Accept,
        Reject,
        Unreachable,
    }

    /// Demo data with a scripted connection test
    struct ScriptedAdapter {
        probe: Probe,
        inner: GenericEmrAdapter,
    }

    #[async_trait]
    impl EmrAdapter for ScriptedAdapter {
        fn name(&self) -> &str {
            "Scripted"
        }

        fn vendor(&self) -> &'static str {
            "SCRIPTED"
        }

        fn default_search_limit(&self) -> usize {
            10
        }

        async fn test_connection(&self) -> Result<bool> {
            match self.probe {
                Probe::Accept => Ok(true),
                Probe::Reject => Ok(false),
                Probe::Unreachable => Err(EmrError::Connection {
                    vendor: "SCRIPTED".to_string(),
                    operation: "test_connection".to_string(),
                    message: "connection refused".to_string(),
                }
                .into()),
            }
        }

        async fn get_patient_data(&self, patient_id: &PatientId) -> Result<PatientData> {
            self.inner.get_patient_data(patient_id).await
        }

        async fn search_patients(
            &self,
            query: &EmrSearchQuery,
            limit: Option<usize>,
        ) -> Result<Vec<EmrPatientSearchResult>> {
            self.inner.search_patients(query, limit).await
        }

        async fn get_patient_history(
            &self,
            patient_id: &PatientId,
            options: Option<&EmrHistoryOptions>,
        ) -> Result<EmrPatientHistory> {
            self.inner.get_patient_history(patient_id, options).await
        }

        async fn save_consultation(&self, consultation: &EmrConsultation) -> Result<RecordId> {
            self.inner.save_consultation(consultation).await
        }

        async fn update_consultation(&self, id: &RecordId, updates: &ConsultationUpdate) -> Result<bool> {
            self.inner.update_consultation(id, updates).await
        }

        async fn register_treatment(&self, treatment: &EmrTreatment) -> Result<RecordId> {
            self.inner.register_treatment(treatment).await
        }

        async fn get_patient_metrics(
            &self,
            patient_id: &PatientId,
            metric_types: &[MetricType],
        ) -> Result<EmrPatientMetrics> {
            self.inner.get_patient_metrics(patient_id, metric_types).await
        }
    }

    /// Factory whose SCRIPTED vendor reads the probe outcome from `extra.probe`
    fn factory() -> Arc<EmrAdapterFactory> {
        let factory = EmrAdapterFactory::new();
        factory.register_vendor("SCRIPTED", |config| {
            let probe = match config.extra.get("probe").and_then(Value::as_str) {
                Some("reject") => Probe::Reject,
                Some("unreachable") => Probe::Unreachable,
                _ => Probe::Accept,
            };
            Ok(Arc::new(ScriptedAdapter {
                probe,
                inner: GenericEmrAdapter::new(),
            }) as Arc<dyn EmrAdapter>)
        });
        Arc::new(factory)
    }

    fn scripted(probe: &str, site: &str) -> EmrAdapterConfig {
        EmrAdapterConfig::from_pairs([format!("probe={probe}"), format!("site={site}")]).unwrap()
    }

    #[test]
    fn test_defaults_to_generic() {
        let service = EmrConfigService::new(factory(), Arc::new(MemorySettingsStore::new()));

        assert!(!service.has_configured_adapter());
        assert_eq!(service.get_current_adapter_name(), GENERIC);
        assert_eq!(service.get_adapter().vendor(), GENERIC);
        assert!(service.current_config().is_none());
    }

    #[tokio::test]
    async fn test_successful_configure_commits_and_persists() {
        let store = Arc::new(MemorySettingsStore::new());
        let service = EmrConfigService::new(factory(), store.clone());

        assert!(service.configure_adapter("scripted", scripted("accept", "a")).await.unwrap());

        assert!(service.has_configured_adapter());
        assert_eq!(service.get_current_adapter_name(), "SCRIPTED");
        assert_eq!(service.get_adapter().vendor(), "SCRIPTED");
        assert_eq!(store.get(ADAPTER_NAME_KEY).unwrap(), Some(json!("SCRIPTED")));
        assert_eq!(
            store.get(ADAPTER_CONFIG_KEY).unwrap(),
            Some(json!({"probe": "accept", "site": "a"}))
        );
    }

    #[tokio::test]
    async fn test_rejected_connection_keeps_previous_adapter() {
        let store = Arc::new(MemorySettingsStore::new());
        let service = EmrConfigService::new(factory(), store.clone());
        service.configure_adapter("SCRIPTED", scripted("accept", "a")).await.unwrap();
        let before = service.get_adapter();

        assert!(!service.configure_adapter("SCRIPTED", scripted("reject", "b")).await.unwrap());
        assert!(!service.configure_adapter("SCRIPTED", scripted("unreachable", "c")).await.unwrap());

        assert!(Arc::ptr_eq(&before, &service.get_adapter()));
        assert_eq!(
            store.get(ADAPTER_CONFIG_KEY).unwrap(),
            Some(json!({"probe": "accept", "site": "a"}))
        );
    }

    #[tokio::test]
    async fn test_config_errors_propagate() {
        let service = EmrConfigService::new(factory(), Arc::new(MemorySettingsStore::new()));

        let missing = service
            .configure_adapter("OSCAR", EmrAdapterConfig::default())
            .await
            .unwrap_err();
        assert!(missing.to_string().contains("baseUrl"));

        let unknown = service
            .configure_adapter("MEDITECH", EmrAdapterConfig::default())
            .await
            .unwrap_err();
        assert!(unknown.to_string().contains("Unsupported EMR adapter: MEDITECH"));
        assert!(!service.has_configured_adapter());
    }

    #[tokio::test]
    async fn test_restores_persisted_adapter() {
        let store = Arc::new(MemorySettingsStore::new());
        let factory = factory();
        {
            let service = EmrConfigService::new(factory.clone(), store.clone());
            service.configure_adapter("SCRIPTED", scripted("accept", "a")).await.unwrap();
        }

        let restored = EmrConfigService::new(factory, store);
        assert!(restored.has_configured_adapter());
        assert_eq!(restored.get_current_adapter_name(), "SCRIPTED");
        assert_eq!(restored.current_config().unwrap(), scripted("accept", "a"));
    }

    #[test]
    fn test_invalid_persisted_state_is_ignored() {
        let store = Arc::new(MemorySettingsStore::new());
        store.set(ADAPTER_NAME_KEY, json!("OSCAR")).unwrap();
        store.set(ADAPTER_CONFIG_KEY, json!({"username": "doctor"})).unwrap();

        let service = EmrConfigService::new(factory(), store);
        assert!(!service.has_configured_adapter());
        assert_eq!(service.get_current_adapter_name(), GENERIC);
    }

    #[tokio::test]
    async fn test_reset_reverts_to_generic() {
        let store = Arc::new(MemorySettingsStore::new());
        let service = EmrConfigService::new(factory(), store.clone());
        service.configure_adapter("SCRIPTED", scripted("accept", "a")).await.unwrap();

        service.reset_config().unwrap();

        assert!(!service.has_configured_adapter());
        assert_eq!(service.get_adapter().vendor(), GENERIC);
        assert_eq!(store.get(ADAPTER_NAME_KEY).unwrap(), None);
        assert_eq!(store.get(ADAPTER_CONFIG_KEY).unwrap(), None);
    }

    /// Memory store whose writes fail once `fail_writes` is set
    #[derive(Default)]
    struct FailingStore {
        inner: MemorySettingsStore,
        fail_writes: AtomicBool,
    }

    impl FailingStore {
        fn check(&self) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(EmrLinkError::Storage("disk full".to_string()));
            }
            Ok(())
        }
    }

    impl SettingsStore for FailingStore {
        fn get(&self, key: &str) -> Result<Option<Value>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: Value) -> Result<()> {
            self.check()?;
            self.inner.set(key, value)
        }

        fn set_many(&self, entries: Vec<(&str, Value)>) -> Result<()> {
            self.check()?;
            self.inner.set_many(entries)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.check()?;
            self.inner.remove(key)
        }
    }

    #[tokio::test]
    async fn test_failed_persist_keeps_previous_state() {
        let store = Arc::new(FailingStore::default());
        let factory = factory();
        let service = EmrConfigService::new(factory.clone(), store.clone());
        service.configure_adapter("SCRIPTED", scripted("accept", "a")).await.unwrap();
        let before = service.get_adapter();

        store.fail_writes.store(true, Ordering::SeqCst);
        let err = service
            .configure_adapter("GENERIC", EmrAdapterConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EmrLinkError::Storage(_)));

        assert!(Arc::ptr_eq(&before, &service.get_adapter()));
        assert_eq!(store.get(ADAPTER_NAME_KEY).unwrap(), Some(json!("SCRIPTED")));
        assert_eq!(
            store.get(ADAPTER_CONFIG_KEY).unwrap(),
            Some(json!({"probe": "accept", "site": "a"}))
        );

        let restored = EmrConfigService::new(factory, store);
        assert_eq!(restored.get_current_adapter_name(), "SCRIPTED");
        assert_eq!(restored.current_config().unwrap(), scripted("accept", "a"));
    }
}
