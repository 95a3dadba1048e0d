//! Integration tests for active-adapter selection and persistence

use emrlink::adapters::emr::{EmrAdapterFactory, CLINICCLOUD, GENERIC};
use emrlink::config::EmrAdapterConfig;
use emrlink::core::settings::{
    EmrConfigService, FileSettingsStore, MemorySettingsStore, SettingsStore, ADAPTER_CONFIG_KEY,
    ADAPTER_NAME_KEY,
};
use emrlink::domain::PatientId;
use mockito::{Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn cliniccloud_config(server: &ServerGuard) -> EmrAdapterConfig {
    EmrAdapterConfig::from_pairs([
        format!("apiUrl={}", server.url()),
        "apiKey=cc-key".to_string(),
        "clinicId=clinic-7".to_string(),
    ])
    .unwrap()
}

fn service_with(store: Arc<dyn SettingsStore>) -> EmrConfigService {
    EmrConfigService::new(Arc::new(EmrAdapterFactory::new()), store)
}

#[tokio::test]
async fn test_defaults_to_generic() {
    let service = service_with(Arc::new(MemorySettingsStore::new()));

    assert_eq!(service.get_current_adapter_name(), GENERIC);
    assert!(!service.has_configured_adapter());
    assert!(service.current_config().is_none());
    assert_eq!(service.get_adapter().vendor(), GENERIC);
}

#[tokio::test]
async fn test_failed_connection_test_keeps_previous_adapter() {
    let mut server = Server::new_async().await;
    let ping = server
        .mock("GET", "/ping")
        .with_status(401)
        .with_body(r#"{"mensaje": "API key inválida"}"#)
        .create_async()
        .await;

    let store = Arc::new(MemorySettingsStore::new());
    let service = service_with(store.clone());

    let configured = service
        .configure_adapter(CLINICCLOUD, cliniccloud_config(&server))
        .await
        .unwrap();
    ping.assert_async().await;

    assert!(!configured);
    assert_eq!(service.get_current_adapter_name(), GENERIC);
    assert!(!service.has_configured_adapter());
    assert_eq!(store.get(ADAPTER_NAME_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_successful_connection_test_commits_and_persists() {
    let mut server = Server::new_async().await;
    let _ping = server.mock("GET", "/ping").with_status(200).create_async().await;
    let patient = server
        .mock("GET", "/pacientes/cc-1")
        .with_status(200)
        .with_body(
            json!({
                "nombre": "Ana López",
                "fechaNacimiento": "1990-01-01",
                "genero": "female"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let store = Arc::new(MemorySettingsStore::new());
    let service = service_with(store.clone());

    assert!(service
        .configure_adapter("cliniccloud", cliniccloud_config(&server))
        .await
        .unwrap());

    assert_eq!(service.get_current_adapter_name(), CLINICCLOUD);
    assert!(service.has_configured_adapter());
    assert_eq!(store.get(ADAPTER_NAME_KEY).unwrap(), Some(json!(CLINICCLOUD)));
    let persisted = store.get(ADAPTER_CONFIG_KEY).unwrap().unwrap();
    assert_eq!(persisted["clinicId"], "clinic-7");

    let record = service
        .get_adapter()
        .get_patient_data(&PatientId::new("cc-1").unwrap())
        .await
        .unwrap();
    patient.assert_async().await;
    assert_eq!(record.id.as_str(), "cc-1");
    assert_eq!(record.full_name, "Ana López");
    assert_eq!(record.birth_date, "1990-01-01");
    assert_eq!(record.gender, "female");
}

#[tokio::test]
async fn test_missing_config_propagates_without_network() {
    let service = service_with(Arc::new(MemorySettingsStore::new()));
    let result = service
        .configure_adapter(CLINICCLOUD, EmrAdapterConfig::default())
        .await;

    let message = result.unwrap_err().to_string();
    assert!(message.contains("apiUrl"));
    assert_eq!(service.get_current_adapter_name(), GENERIC);
}

#[tokio::test]
async fn test_persisted_adapter_is_restored_and_reset() {
    let mut server = Server::new_async().await;
    let _ping = server.mock("GET", "/ping").with_status(200).create_async().await;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    {
        let service = service_with(Arc::new(FileSettingsStore::new(&path)));
        assert!(service
            .configure_adapter(CLINICCLOUD, cliniccloud_config(&server))
            .await
            .unwrap());
    }

    // a fresh process restores without testing the connection again
    let restored = service_with(Arc::new(FileSettingsStore::new(&path)));
    assert_eq!(restored.get_current_adapter_name(), CLINICCLOUD);
    assert!(restored.has_configured_adapter());
    assert_eq!(
        restored.current_config().unwrap().clinic_id.as_deref(),
        Some("clinic-7")
    );

    restored.reset_config().unwrap();
    assert_eq!(restored.get_current_adapter_name(), GENERIC);

    let after_reset = service_with(Arc::new(FileSettingsStore::new(&path)));
    assert!(!after_reset.has_configured_adapter());
}

#[tokio::test]
async fn test_corrupt_settings_are_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "not json").unwrap();

    let service = service_with(Arc::new(FileSettingsStore::new(&path)));
    assert_eq!(service.get_current_adapter_name(), GENERIC);
}
