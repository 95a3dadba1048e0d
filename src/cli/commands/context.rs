//! Shared setup for commands that talk to an EMR

use crate::adapters::emr::EmrAdapterFactory;
use crate::cli::exit_code;
use crate::config::{load_config_or_default, EmrLinkConfig};
use crate::core::settings::{EmrConfigService, FileSettingsStore};
use crate::domain::{EmrLinkError, PatientId, Result};
use serde::Serialize;
use std::sync::Arc;

/// Loaded configuration plus the services built from it
pub struct AppContext {
    pub config: EmrLinkConfig,
    pub factory: Arc<EmrAdapterFactory>,
    pub emr: Arc<EmrConfigService>,
}

impl AppContext {
    /// Load `config_path` (defaults if absent) and restore the persisted adapter
    pub fn load(config_path: &str) -> Result<Self> {
        let config = load_config_or_default(config_path)?;
        let store = Arc::new(FileSettingsStore::new(&config.storage.settings_path));
        let factory = Arc::new(EmrAdapterFactory::new());
        let emr = Arc::new(EmrConfigService::new(factory.clone(), store));

        tracing::debug!(
            config_path,
            settings_path = %config.storage.settings_path,
            adapter = %emr.get_current_adapter_name(),
            "Loaded CLI context"
        );

        Ok(Self {
            config,
            factory,
            emr,
        })
    }

    /// Like [`load`](Self::load), printing the failure and returning its exit code
    pub fn load_or_report(config_path: &str) -> std::result::Result<Self, i32> {
        Self::load(config_path).map_err(|e| report("Failed to load configuration", &e))
    }
}

/// Print a failed step and map the error to an exit code
pub fn report(action: &str, error: &EmrLinkError) -> i32 {
    tracing::error!(error = %error, "{action}");
    println!("❌ {action}");
    println!("   Error: {error}");
    exit_code(error)
}

pub fn parse_patient_id(raw: &str) -> std::result::Result<PatientId, i32> {
    PatientId::new(raw).map_err(|e| report("Invalid patient id", &EmrLinkError::Validation(e)))
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
