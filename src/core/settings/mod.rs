//! Active adapter selection and persisted settings
//!
//! - [`EmrConfigService`] - the single current EMR adapter, switched only
//!   after a passing connection test
//! - [`SettingsStore`] - key/value persistence for the active adapter, backed
//!   by a JSON file ([`FileSettingsStore`]) or memory ([`MemorySettingsStore`])

pub mod service;
pub mod store;

pub use service::{EmrConfigService, ADAPTER_CONFIG_KEY, ADAPTER_NAME_KEY};
pub use store::{FileSettingsStore, MemorySettingsStore, SettingsStore};
