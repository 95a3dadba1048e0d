//! EMR adapter factory
//!
//! [`EmrAdapterFactory`] maps vendor names to constructors and caches the
//! adapters it builds. Two requests for the same vendor with equal
//! configurations get the same `Arc`; a different configuration builds a new
//! instance and leaves the earlier one untouched.

use super::r#trait::{EmrAdapter, CLINICCLOUD, EPIC, GENERIC, OSCAR};
use super::vendor::{ClinicCloudAdapter, EpicAdapter, GenericEmrAdapter, OscarAdapter};
use crate::config::EmrAdapterConfig;
use crate::domain::{EmrError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Builds an adapter from vendor settings
///
/// Constructors validate mandatory settings and must not touch the network.
pub type AdapterConstructor =
    Arc<dyn Fn(&EmrAdapterConfig) -> Result<Arc<dyn EmrAdapter>> + Send + Sync>;

#[derive(Default)]
struct VendorSlot {
    /// Instances keyed by configuration fingerprint
    instances: HashMap<String, Arc<dyn EmrAdapter>>,
    /// Most recently constructed or registered instance
    latest: Option<Arc<dyn EmrAdapter>>,
}

#[derive(Default)]
struct Registry {
    constructors: HashMap<String, AdapterConstructor>,
    slots: HashMap<String, VendorSlot>,
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

/// Vendor registry and adapter instance cache
///
/// One mutex guards both the registry and the cache and is held while an
/// adapter is constructed, so concurrent first requests for the same
/// configuration build a single instance.
///
/// # Example
///
/// ```rust
/// use emrlink::adapters::emr::{EmrAdapterFactory, GENERIC};
///
/// let factory = EmrAdapterFactory::new();
/// assert!(factory.is_supported("oscar"));
///
/// let demo = factory.get_adapter(GENERIC, None).unwrap();
/// assert_eq!(demo.vendor(), GENERIC);
/// ```
pub struct EmrAdapterFactory {
    registry: Mutex<Registry>,
}

impl EmrAdapterFactory {
    /// Factory with every built-in vendor registered and the GENERIC demo
    /// adapter available without configuration
    pub fn new() -> Self {
        let factory = Self::empty();

        factory.register_vendor(GENERIC, |_| Ok(Arc::new(GenericEmrAdapter::new()) as Arc<dyn EmrAdapter>));
        factory.register_vendor(EPIC, |config| Ok(Arc::new(EpicAdapter::new(config)?) as Arc<dyn EmrAdapter>));
        factory.register_vendor(OSCAR, |config| Ok(Arc::new(OscarAdapter::new(config)?) as Arc<dyn EmrAdapter>));
        factory.register_vendor(CLINICCLOUD, |config| {
            Ok(Arc::new(ClinicCloudAdapter::new(config)?) as Arc<dyn EmrAdapter>)
        });
        factory.register_adapter(GENERIC, Arc::new(GenericEmrAdapter::new()));

        factory
    }

    /// Factory with no vendors registered
    pub fn empty() -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
        }
    }

    /// Register (or replace) the constructor for a vendor name
    pub fn register_vendor<F>(&self, name: &str, constructor: F)
    where
        F: Fn(&EmrAdapterConfig) -> Result<Arc<dyn EmrAdapter>> + Send + Sync + 'static,
    {
        let name = normalize(name);
        tracing::debug!(vendor = %name, "Registered EMR vendor constructor");
        self.lock().constructors.insert(name, Arc::new(constructor));
    }

    /// Inject a pre-built adapter as the current instance for `name`
    ///
    /// No validation is performed. The instance is returned by
    /// `get_adapter(name, None)` until another is constructed or registered.
    pub fn register_adapter(&self, name: &str, adapter: Arc<dyn EmrAdapter>) {
        let name = normalize(name);
        tracing::debug!(vendor = %name, adapter = adapter.name(), "Registered EMR adapter instance");
        self.lock().slots.entry(name).or_default().latest = Some(adapter);
    }

    /// Adapter for a vendor, constructing it on first use of a configuration
    ///
    /// With `None`, the most recent instance for the vendor is returned.
    ///
    /// # Errors
    ///
    /// - [`EmrError::UnsupportedVendor`] if nothing is registered under `name`
    /// - [`EmrError::NotConfigured`] if `config` is `None` and no instance exists
    /// - whatever the vendor constructor returns, typically
    ///   [`EmrError::MissingConfig`]
    pub fn get_adapter(
        &self,
        name: &str,
        config: Option<&EmrAdapterConfig>,
    ) -> Result<Arc<dyn EmrAdapter>> {
        let name = normalize(name);
        let mut registry = self.lock();

        let Some(config) = config else {
            if let Some(adapter) = registry.slots.get(&name).and_then(|slot| slot.latest.clone()) {
                return Ok(adapter);
            }
            return Err(if registry.constructors.contains_key(&name) {
                EmrError::NotConfigured(name).into()
            } else {
                EmrError::UnsupportedVendor(name).into()
            });
        };

        let constructor = registry
            .constructors
            .get(&name)
            .cloned()
            .ok_or_else(|| EmrError::UnsupportedVendor(name.clone()))?;

        let fingerprint = config.fingerprint();
        if let Some(adapter) = registry
            .slots
            .get(&name)
            .and_then(|slot| slot.instances.get(&fingerprint))
        {
            tracing::debug!(vendor = %name, "Reusing cached EMR adapter");
            return Ok(Arc::clone(adapter));
        }

        let adapter = constructor(config).inspect_err(|e| {
            tracing::warn!(vendor = %name, error = %e, "EMR adapter construction failed");
        })?;
        tracing::info!(vendor = %name, adapter = adapter.name(), "Constructed EMR adapter");

        let slot = registry.slots.entry(name).or_default();
        slot.instances.insert(fingerprint, Arc::clone(&adapter));
        slot.latest = Some(Arc::clone(&adapter));
        Ok(adapter)
    }

    /// Drop the cached instance built from `config`
    ///
    /// # Returns
    ///
    /// `true` if an instance was removed
    pub fn remove_adapter(&self, name: &str, config: &EmrAdapterConfig) -> bool {
        let name = normalize(name);
        let mut registry = self.lock();
        let Some(slot) = registry.slots.get_mut(&name) else {
            return false;
        };

        let Some(removed) = slot.instances.remove(&config.fingerprint()) else {
            return false;
        };
        if slot
            .latest
            .as_ref()
            .is_some_and(|latest| Arc::ptr_eq(latest, &removed))
        {
            slot.latest = None;
        }
        tracing::debug!(vendor = %name, "Removed cached EMR adapter");
        true
    }

    /// Registered vendor names, sorted
    pub fn supported_vendors(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().constructors.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_supported(&self, name: &str) -> bool {
        self.lock().constructors.contains_key(&normalize(name))
    }

    /// Number of configuration-keyed instances cached for a vendor
    pub fn cached_count(&self, name: &str) -> usize {
        self.lock()
            .slots
            .get(&normalize(name))
            .map_or(0, |slot| slot.instances.len())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EmrAdapterFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmrLinkError;
    use test_case::test_case;

    fn oscar_config(base_url: &str) -> EmrAdapterConfig {
        EmrAdapterConfig::from_pairs([
            format!("baseUrl={base_url}"),
            "username=doctor".to_string(),
            "password=secret".to_string(),
            "clinicId=north".to_string(),
        ])
        .unwrap()
    }

    #[test]
    fn test_equal_configs_share_instance() {
        let factory = EmrAdapterFactory::new();
        let first = factory
            .get_adapter(OSCAR, Some(&oscar_config("https://oscar.example.com")))
            .unwrap();
        let second = factory
            .get_adapter("oscar", Some(&oscar_config("https://oscar.example.com")))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(factory.cached_count(OSCAR), 1);
    }

    #[test]
    fn test_different_config_builds_new_instance() {
        let factory = EmrAdapterFactory::new();
        let first = factory
            .get_adapter(OSCAR, Some(&oscar_config("https://a.example.com")))
            .unwrap();
        let second = factory
            .get_adapter(OSCAR, Some(&oscar_config("https://b.example.com")))
            .unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(factory.cached_count(OSCAR), 2);

        let latest = factory.get_adapter(OSCAR, None).unwrap();
        assert!(Arc::ptr_eq(&latest, &second));
    }

    #[test_case(OSCAR, "Missing required configuration for OSCAR adapter: baseUrl, username, password, clinicId")]
    #[test_case(EPIC, "Missing required configuration for EPIC adapter: baseUrl, clientId, clientSecret")]
    #[test_case(CLINICCLOUD, "Missing required configuration for CLINICCLOUD adapter: apiUrl, apiKey, clinicId")]
    fn test_missing_config_fails_fast(vendor: &str, message: &str) {
        let factory = EmrAdapterFactory::new();
        let err = factory
            .get_adapter(vendor, Some(&EmrAdapterConfig::default()))
            .err()
            .unwrap();

        assert!(err.to_string().ends_with(message), "{err}");
        assert_eq!(factory.cached_count(vendor), 0);
    }

    #[test]
    fn test_unknown_vendor() {
        let factory = EmrAdapterFactory::new();
        let err = factory
            .get_adapter("meditech", Some(&EmrAdapterConfig::default()))
            .err()
            .unwrap();
        assert!(matches!(&err, EmrLinkError::Emr(EmrError::UnsupportedVendor(name)) if name == "MEDITECH"));
        assert!(err.to_string().contains("Unsupported EMR adapter: MEDITECH"));
    }

    #[test]
    fn test_known_vendor_without_instance_is_not_configured() {
        let factory = EmrAdapterFactory::new();
        let err = factory.get_adapter(EPIC, None).err().unwrap();
        assert!(matches!(err, EmrLinkError::Emr(EmrError::NotConfigured(_))));
    }

    #[test]
    fn test_generic_available_without_config() {
        let factory = EmrAdapterFactory::new();
        let adapter = factory.get_adapter("generic", None).unwrap();
        assert_eq!(adapter.vendor(), GENERIC);
    }

    #[test]
    fn test_register_adapter_injects_instance() {
        let factory = EmrAdapterFactory::empty();
        let injected: Arc<dyn EmrAdapter> = Arc::new(GenericEmrAdapter::new());
        factory.register_adapter("custom", Arc::clone(&injected));

        let adapter = factory.get_adapter("CUSTOM", None).unwrap();
        assert!(Arc::ptr_eq(&adapter, &injected));
        assert!(!factory.is_supported("custom"));
    }

    #[test]
    fn test_register_vendor_extends_registry() {
        let factory = EmrAdapterFactory::empty();
        assert!(factory.supported_vendors().is_empty());

        factory.register_vendor("demo", |_| Ok(Arc::new(GenericEmrAdapter::new()) as Arc<dyn EmrAdapter>));
        assert_eq!(factory.supported_vendors(), vec!["DEMO".to_string()]);
        assert!(factory.get_adapter("demo", Some(&EmrAdapterConfig::default())).is_ok());
    }

    #[test]
    fn test_remove_adapter() {
        let factory = EmrAdapterFactory::new();
        let config = oscar_config("https://oscar.example.com");
        factory.get_adapter(OSCAR, Some(&config)).unwrap();

        assert!(factory.remove_adapter(OSCAR, &config));
        assert!(!factory.remove_adapter(OSCAR, &config));
        assert_eq!(factory.cached_count(OSCAR), 0);
        assert!(factory.get_adapter(OSCAR, None).is_err());
    }

    #[test]
    fn test_supported_vendors_sorted() {
        let factory = EmrAdapterFactory::new();
        assert_eq!(
            factory.supported_vendors(),
            vec!["CLINICCLOUD", "EPIC", "GENERIC", "OSCAR"]
        );
    }
}
