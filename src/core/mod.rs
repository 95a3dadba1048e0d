//! Core application logic for emrlink.
//!
//! # Modules
//!
//! - [`settings`] - the active EMR adapter and its persisted settings
//!
//! # Workflow
//!
//! 1. **Restore**: [`settings::EmrConfigService::new`] rebuilds the adapter
//!    persisted by the previous session, or falls back to GENERIC
//! 2. **Configure**: `configure_adapter` tests a candidate adapter and only
//!    then persists and activates it
//! 3. **Use**: callers fetch the active adapter with `get_adapter()` and work
//!    with canonical types
//!
//! # Example
//!
//! ```rust,no_run
//! use emrlink::adapters::emr::EmrAdapterFactory;
//! use emrlink::core::settings::{EmrConfigService, MemorySettingsStore};
//! use emrlink::domain::EmrSearchQuery;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = EmrConfigService::new(
//!     Arc::new(EmrAdapterFactory::new()),
//!     Arc::new(MemorySettingsStore::new()),
//! );
//!
//! let adapter = service.get_adapter();
//! let matches = adapter
//!     .search_patients(&EmrSearchQuery::by_name("García"), None)
//!     .await?;
//! println!("{} matches in {}", matches.len(), adapter.name());
//! # Ok(())
//! # }
//! ```

pub mod settings;
