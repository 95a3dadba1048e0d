//! External system integrations for emrlink.
//!
//! - [`emr`] - EMR vendor adapters (GENERIC, EPIC, OSCAR, ClinicCloud), the
//!   shared HTTP and OAuth2 plumbing, and the adapter factory
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern**: each vendor hides its wire format
//! behind the [`emr::EmrAdapter`] trait, so callers and tests work against the
//! canonical types in [`crate::domain`] and can swap in mock implementations.
//!
//! ```rust,no_run
//! use emrlink::adapters::emr::{EmrAdapterFactory, OSCAR};
//! use emrlink::config::EmrAdapterConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EmrAdapterConfig::from_pairs([
//!     "baseUrl=https://oscar.example.com/oscar/ws/services",
//!     "username=doctor",
//!     "password=secret",
//!     "clinicId=north",
//! ])?;
//!
//! let adapter = EmrAdapterFactory::new().get_adapter(OSCAR, Some(&config))?;
//! println!("{} reachable: {}", adapter.name(), adapter.test_connection().await?);
//! # Ok(())
//! # }
//! ```

pub mod emr;
