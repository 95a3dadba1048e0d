//! EMR adapter layer
//!
//! This module provides the vendor abstraction, the vendor implementations
//! and the factory that constructs and caches them.
//!
//! - [`EmrAdapter`] - the canonical interface every vendor implements
//! - [`vendor`] - GENERIC (demo data), EPIC (FHIR R4), OSCAR and ClinicCloud
//! - [`EmrAdapterFactory`] - vendor registry plus an instance cache keyed by
//!   configuration identity
//!
//! # Example
//!
//! ```rust,no_run
//! use emrlink::adapters::emr::{EmrAdapterFactory, CLINICCLOUD};
//! use emrlink::config::EmrAdapterConfig;
//! use emrlink::domain::PatientId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let factory = EmrAdapterFactory::new();
//! let config = EmrAdapterConfig::from_pairs([
//!     "apiUrl=https://api.cliniccloud.es/v1",
//!     "apiKey=cc-key",
//!     "clinicId=clinic-7",
//! ])?;
//!
//! let adapter = factory.get_adapter(CLINICCLOUD, Some(&config))?;
//! if adapter.test_connection().await? {
//!     let patient = adapter.get_patient_data(&PatientId::new("cc-1")?).await?;
//!     println!("{}", patient.full_name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod factory;
pub mod http;
pub mod mapping;
mod r#trait;
pub mod vendor;

pub use factory::{AdapterConstructor, EmrAdapterFactory};
pub use r#trait::{EmrAdapter, CLINICCLOUD, EPIC, GENERIC, OSCAR};
pub use vendor::{ClinicCloudAdapter, EpicAdapter, GenericEmrAdapter, OscarAdapter};
