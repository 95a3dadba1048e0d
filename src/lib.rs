// EmrLink - Vendor-neutral EMR adapter layer
// Copyright (c) 2025 EmrLink Contributors
// Licensed under the MIT License

//! # EmrLink - Vendor-neutral EMR access
//!
//! EmrLink gives clinical applications one interface over several Electronic
//! Medical Record systems and a clinical assistant that answers questions
//! grounded in the patient's record.
//!
//! ## Overview
//!
//! This library provides:
//! - **Adapters** for EPIC (FHIR R4), OSCAR, ClinicCloud and a built-in demo EMR
//! - **A factory** that validates vendor configuration and caches one adapter per config
//! - **A config service** that tests, persists and restores the active adapter
//! - **A clinical assistant** backed by OpenAI or Med-PaLM
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Active-adapter selection and persisted settings
//! - [`adapters`] - Vendor EMR integrations
//! - [`assistant`] - Language model providers and the clinical assistant
//! - [`domain`] - Canonical clinical types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use emrlink::adapters::emr::{EmrAdapterFactory, CLINICCLOUD};
//! use emrlink::config::EmrAdapterConfig;
//! use emrlink::core::settings::{EmrConfigService, FileSettingsStore};
//! use emrlink::domain::PatientId;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = EmrConfigService::new(
//!         Arc::new(EmrAdapterFactory::new()),
//!         Arc::new(FileSettingsStore::new(".emrlink/settings.json")),
//!     );
//!
//!     let config = EmrAdapterConfig::from_pairs([
//!         "apiUrl=https://api.cliniccloud.es/v1",
//!         "apiKey=secret",
//!         "clinicId=clinic-1",
//!     ])?;
//!
//!     if service.configure_adapter(CLINICCLOUD, config).await? {
//!         let patient = service
//!             .get_adapter()
//!             .get_patient_data(&PatientId::new("cc-1")?)
//!             .await?;
//!         println!("{} born {}", patient.full_name, patient.birth_date);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], whose error type
//! [`domain::EmrLinkError`] wraps vendor ([`domain::EmrError`]) and assistant
//! ([`domain::AssistantError`]) failures:
//!
//! ```rust,no_run
//! use emrlink::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = emrlink::config::load_config("emrlink.toml")?;
//!     println!("settings at {}", config.storage.settings_path);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod assistant;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
