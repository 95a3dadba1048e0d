//! Domain models and types for emrlink.
//!
//! This module contains the canonical, vendor-neutral data model every EMR
//! adapter translates into and out of.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PatientId`], [`RecordId`])
//! - **Patient records** ([`PatientData`], [`ContactInfo`], [`MedicalHistory`])
//! - **Clinical events** ([`EmrConsultation`], [`EmrTreatment`], [`EmrDiagnosis`], ...)
//! - **Search, history and metrics** request/response types
//! - **Error types** ([`EmrLinkError`], [`EmrError`], [`AssistantError`])
//! - **Result type alias** ([`Result`])
//!
//! # Identifiers
//!
//! Identifiers are opaque and scoped to the adapter that produced them:
//!
//! ```rust
//! use emrlink::domain::{PatientId, RecordId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let patient_id = PatientId::new("cc-1")?;
//! let consultation_id = RecordId::new("CONS-001")?;
//!
//! // This won't compile - the two id spaces are distinct types
//! // let wrong: PatientId = consultation_id;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, EmrLinkError>`]:
//!
//! ```rust
//! use emrlink::domain::{EmrError, EmrSearchQuery, Result};
//!
//! fn example(query: &EmrSearchQuery) -> Result<()> {
//!     // Adapter errors convert into EmrLinkError with ?
//!     query.validate()?;
//!     Ok(())
//! }
//! ```

pub mod clinical;
pub mod dates;
pub mod errors;
pub mod history;
pub mod ids;
pub mod metrics;
pub mod patient;
pub mod result;
pub mod search;

// Re-export commonly used types for convenience
pub use clinical::{
    AllergySeverity, AllergyStatus, ConsultationStatus, ConsultationUpdate, DiagnosisStatus,
    EmrAllergy, EmrConsultation, EmrDiagnosis, EmrMedication, EmrTreatment, LabResult, LabValue,
    MedicationStatus, TreatmentStatus, TreatmentType,
};
pub use errors::{AssistantError, EmrError, EmrLinkError};
pub use history::{EmrHistoryOptions, EmrPatientHistory};
pub use ids::{PatientId, RecordId};
pub use metrics::{BloodPressurePoint, EmrPatientMetrics, MetricPoint, MetricType};
pub use patient::{Address, BloodPressure, ContactInfo, MedicalHistory, PatientData, Surgery, VitalSigns};
pub use result::Result;
pub use search::{EmrPatientSearchResult, EmrSearchQuery, SearchField};
