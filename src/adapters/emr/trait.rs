//! EMR adapter trait definition
//!
//! This module defines the `EmrAdapter` trait that abstracts vendor-specific
//! EMR integrations behind one canonical interface. Every implementation
//! translates canonical queries into the vendor's vocabulary and reshapes the
//! vendor's replies into the types in [`crate::domain`].

use crate::domain::{
    ConsultationUpdate, EmrConsultation, EmrHistoryOptions, EmrPatientHistory, EmrPatientMetrics,
    EmrPatientSearchResult, EmrSearchQuery, EmrTreatment, MetricType, PatientData, PatientId,
    RecordId, Result,
};
use async_trait::async_trait;

/// Registry name of the built-in demo adapter
pub const GENERIC: &str = "GENERIC";
/// Registry name of the EPIC FHIR adapter
pub const EPIC: &str = "EPIC";
/// Registry name of the OSCAR adapter
pub const OSCAR: &str = "OSCAR";
/// Registry name of the ClinicCloud adapter
pub const CLINICCLOUD: &str = "CLINICCLOUD";

/// Trait for EMR vendor adapters
///
/// All methods take `&self`; adapters that cache tokens use interior
/// mutability. Ids returned by [`search_patients`](Self::search_patients) are
/// valid input to [`get_patient_data`](Self::get_patient_data) on the same
/// adapter.
///
/// # Example
///
/// ```no_run
/// use emrlink::adapters::emr::{EmrAdapter, GenericEmrAdapter};
/// use emrlink::domain::{EmrSearchQuery, PatientId};
///
/// # async fn example() -> emrlink::domain::Result<()> {
/// let adapter = GenericEmrAdapter::new();
///
/// let results = adapter
///     .search_patients(&EmrSearchQuery::by_name("Martínez"), None)
///     .await?;
///
/// for row in results {
///     let patient = adapter.get_patient_data(&row.id).await?;
///     println!("{} ({})", patient.full_name, patient.birth_date);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait EmrAdapter: Send + Sync {
    /// Human-readable adapter name
    fn name(&self) -> &str;

    /// Registry name (`GENERIC`, `EPIC`, `OSCAR`, `CLINICCLOUD`)
    fn vendor(&self) -> &'static str;

    /// Number of search results returned when the caller gives no limit
    fn default_search_limit(&self) -> usize;

    /// Check that the vendor is reachable and accepts the credentials
    ///
    /// # Returns
    ///
    /// `Ok(false)` if the vendor rejected the credentials
    ///
    /// # Errors
    ///
    /// Transport failures are [`EmrError::Connection`](crate::domain::EmrError::Connection)
    async fn test_connection(&self) -> Result<bool>;

    /// Fetch one patient's record
    ///
    /// # Errors
    ///
    /// [`EmrError::PatientNotFound`](crate::domain::EmrError::PatientNotFound)
    /// if the vendor has no such patient
    async fn get_patient_data(&self, patient_id: &PatientId) -> Result<PatientData>;

    /// Search patients by any combination of canonical fields
    ///
    /// # Errors
    ///
    /// [`EmrError::InvalidQuery`](crate::domain::EmrError::InvalidQuery) if
    /// the query carries no criteria
    async fn search_patients(
        &self,
        query: &EmrSearchQuery,
        limit: Option<usize>,
    ) -> Result<Vec<EmrPatientSearchResult>>;

    /// Fetch a patient's clinical history
    ///
    /// `None` options fetch every section over all dates.
    async fn get_patient_history(
        &self,
        patient_id: &PatientId,
        options: Option<&EmrHistoryOptions>,
    ) -> Result<EmrPatientHistory>;

    /// Store a new consultation, returning the vendor-assigned id
    async fn save_consultation(&self, consultation: &EmrConsultation) -> Result<RecordId>;

    /// Apply a partial update to a stored consultation
    ///
    /// # Returns
    ///
    /// Whether the vendor reported the update as applied
    async fn update_consultation(
        &self,
        consultation_id: &RecordId,
        updates: &ConsultationUpdate,
    ) -> Result<bool>;

    /// Store a new treatment, returning the vendor-assigned id
    async fn register_treatment(&self, treatment: &EmrTreatment) -> Result<RecordId>;

    /// Fetch metric histories; only the requested metrics are populated
    async fn get_patient_metrics(
        &self,
        patient_id: &PatientId,
        metric_types: &[MetricType],
    ) -> Result<EmrPatientMetrics>;
}
