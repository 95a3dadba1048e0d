//! Clinical events: consultations, treatments, diagnoses, medications,
//! allergies and lab results
//!
//! Every event is tied to a patient. Consultations and treatments also carry the
//! provider that recorded them.

use super::ids::{PatientId, RecordId};
use super::patient::VitalSigns;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A consultation (encounter) between a patient and a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmrConsultation {
    /// Vendor-assigned id; absent until the consultation is saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    pub patient_id: PatientId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,

    pub date: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,

    #[serde(default)]
    pub diagnoses: Vec<EmrDiagnosis>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vital_signs: Option<VitalSigns>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: ConsultationStatus,
}

impl EmrConsultation {
    /// Create an unsaved consultation for a patient at the given date
    pub fn new(patient_id: PatientId, date: DateTime<Utc>) -> Self {
        Self {
            id: None,
            patient_id,
            provider_id: None,
            date,
            reason: None,
            notes: None,
            specialty: None,
            diagnoses: Vec::new(),
            vital_signs: None,
            follow_up_date: None,
            status: ConsultationStatus::default(),
        }
    }
}

/// Consultation lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationStatus {
    Scheduled,
    InProgress,
    #[default]
    Completed,
    Cancelled,
}

impl ConsultationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationStatus::Scheduled => "scheduled",
            ConsultationStatus::InProgress => "inprogress",
            ConsultationStatus::Completed => "completed",
            ConsultationStatus::Cancelled => "cancelled",
        }
    }
}

/// Partial update of a saved consultation
///
/// Absent fields leave the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnoses: Option<Vec<EmrDiagnosis>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ConsultationStatus>,
}

impl ConsultationUpdate {
    /// Returns true if the update would change nothing
    pub fn is_empty(&self) -> bool {
        self.reason.is_none()
            && self.notes.is_none()
            && self.specialty.is_none()
            && self.follow_up_date.is_none()
            && self.diagnoses.is_none()
            && self.status.is_none()
    }

    /// Merge the present fields into an existing consultation
    pub fn apply_to(&self, consultation: &mut EmrConsultation) {
        if let Some(reason) = &self.reason {
            consultation.reason = Some(reason.clone());
        }
        if let Some(notes) = &self.notes {
            consultation.notes = Some(notes.clone());
        }
        if let Some(specialty) = &self.specialty {
            consultation.specialty = Some(specialty.clone());
        }
        if let Some(follow_up) = self.follow_up_date {
            consultation.follow_up_date = Some(follow_up);
        }
        if let Some(diagnoses) = &self.diagnoses {
            consultation.diagnoses = diagnoses.clone();
        }
        if let Some(status) = self.status {
            consultation.status = status;
        }
    }
}

/// A prescribed or recommended treatment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmrTreatment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    pub patient_id: PatientId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,

    /// Consultation the treatment was prescribed in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultation_id: Option<RecordId>,

    #[serde(rename = "type")]
    pub treatment_type: TreatmentType,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    pub start_date: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: TreatmentStatus,
}

impl EmrTreatment {
    /// Create a new active treatment starting at `start_date`
    pub fn new(
        patient_id: PatientId,
        treatment_type: TreatmentType,
        name: impl Into<String>,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            patient_id,
            provider_id: None,
            consultation_id: None,
            treatment_type,
            name: name.into(),
            description: None,
            dosage: None,
            frequency: None,
            instructions: None,
            start_date,
            end_date: None,
            status: TreatmentStatus::Active,
        }
    }
}

/// Kind of treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreatmentType {
    Medication,
    Procedure,
    Therapy,
    Lifestyle,
    Other,
}

impl TreatmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TreatmentType::Medication => "medication",
            TreatmentType::Procedure => "procedure",
            TreatmentType::Therapy => "therapy",
            TreatmentType::Lifestyle => "lifestyle",
            TreatmentType::Other => "other",
        }
    }
}

impl fmt::Display for TreatmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TreatmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "medication" => Ok(TreatmentType::Medication),
            "procedure" => Ok(TreatmentType::Procedure),
            "therapy" => Ok(TreatmentType::Therapy),
            "lifestyle" => Ok(TreatmentType::Lifestyle),
            "other" => Ok(TreatmentType::Other),
            other => Err(format!("Unknown treatment type: {other}")),
        }
    }
}

/// Treatment lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreatmentStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
    Scheduled,
}

impl TreatmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TreatmentStatus::Active => "active",
            TreatmentStatus::Completed => "completed",
            TreatmentStatus::Cancelled => "cancelled",
            TreatmentStatus::Scheduled => "scheduled",
        }
    }
}

/// A coded diagnosis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmrDiagnosis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub patient_id: PatientId,

    pub code: String,

    /// Coding system exactly as the vendor reported it (ICD-10, SNOMED URI, ...)
    #[serde(default)]
    pub system: String,

    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: DiagnosisStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosisStatus {
    #[default]
    Active,
    Resolved,
    Recurrence,
    Inactive,
}

impl DiagnosisStatus {
    /// Lenient parse of vendor status words; unknown words are treated as active
    pub fn from_vendor(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "resolved" | "resuelto" | "resuelta" | "remission" => DiagnosisStatus::Resolved,
            "recurrence" | "relapse" | "recurrente" => DiagnosisStatus::Recurrence,
            "inactive" | "inactivo" | "inactiva" => DiagnosisStatus::Inactive,
            _ => DiagnosisStatus::Active,
        }
    }
}

/// A medication the patient takes or took
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmrMedication {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub patient_id: PatientId,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: MedicationStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescribed_by: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicationStatus {
    #[default]
    Active,
    Completed,
    Discontinued,
}

impl MedicationStatus {
    pub fn from_vendor(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "completed" | "finalizado" | "finalizada" | "completado" => MedicationStatus::Completed,
            "stopped" | "discontinued" | "cancelled" | "suspendido" | "suspendida" => {
                MedicationStatus::Discontinued
            }
            _ => MedicationStatus::Active,
        }
    }
}

/// A recorded allergy or intolerance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmrAllergy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub patient_id: PatientId,

    /// Substance the patient reacts to
    pub allergen: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<AllergySeverity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onset_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: AllergyStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllergySeverity {
    Mild,
    Moderate,
    Severe,
}

impl AllergySeverity {
    /// Lenient parse of vendor severity words
    pub fn from_vendor(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mild" | "low" | "leve" => Some(AllergySeverity::Mild),
            "moderate" | "moderada" | "moderado" => Some(AllergySeverity::Moderate),
            "severe" | "high" | "grave" | "severa" => Some(AllergySeverity::Severe),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllergyStatus {
    #[default]
    Active,
    Inactive,
    Resolved,
}

impl AllergyStatus {
    pub fn from_vendor(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "inactive" | "inactiva" | "inactivo" => AllergyStatus::Inactive,
            "resolved" | "resuelta" | "resuelto" => AllergyStatus::Resolved,
            _ => AllergyStatus::Active,
        }
    }
}

/// Results of one laboratory test panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub patient_id: PatientId,

    pub test_name: String,

    pub date: DateTime<Utc>,

    /// Named measurements within the panel
    #[serde(default)]
    pub results: BTreeMap<String, LabValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A single laboratory measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabValue {
    /// Numeric or textual value as reported
    pub value: serde_json::Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_range: Option<String>,

    #[serde(default)]
    pub is_abnormal: bool,
}
