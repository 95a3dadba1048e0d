//! Canonical patient record
//!
//! `PatientData` is the vendor-neutral shape every adapter produces. It is an
//! owned value: each fetch returns a fresh record and nothing above the adapter
//! mutates it in place.

use super::clinical::{EmrAllergy, EmrConsultation, EmrDiagnosis, EmrMedication, EmrTreatment, LabResult};
use super::ids::PatientId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical patient record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientData {
    /// Identifier in the producing adapter's id space
    pub id: PatientId,

    /// Display name, given names first
    pub full_name: String,

    /// Birth date exactly as the vendor reported it
    pub birth_date: String,

    /// Gender exactly as the vendor reported it
    pub gender: String,

    /// National or document identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,

    /// Medical record number assigned by the vendor
    #[serde(default)]
    pub mrn: String,

    #[serde(default)]
    pub contact_info: ContactInfo,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<MedicalHistory>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vital_signs: Option<VitalSigns>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consultations: Vec<EmrConsultation>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lab_results: Vec<LabResult>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub treatments: Vec<EmrTreatment>,
}

impl PatientData {
    /// Create a record with identity fields only
    pub fn new(
        id: PatientId,
        full_name: impl Into<String>,
        birth_date: impl Into<String>,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            birth_date: birth_date.into(),
            gender: gender.into(),
            document_id: None,
            mrn: String::new(),
            contact_info: ContactInfo::default(),
            medical_history: None,
            vital_signs: None,
            last_visit: None,
            consultations: Vec::new(),
            lab_results: Vec::new(),
            treatments: Vec::new(),
        }
    }

    /// Set the medical record number
    pub fn with_mrn(mut self, mrn: impl Into<String>) -> Self {
        self.mrn = mrn.into();
        self
    }

    /// Set the document identifier
    pub fn with_document_id(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = Some(document_id.into());
        self
    }

    /// Set the contact information
    pub fn with_contact_info(mut self, contact_info: ContactInfo) -> Self {
        self.contact_info = contact_info;
        self
    }

    /// Set the medical history
    pub fn with_medical_history(mut self, history: MedicalHistory) -> Self {
        self.medical_history = Some(history);
        self
    }
}

/// Contact details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// Structured postal address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// State, province, or region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Address {
    /// Build an address, returning `None` when every part is blank
    pub fn from_parts(
        line: Option<String>,
        city: Option<String>,
        region: Option<String>,
        postal_code: Option<String>,
        country: Option<String>,
    ) -> Option<Self> {
        let clean = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let address = Self {
            line: clean(line),
            city: clean(city),
            region: clean(region),
            postal_code: clean(postal_code),
            country: clean(country),
        };
        if address.is_empty() {
            None
        } else {
            Some(address)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_none()
            && self.city.is_none()
            && self.region.is_none()
            && self.postal_code.is_none()
            && self.country.is_none()
    }

    /// Single-line rendering, parts separated by commas
    pub fn formatted(&self) -> String {
        [
            &self.line,
            &self.city,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .filter_map(|part| part.as_deref())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Summary of a patient's medical background
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistory {
    #[serde(default)]
    pub allergies: Vec<EmrAllergy>,

    #[serde(default)]
    pub chronic_conditions: Vec<EmrDiagnosis>,

    #[serde(default)]
    pub medications: Vec<EmrMedication>,

    #[serde(default)]
    pub surgeries: Vec<Surgery>,
}

impl MedicalHistory {
    pub fn is_empty(&self) -> bool {
        self.allergies.is_empty()
            && self.chronic_conditions.is_empty()
            && self.medications.is_empty()
            && self.surgeries.is_empty()
    }
}

/// Past surgical procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surgery {
    pub procedure: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Vital signs snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSigns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,

    /// Degrees Celsius
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Beats per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<BloodPressure>,

    /// Breaths per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respiratory_rate: Option<f64>,

    /// Percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oxygen_saturation: Option<f64>,

    /// Kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Centimetres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl VitalSigns {
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.heart_rate.is_none()
            && self.blood_pressure.is_none()
            && self.respiratory_rate.is_none()
            && self.oxygen_saturation.is_none()
            && self.weight.is_none()
            && self.height.is_none()
    }
}

/// Systolic/diastolic pair in mmHg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: f64,
    pub diastolic: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_builder() {
        let patient = PatientData::new(PatientId::new("cc-1").unwrap(), "Ana López", "1990-01-01", "female")
            .with_mrn("HC-77")
            .with_document_id("12345678Z");

        assert_eq!(patient.full_name, "Ana López");
        assert_eq!(patient.mrn, "HC-77");
        assert_eq!(patient.document_id.as_deref(), Some("12345678Z"));
        assert!(patient.medical_history.is_none());
    }

    #[test]
    fn test_patient_serializes_camel_case() {
        let patient = PatientData::new(PatientId::new("cc-1").unwrap(), "Ana López", "1990-01-01", "female");
        let json = serde_json::to_value(&patient).unwrap();

        assert_eq!(json["id"], "cc-1");
        assert_eq!(json["fullName"], "Ana López");
        assert_eq!(json["birthDate"], "1990-01-01");
        assert!(json.get("medicalHistory").is_none());
        assert!(json.get("consultations").is_none());
    }

    #[test]
    fn test_address_from_blank_parts_is_none() {
        assert!(Address::from_parts(Some(" ".into()), None, None, None, None).is_none());
    }

    #[test]
    fn test_address_formatted() {
        let address = Address::from_parts(
            Some("Calle Libertad 123".into()),
            Some("Madrid".into()),
            None,
            Some("28001".into()),
            Some("ES".into()),
        )
        .unwrap();
        assert_eq!(address.formatted(), "Calle Libertad 123, Madrid, 28001, ES");
    }

    #[test]
    fn test_vital_signs_is_empty() {
        let mut vitals = VitalSigns::default();
        assert!(vitals.is_empty());
        vitals.heart_rate = Some(72.0);
        assert!(!vitals.is_empty());
    }
}
