//! Patient history request options and result

use super::clinical::{EmrAllergy, EmrConsultation, EmrDiagnosis, EmrMedication, EmrTreatment, LabResult};
use super::ids::PatientId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Filters for a history request
///
/// The default includes every section over an unbounded date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmrHistoryOptions {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub include_consultations: bool,
    pub include_treatments: bool,
    pub include_lab_results: bool,
    pub include_diagnoses: bool,
    pub include_allergies: bool,
    pub include_medications: bool,
}

impl Default for EmrHistoryOptions {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            include_consultations: true,
            include_treatments: true,
            include_lab_results: true,
            include_diagnoses: true,
            include_allergies: true,
            include_medications: true,
        }
    }
}

impl EmrHistoryOptions {
    /// Restrict to events between `start` and `end`, inclusive
    pub fn between(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self {
            start_date: start,
            end_date: end,
            ..Default::default()
        }
    }

    /// Returns true if `date` falls inside the requested range
    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        self.start_date.map_or(true, |start| *date >= start)
            && self.end_date.map_or(true, |end| *date <= end)
    }

    /// Range check for events whose date may be unknown; undated events are kept
    pub fn contains_opt(&self, date: Option<&DateTime<Utc>>) -> bool {
        date.map_or(true, |d| self.contains(d))
    }
}

/// A patient's clinical history, assembled fresh per call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmrPatientHistory {
    pub patient_id: PatientId,

    #[serde(default)]
    pub consultations: Vec<EmrConsultation>,

    #[serde(default)]
    pub treatments: Vec<EmrTreatment>,

    #[serde(default)]
    pub lab_results: Vec<LabResult>,

    #[serde(default)]
    pub diagnoses: Vec<EmrDiagnosis>,

    #[serde(default)]
    pub allergies: Vec<EmrAllergy>,

    #[serde(default)]
    pub medications: Vec<EmrMedication>,
}

impl EmrPatientHistory {
    pub fn new(patient_id: PatientId) -> Self {
        Self {
            patient_id,
            consultations: Vec::new(),
            treatments: Vec::new(),
            lab_results: Vec::new(),
            diagnoses: Vec::new(),
            allergies: Vec::new(),
            medications: Vec::new(),
        }
    }

    /// Total number of events across every section
    pub fn len(&self) -> usize {
        self.consultations.len()
            + self.treatments.len()
            + self.lab_results.len()
            + self.diagnoses.len()
            + self.allergies.len()
            + self.medications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
