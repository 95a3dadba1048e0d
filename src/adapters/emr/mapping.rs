//! Canonical-to-vendor vocabulary tables
//!
//! Search fields use declarative tables so they can be walked in both
//! directions and checked for completeness in tests. Metric tokens and
//! treatment vocabularies are exhaustive `match` functions; adding a canonical
//! variant without a vendor translation fails to compile.

use crate::domain::{ConsultationStatus, MetricType, SearchField, TreatmentStatus, TreatmentType};

/// Bidirectional search-field table for one vendor
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    pub vendor: &'static str,
    entries: &'static [(SearchField, &'static str)],
}

impl FieldMap {
    /// Vendor parameter name for a canonical field
    pub fn vendor_field(&self, field: SearchField) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(canonical, _)| *canonical == field)
            .map(|(_, vendor)| *vendor)
    }

    /// Canonical field for a vendor parameter name
    pub fn canonical_field(&self, vendor_field: &str) -> Option<SearchField> {
        self.entries
            .iter()
            .find(|(_, vendor)| *vendor == vendor_field)
            .map(|(canonical, _)| *canonical)
    }

    /// Canonical fields that have no vendor translation
    pub fn missing(&self) -> Vec<SearchField> {
        SearchField::ALL
            .iter()
            .filter(|field| self.vendor_field(**field).is_none())
            .copied()
            .collect()
    }

    /// Translate the non-blank fields of a query into vendor parameters
    pub fn translate<'q>(
        &self,
        fields: &[(SearchField, &'q str)],
    ) -> Vec<(&'static str, &'q str)> {
        fields
            .iter()
            .filter_map(|(field, value)| self.vendor_field(*field).map(|name| (name, *value)))
            .collect()
    }
}

/// ClinicCloud `/pacientes/buscar` parameters
pub const CLINICCLOUD_FIELDS: FieldMap = FieldMap {
    vendor: "CLINICCLOUD",
    entries: &[
        (SearchField::Name, "nombre"),
        (SearchField::DocumentId, "documento"),
        (SearchField::Email, "email"),
        (SearchField::Phone, "telefono"),
        (SearchField::Mrn, "numeroHistoria"),
        (SearchField::BirthDate, "fechaNacimiento"),
        (SearchField::Gender, "genero"),
    ],
};

/// OSCAR `/demographic/search` parameters
pub const OSCAR_FIELDS: FieldMap = FieldMap {
    vendor: "OSCAR",
    entries: &[
        (SearchField::Name, "name"),
        (SearchField::DocumentId, "hin"),
        (SearchField::Email, "email"),
        (SearchField::Phone, "phone"),
        (SearchField::Mrn, "chartNo"),
        (SearchField::BirthDate, "dob"),
        (SearchField::Gender, "sex"),
    ],
};

/// FHIR `Patient` search parameters
pub const EPIC_FIELDS: FieldMap = FieldMap {
    vendor: "EPIC",
    entries: &[
        (SearchField::Name, "name"),
        (SearchField::DocumentId, "ssn"),
        (SearchField::Email, "email"),
        (SearchField::Phone, "phone"),
        (SearchField::Mrn, "identifier"),
        (SearchField::BirthDate, "birthdate"),
        (SearchField::Gender, "gender"),
    ],
};

/// ClinicCloud metric token
pub fn cliniccloud_metric(metric: MetricType) -> &'static str {
    match metric {
        MetricType::Weight => "peso",
        MetricType::Height => "altura",
        MetricType::Bmi => "imc",
        MetricType::BloodPressure => "tension",
        MetricType::HeartRate => "frecuenciaCardiaca",
        MetricType::RespiratoryRate => "frecuenciaRespiratoria",
        MetricType::OxygenSaturation => "saturacion",
        MetricType::Temperature => "temperatura",
        MetricType::Glucose => "glucosa",
        MetricType::Cholesterol => "colesterol",
    }
}

/// OSCAR measurement type code
pub fn oscar_metric(metric: MetricType) -> &'static str {
    match metric {
        MetricType::Weight => "WT",
        MetricType::Height => "HT",
        MetricType::Bmi => "BMI",
        MetricType::BloodPressure => "BP",
        MetricType::HeartRate => "HR",
        MetricType::RespiratoryRate => "RESP",
        MetricType::OxygenSaturation => "O2SA",
        MetricType::Temperature => "TEMP",
        MetricType::Glucose => "BG",
        MetricType::Cholesterol => "TCHL",
    }
}

/// LOINC code used for the metric's FHIR Observation
pub fn loinc_metric(metric: MetricType) -> &'static str {
    match metric {
        MetricType::Weight => "29463-7",
        MetricType::Height => "8302-2",
        MetricType::Bmi => "39156-5",
        MetricType::BloodPressure => "85354-9",
        MetricType::HeartRate => "8867-4",
        MetricType::RespiratoryRate => "9279-1",
        MetricType::OxygenSaturation => "2708-6",
        MetricType::Temperature => "8310-5",
        MetricType::Glucose => "2339-0",
        MetricType::Cholesterol => "2093-3",
    }
}

/// LOINC component codes inside a blood-pressure panel
pub const LOINC_SYSTOLIC: &str = "8480-6";
pub const LOINC_DIASTOLIC: &str = "8462-4";

/// Reverse lookup through a metric token function
pub fn metric_from_token(token_of: fn(MetricType) -> &'static str, token: &str) -> Option<MetricType> {
    MetricType::ALL
        .iter()
        .find(|metric| token_of(**metric).eq_ignore_ascii_case(token.trim()))
        .copied()
}

const TREATMENT_TYPES: [TreatmentType; 5] = [
    TreatmentType::Medication,
    TreatmentType::Procedure,
    TreatmentType::Therapy,
    TreatmentType::Lifestyle,
    TreatmentType::Other,
];

const TREATMENT_STATUSES: [TreatmentStatus; 4] = [
    TreatmentStatus::Active,
    TreatmentStatus::Completed,
    TreatmentStatus::Cancelled,
    TreatmentStatus::Scheduled,
];

/// ClinicCloud `tipo` for a treatment
pub fn cliniccloud_treatment_type(kind: TreatmentType) -> &'static str {
    match kind {
        TreatmentType::Medication => "medicamento",
        TreatmentType::Procedure => "procedimiento",
        TreatmentType::Therapy => "terapia",
        TreatmentType::Lifestyle => "habito",
        TreatmentType::Other => "otro",
    }
}

/// ClinicCloud registration endpoint for a treatment
pub fn cliniccloud_treatment_path(kind: TreatmentType) -> &'static str {
    match kind {
        TreatmentType::Medication => "/tratamientos/medicamentos",
        TreatmentType::Procedure => "/tratamientos/procedimientos",
        TreatmentType::Therapy | TreatmentType::Lifestyle | TreatmentType::Other => {
            "/tratamientos/otros"
        }
    }
}

/// ClinicCloud `estado` for a treatment
pub fn cliniccloud_treatment_status(status: TreatmentStatus) -> &'static str {
    match status {
        TreatmentStatus::Active => "activo",
        TreatmentStatus::Completed => "completado",
        TreatmentStatus::Cancelled => "cancelado",
        TreatmentStatus::Scheduled => "programado",
    }
}

/// Canonical treatment type for a ClinicCloud `tipo`; unknown words map to other
pub fn treatment_type_from_cliniccloud(tipo: &str) -> TreatmentType {
    TREATMENT_TYPES
        .iter()
        .find(|kind| cliniccloud_treatment_type(**kind).eq_ignore_ascii_case(tipo.trim()))
        .copied()
        .unwrap_or(TreatmentType::Other)
}

/// Canonical treatment status for a ClinicCloud `estado`; unknown words map to active
pub fn treatment_status_from_cliniccloud(estado: &str) -> TreatmentStatus {
    TREATMENT_STATUSES
        .iter()
        .find(|status| cliniccloud_treatment_status(**status).eq_ignore_ascii_case(estado.trim()))
        .copied()
        .unwrap_or_default()
}

const CONSULTATION_STATUSES: [ConsultationStatus; 4] = [
    ConsultationStatus::Scheduled,
    ConsultationStatus::InProgress,
    ConsultationStatus::Completed,
    ConsultationStatus::Cancelled,
];

/// ClinicCloud `estado` for a consultation
pub fn cliniccloud_consultation_status(status: ConsultationStatus) -> &'static str {
    match status {
        ConsultationStatus::Scheduled => "programada",
        ConsultationStatus::InProgress => "en_curso",
        ConsultationStatus::Completed => "finalizada",
        ConsultationStatus::Cancelled => "cancelada",
    }
}

/// Canonical consultation status for a ClinicCloud `estado`; unknown words map to completed
pub fn consultation_status_from_cliniccloud(estado: &str) -> ConsultationStatus {
    CONSULTATION_STATUSES
        .iter()
        .find(|status| cliniccloud_consultation_status(**status).eq_ignore_ascii_case(estado.trim()))
        .copied()
        .unwrap_or_default()
}
