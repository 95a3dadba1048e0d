//! Patient search query and result types

use super::errors::EmrError;
use super::ids::PatientId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical search fields understood by every adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SearchField {
    Name,
    DocumentId,
    Email,
    Phone,
    Mrn,
    BirthDate,
    Gender,
}

impl SearchField {
    /// Every canonical field, in display order
    pub const ALL: [SearchField; 7] = [
        SearchField::Name,
        SearchField::DocumentId,
        SearchField::Email,
        SearchField::Phone,
        SearchField::Mrn,
        SearchField::BirthDate,
        SearchField::Gender,
    ];

    /// camelCase name of the field in the canonical model
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Name => "name",
            SearchField::DocumentId => "documentId",
            SearchField::Email => "email",
            SearchField::Phone => "phone",
            SearchField::Mrn => "mrn",
            SearchField::BirthDate => "birthDate",
            SearchField::Gender => "gender",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sparse patient search filter
///
/// Every field is optional, but at least one must carry a non-blank value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmrSearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mrn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl EmrSearchQuery {
    /// Query matching on name only
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Value of a canonical field, if present and not blank
    pub fn get(&self, field: SearchField) -> Option<&str> {
        let value = match field {
            SearchField::Name => &self.name,
            SearchField::DocumentId => &self.document_id,
            SearchField::Email => &self.email,
            SearchField::Phone => &self.phone,
            SearchField::Mrn => &self.mrn,
            SearchField::BirthDate => &self.birth_date,
            SearchField::Gender => &self.gender,
        };
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// Present fields with their trimmed values
    pub fn fields(&self) -> Vec<(SearchField, &str)> {
        SearchField::ALL
            .iter()
            .filter_map(|field| self.get(*field).map(|value| (*field, value)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Reject queries that carry no criteria
    pub fn validate(&self) -> Result<(), EmrError> {
        if self.is_empty() {
            return Err(EmrError::InvalidQuery(
                "search query must contain at least one criterion".to_string(),
            ));
        }
        Ok(())
    }
}

/// One row of a patient search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmrPatientSearchResult {
    /// Valid input to `get_patient_data` on the same adapter
    pub id: PatientId,

    pub full_name: String,

    pub birth_date: String,

    pub gender: String,

    #[serde(default)]
    pub mrn: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,

    /// Vendor relevance score, when the vendor reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_is_rejected() {
        let query = EmrSearchQuery::default();
        assert!(query.is_empty());
        assert!(matches!(query.validate(), Err(EmrError::InvalidQuery(_))));
    }

    #[test]
    fn test_blank_values_count_as_absent() {
        let query = EmrSearchQuery {
            name: Some("   ".to_string()),
            email: Some(String::new()),
            ..Default::default()
        };
        assert!(query.is_empty());
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_fields_are_trimmed_and_ordered() {
        let query = EmrSearchQuery {
            gender: Some("female".to_string()),
            name: Some(" Ana ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            query.fields(),
            vec![(SearchField::Name, "Ana"), (SearchField::Gender, "female")]
        );
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_query_deserializes_camel_case() {
        let query: EmrSearchQuery =
            serde_json::from_str(r#"{"documentId":"X1","birthDate":"1990-01-01"}"#).unwrap();
        assert_eq!(query.get(SearchField::DocumentId), Some("X1"));
        assert_eq!(query.get(SearchField::BirthDate), Some("1990-01-01"));
    }
}
