//! Assistant request and response types

use crate::domain::{EmrPatientHistory, PatientData};
use serde::{Deserialize, Serialize};

/// Patient record handed to the provider alongside the question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientContext {
    pub patient: PatientData,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<EmrPatientHistory>,
}

impl PatientContext {
    pub fn new(patient: PatientData) -> Self {
        Self {
            patient,
            history: None,
        }
    }

    pub fn with_history(mut self, history: EmrPatientHistory) -> Self {
        self.history = Some(history);
        self
    }
}

/// A clinician's question, optionally scoped to one patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantQuery {
    pub question: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<PatientContext>,
}

impl AssistantQuery {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: PatientContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// Dated event the provider extracted from the record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub date: String,
    pub event: String,
}

/// Observation about the patient with the provider's confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalInsight {
    pub category: String,
    pub description: String,
    pub confidence: f64,
}

/// Recommendation urgency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Lenient label parsing; anything unrecognised is medium
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" | "urgent" | "alta" => Priority::High,
            "low" | "baja" => Priority::Low,
            _ => Priority::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub description: String,
    pub rationale: String,
    pub priority: Priority,
    pub confidence: f64,
}

/// Structured answer from an assistant provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantResponse {
    pub answer: String,

    /// Overall confidence, always within 0.0..=1.0
    pub confidence: f64,

    pub timeline: Vec<TimelineEvent>,
    pub insights: Vec<ClinicalInsight>,
    pub recommendations: Vec<Recommendation>,

    /// Name of the provider that produced the answer
    pub provider: String,
}

impl AssistantResponse {
    /// Plain-text answer with no structure and zero confidence
    pub fn unstructured(answer: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            confidence: 0.0,
            timeline: Vec::new(),
            insights: Vec::new(),
            recommendations: Vec::new(),
            provider: provider.into(),
        }
    }

    /// Drop insights and recommendations below `threshold`
    pub fn retain_confident(&mut self, threshold: f64) {
        self.insights.retain(|i| i.confidence >= threshold);
        self.recommendations.retain(|r| r.confidence >= threshold);
    }
}

/// Clamp a confidence into 0.0..=1.0; NaN counts as no confidence
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
