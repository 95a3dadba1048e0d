//! Patient metric histories

use super::ids::PatientId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Measurable patient metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricType {
    Weight,
    Height,
    Bmi,
    BloodPressure,
    HeartRate,
    RespiratoryRate,
    OxygenSaturation,
    Temperature,
    Glucose,
    Cholesterol,
}

impl MetricType {
    pub const ALL: [MetricType; 10] = [
        MetricType::Weight,
        MetricType::Height,
        MetricType::Bmi,
        MetricType::BloodPressure,
        MetricType::HeartRate,
        MetricType::RespiratoryRate,
        MetricType::OxygenSaturation,
        MetricType::Temperature,
        MetricType::Glucose,
        MetricType::Cholesterol,
    ];

    /// camelCase token
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Weight => "weight",
            MetricType::Height => "height",
            MetricType::Bmi => "bmi",
            MetricType::BloodPressure => "bloodPressure",
            MetricType::HeartRate => "heartRate",
            MetricType::RespiratoryRate => "respiratoryRate",
            MetricType::OxygenSaturation => "oxygenSaturation",
            MetricType::Temperature => "temperature",
            MetricType::Glucose => "glucose",
            MetricType::Cholesterol => "cholesterol",
        }
    }

    /// Canonical unit for the metric
    pub fn unit(&self) -> &'static str {
        match self {
            MetricType::Weight => "kg",
            MetricType::Height => "cm",
            MetricType::Bmi => "kg/m2",
            MetricType::BloodPressure => "mmHg",
            MetricType::HeartRate => "bpm",
            MetricType::RespiratoryRate => "breaths/min",
            MetricType::OxygenSaturation => "%",
            MetricType::Temperature => "°C",
            MetricType::Glucose => "mg/dL",
            MetricType::Cholesterol => "mg/dL",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        MetricType::ALL
            .iter()
            .find(|metric| metric.as_str().eq_ignore_ascii_case(token))
            .copied()
            .ok_or_else(|| format!("Unknown metric type: {token}"))
    }
}

/// One dated measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPoint {
    pub date: DateTime<Utc>,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// One dated blood-pressure reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodPressurePoint {
    pub date: DateTime<Utc>,
    pub systolic: f64,
    pub diastolic: f64,
}

/// Metric histories for one patient
///
/// Only requested metrics are present; an unrequested metric is `None` and is
/// omitted from the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmrPatientMetrics {
    pub patient_id: PatientId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_history: Option<Vec<MetricPoint>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_history: Option<Vec<MetricPoint>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi_history: Option<Vec<MetricPoint>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure_history: Option<Vec<BloodPressurePoint>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate_history: Option<Vec<MetricPoint>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respiratory_rate_history: Option<Vec<MetricPoint>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oxygen_saturation_history: Option<Vec<MetricPoint>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_history: Option<Vec<MetricPoint>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glucose_history: Option<Vec<MetricPoint>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol_history: Option<Vec<MetricPoint>>,
}

impl EmrPatientMetrics {
    /// Empty histories for exactly the requested metrics
    pub fn for_request(patient_id: PatientId, requested: &[MetricType]) -> Self {
        let mut metrics = Self {
            patient_id,
            weight_history: None,
            height_history: None,
            bmi_history: None,
            blood_pressure_history: None,
            heart_rate_history: None,
            respiratory_rate_history: None,
            oxygen_saturation_history: None,
            temperature_history: None,
            glucose_history: None,
            cholesterol_history: None,
        };
        for metric in requested {
            match metric {
                MetricType::BloodPressure => {
                    metrics.blood_pressure_history.get_or_insert_with(Vec::new);
                }
                other => {
                    if let Some(slot) = metrics.scalar_slot(*other) {
                        slot.get_or_insert_with(Vec::new);
                    }
                }
            }
        }
        metrics
    }

    fn scalar_slot(&mut self, metric: MetricType) -> Option<&mut Option<Vec<MetricPoint>>> {
        match metric {
            MetricType::Weight => Some(&mut self.weight_history),
            MetricType::Height => Some(&mut self.height_history),
            MetricType::Bmi => Some(&mut self.bmi_history),
            MetricType::HeartRate => Some(&mut self.heart_rate_history),
            MetricType::RespiratoryRate => Some(&mut self.respiratory_rate_history),
            MetricType::OxygenSaturation => Some(&mut self.oxygen_saturation_history),
            MetricType::Temperature => Some(&mut self.temperature_history),
            MetricType::Glucose => Some(&mut self.glucose_history),
            MetricType::Cholesterol => Some(&mut self.cholesterol_history),
            MetricType::BloodPressure => None,
        }
    }

    /// Append a scalar measurement; ignored if the metric was not requested
    pub fn push(&mut self, metric: MetricType, point: MetricPoint) {
        if let Some(Some(history)) = self.scalar_slot(metric) {
            history.push(point);
        }
    }

    /// Append a blood-pressure reading; ignored if it was not requested
    pub fn push_blood_pressure(&mut self, point: BloodPressurePoint) {
        if let Some(history) = self.blood_pressure_history.as_mut() {
            history.push(point);
        }
    }

    /// Sort every history by date, oldest first
    pub fn sort_by_date(&mut self) {
        for metric in MetricType::ALL {
            if let Some(Some(history)) = self.scalar_slot(metric) {
                history.sort_by_key(|p| p.date);
            }
        }
        if let Some(history) = self.blood_pressure_history.as_mut() {
            history.sort_by_key(|p| p.date);
        }
    }

    /// Number of readings recorded for a metric, `None` if not requested
    pub fn count(&self, metric: MetricType) -> Option<usize> {
        let history = match metric {
            MetricType::Weight => &self.weight_history,
            MetricType::Height => &self.height_history,
            MetricType::Bmi => &self.bmi_history,
            MetricType::BloodPressure => return self.blood_pressure_history.as_ref().map(Vec::len),
            MetricType::HeartRate => &self.heart_rate_history,
            MetricType::RespiratoryRate => &self.respiratory_rate_history,
            MetricType::OxygenSaturation => &self.oxygen_saturation_history,
            MetricType::Temperature => &self.temperature_history,
            MetricType::Glucose => &self.glucose_history,
            MetricType::Cholesterol => &self.cholesterol_history,
        };
        history.as_ref().map(Vec::len)
    }
}
