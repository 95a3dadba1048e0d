//! Metrics command implementation

use super::context::{parse_patient_id, print_json, report, AppContext};
use crate::cli::exit;
use crate::domain::dates::format_date;
use crate::domain::{EmrPatientMetrics, MetricPoint, MetricType};
use clap::Args;
use std::str::FromStr;

/// Arguments for the metrics command
#[derive(Args, Debug)]
pub struct MetricsArgs {
    /// Patient id in the active EMR
    pub patient_id: String,

    /// Metrics to fetch (comma separated, e.g. weight,bloodPressure); all when omitted
    #[arg(long = "type", value_delimiter = ',', value_parser = MetricType::from_str)]
    pub types: Vec<MetricType>,

    /// Print the histories as JSON
    #[arg(long)]
    pub json: bool,
}

impl MetricsArgs {
    pub fn requested(&self) -> Vec<MetricType> {
        if self.types.is_empty() {
            MetricType::ALL.to_vec()
        } else {
            self.types.clone()
        }
    }

    /// Execute the metrics command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let ctx = match AppContext::load_or_report(config_path) {
            Ok(ctx) => ctx,
            Err(code) => return Ok(code),
        };
        let patient_id = match parse_patient_id(&self.patient_id) {
            Ok(id) => id,
            Err(code) => return Ok(code),
        };

        let requested = self.requested();
        let metrics = match ctx
            .emr
            .get_adapter()
            .get_patient_metrics(&patient_id, &requested)
            .await
        {
            Ok(metrics) => metrics,
            Err(e) => return Ok(report("Failed to load patient metrics", &e)),
        };

        if self.json {
            print_json(&metrics)?;
        } else {
            print_metrics(&metrics, &requested);
        }
        Ok(exit::OK)
    }
}

fn print_metrics(metrics: &EmrPatientMetrics, requested: &[MetricType]) {
    println!("📈 Metrics for {}", metrics.patient_id);
    println!();

    for metric in requested {
        let count = metrics.count(*metric).unwrap_or(0);
        if count == 0 {
            println!("  {:<18} no readings", metric.as_str());
            continue;
        }

        if *metric == MetricType::BloodPressure {
            if let Some(latest) = metrics.blood_pressure_history.as_ref().and_then(|h| h.last()) {
                println!(
                    "  {:<18} {:.0}/{:.0} {} on {} ({count} readings)",
                    metric.as_str(),
                    latest.systolic,
                    latest.diastolic,
                    metric.unit(),
                    format_date(&latest.date)
                );
            }
            continue;
        }

        if let Some(latest) = latest_point(metrics, *metric) {
            println!(
                "  {:<18} {} {} on {} ({count} readings)",
                metric.as_str(),
                latest.value,
                latest.unit.as_deref().unwrap_or(metric.unit()),
                format_date(&latest.date)
            );
        }
    }
    println!();
}

fn latest_point(metrics: &EmrPatientMetrics, metric: MetricType) -> Option<&MetricPoint> {
    let history = match metric {
        MetricType::Weight => &metrics.weight_history,
        MetricType::Height => &metrics.height_history,
        MetricType::Bmi => &metrics.bmi_history,
        MetricType::HeartRate => &metrics.heart_rate_history,
        MetricType::RespiratoryRate => &metrics.respiratory_rate_history,
        MetricType::OxygenSaturation => &metrics.oxygen_saturation_history,
        MetricType::Temperature => &metrics.temperature_history,
        MetricType::Glucose => &metrics.glucose_history,
        MetricType::Cholesterol => &metrics.cholesterol_history,
        MetricType::BloodPressure => return None,
    };
    history.as_ref().and_then(|h| h.iter().max_by_key(|p| p.date))
}
