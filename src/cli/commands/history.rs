//! History command implementation

use super::context::{parse_patient_id, print_json, report, AppContext};
use crate::cli::exit;
use crate::domain::dates::{format_date, parse_timestamp};
use crate::domain::{EmrHistoryOptions, EmrLinkError, EmrPatientHistory};
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};

/// History sections selectable with `--only`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HistorySection {
    Consultations,
    Treatments,
    Labs,
    Diagnoses,
    Allergies,
    Medications,
}

/// Arguments for the history command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Patient id in the active EMR
    pub patient_id: String,

    /// Earliest event date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub from: Option<String>,

    /// Latest event date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub to: Option<String>,

    /// Restrict to these sections (comma separated)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub only: Vec<HistorySection>,

    /// Print the history as JSON
    #[arg(long)]
    pub json: bool,
}

impl HistoryArgs {
    /// History filter from the flags
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unparseable or inverted date range
    pub fn options(&self) -> Result<EmrHistoryOptions, EmrLinkError> {
        let start = parse_bound("--from", self.from.as_deref())?;
        let end = parse_bound("--to", self.to.as_deref())?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(EmrLinkError::Validation(
                    "--from must not be after --to".to_string(),
                ));
            }
        }

        let mut options = EmrHistoryOptions::between(start, end);
        if !self.only.is_empty() {
            let wants = |section| self.only.contains(&section);
            options.include_consultations = wants(HistorySection::Consultations);
            options.include_treatments = wants(HistorySection::Treatments);
            options.include_lab_results = wants(HistorySection::Labs);
            options.include_diagnoses = wants(HistorySection::Diagnoses);
            options.include_allergies = wants(HistorySection::Allergies);
            options.include_medications = wants(HistorySection::Medications);
        }
        Ok(options)
    }

    /// Execute the history command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let options = match self.options() {
            Ok(options) => options,
            Err(e) => return Ok(report("Invalid history filter", &e)),
        };
        let ctx = match AppContext::load_or_report(config_path) {
            Ok(ctx) => ctx,
            Err(code) => return Ok(code),
        };
        let patient_id = match parse_patient_id(&self.patient_id) {
            Ok(id) => id,
            Err(code) => return Ok(code),
        };

        let history = match ctx
            .emr
            .get_adapter()
            .get_patient_history(&patient_id, Some(&options))
            .await
        {
            Ok(history) => history,
            Err(e) => return Ok(report("Failed to load patient history", &e)),
        };

        if self.json {
            print_json(&history)?;
        } else {
            print_history(&history);
        }
        Ok(exit::OK)
    }
}

fn parse_bound(flag: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>, EmrLinkError> {
    value
        .map(|raw| {
            parse_timestamp(raw)
                .ok_or_else(|| EmrLinkError::Validation(format!("{flag}: invalid date '{raw}'")))
        })
        .transpose()
}

fn print_history(history: &EmrPatientHistory) {
    println!("📋 History for {} ({} entries)", history.patient_id, history.len());

    if !history.consultations.is_empty() {
        println!();
        println!("Consultations:");
        for c in &history.consultations {
            println!(
                "  {}  {:<10} {}",
                format_date(&c.date),
                c.status.as_str(),
                c.reason.as_deref().unwrap_or("-")
            );
        }
    }

    if !history.diagnoses.is_empty() {
        println!();
        println!("Diagnoses:");
        for d in &history.diagnoses {
            println!("  {:<8} {}", d.code, d.description);
        }
    }

    if !history.treatments.is_empty() {
        println!();
        println!("Treatments:");
        for t in &history.treatments {
            println!(
                "  {}  {:<12} {} ({})",
                format_date(&t.start_date),
                t.treatment_type.as_str(),
                t.name,
                t.status.as_str()
            );
        }
    }

    if !history.medications.is_empty() {
        println!();
        println!("Medications:");
        for m in &history.medications {
            println!(
                "  {} {} {}",
                m.name,
                m.dosage.as_deref().unwrap_or_default(),
                m.frequency.as_deref().unwrap_or_default()
            );
        }
    }

    if !history.allergies.is_empty() {
        println!();
        println!("Allergies:");
        for a in &history.allergies {
            println!("  {} {}", a.allergen, a.reaction.as_deref().unwrap_or_default());
        }
    }

    if !history.lab_results.is_empty() {
        println!();
        println!("Lab results:");
        for lab in &history.lab_results {
            let abnormal = lab.results.values().filter(|v| v.is_abnormal).count();
            println!(
                "  {}  {} ({} values, {} abnormal)",
                format_date(&lab.date),
                lab.test_name,
                lab.results.len(),
                abnormal
            );
        }
    }
    println!();
}
