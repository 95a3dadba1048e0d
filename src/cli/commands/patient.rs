//! Patient command implementation

use super::context::{parse_patient_id, print_json, report, AppContext};
use crate::cli::exit;
use crate::domain::PatientData;
use clap::Args;

/// Arguments for the patient command
#[derive(Args, Debug)]
pub struct PatientArgs {
    /// Patient id in the active EMR
    pub patient_id: String,

    /// Print the record as JSON
    #[arg(long)]
    pub json: bool,
}

impl PatientArgs {
    /// Execute the patient command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let ctx = match AppContext::load_or_report(config_path) {
            Ok(ctx) => ctx,
            Err(code) => return Ok(code),
        };
        let patient_id = match parse_patient_id(&self.patient_id) {
            Ok(id) => id,
            Err(code) => return Ok(code),
        };

        let patient = match ctx.emr.get_adapter().get_patient_data(&patient_id).await {
            Ok(patient) => patient,
            Err(e) => return Ok(report("Failed to load patient", &e)),
        };

        if self.json {
            print_json(&patient)?;
        } else {
            print_patient(&patient);
        }
        Ok(exit::OK)
    }
}

fn print_patient(patient: &PatientData) {
    println!("🧑 {} ({})", patient.full_name, patient.id);
    println!();
    println!("  Birth date:  {}", patient.birth_date);
    println!("  Gender:      {}", patient.gender);
    if !patient.mrn.is_empty() {
        println!("  MRN:         {}", patient.mrn);
    }
    if let Some(document) = &patient.document_id {
        println!("  Document:    {document}");
    }

    let contact = &patient.contact_info;
    if let Some(email) = &contact.email {
        println!("  Email:       {email}");
    }
    if let Some(phone) = &contact.phone {
        println!("  Phone:       {phone}");
    }
    if let Some(address) = &contact.address {
        let parts: Vec<&str> = [
            &address.line,
            &address.city,
            &address.region,
            &address.postal_code,
            &address.country,
        ]
        .into_iter()
        .filter_map(|p| p.as_deref())
        .collect();
        if !parts.is_empty() {
            println!("  Address:     {}", parts.join(", "));
        }
    }

    if let Some(history) = &patient.medical_history {
        println!();
        for allergy in &history.allergies {
            println!("  ⚠️  Allergy: {}", allergy.allergen);
        }
        for condition in &history.chronic_conditions {
            println!("  • Condition: {}", condition.description);
        }
        for medication in &history.medications {
            println!(
                "  💊 {} {}",
                medication.name,
                medication.dosage.as_deref().unwrap_or_default()
            );
        }
    }
    println!();
}
