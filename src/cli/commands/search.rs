//! Search command implementation

use super::context::{print_json, report, AppContext};
use crate::cli::exit;
use crate::domain::EmrSearchQuery;
use clap::Args;

/// Arguments for the search command
#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Full or partial patient name
    #[arg(long)]
    pub name: Option<String>,

    /// National id / document number
    #[arg(long)]
    pub document: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// Medical record number
    #[arg(long)]
    pub mrn: Option<String>,

    /// Birth date (YYYY-MM-DD)
    #[arg(long)]
    pub birth_date: Option<String>,

    #[arg(long)]
    pub gender: Option<String>,

    /// Maximum results; the adapter's default when omitted
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    pub fn query(&self) -> EmrSearchQuery {
        EmrSearchQuery {
            name: self.name.clone(),
            document_id: self.document.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            mrn: self.mrn.clone(),
            birth_date: self.birth_date.clone(),
            gender: self.gender.clone(),
        }
    }

    /// Execute the search command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let ctx = match AppContext::load_or_report(config_path) {
            Ok(ctx) => ctx,
            Err(code) => return Ok(code),
        };

        let query = self.query();
        let adapter = ctx.emr.get_adapter();
        let results = match adapter.search_patients(&query, self.limit).await {
            Ok(results) => results,
            Err(e) => return Ok(report("Patient search failed", &e)),
        };

        if self.json {
            print_json(&results)?;
            return Ok(exit::OK);
        }

        if results.is_empty() {
            println!("No patients matched.");
            return Ok(exit::OK);
        }

        println!("Found {} patient(s) in {}:", results.len(), adapter.vendor());
        println!();
        println!(
            "{:<20} {:<32} {:<12} {:<10} {:<15}",
            "ID", "Name", "Birth Date", "Gender", "MRN"
        );
        println!("{}", "-".repeat(92));
        for patient in &results {
            println!(
                "{:<20} {:<32} {:<12} {:<10} {:<15}",
                patient.id.as_str(),
                patient.full_name,
                patient.birth_date,
                patient.gender,
                patient.mrn
            );
        }
        println!();
        Ok(exit::OK)
    }
}
