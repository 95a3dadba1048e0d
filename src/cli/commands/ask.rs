//! Ask command implementation

use super::context::{parse_patient_id, print_json, report, AppContext};
use crate::assistant::{create_provider, AssistantResponse, ClinicalAssistant};
use crate::cli::exit;
use clap::Args;

/// Arguments for the ask command
#[derive(Args, Debug)]
pub struct AskArgs {
    /// Question for the assistant
    pub question: String,

    /// Ground the answer in this patient's record
    #[arg(short, long)]
    pub patient: Option<String>,

    /// Print the structured response as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskArgs {
    /// Execute the ask command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let ctx = match AppContext::load_or_report(config_path) {
            Ok(ctx) => ctx,
            Err(code) => return Ok(code),
        };
        let patient_id = match self.patient.as_deref().map(parse_patient_id).transpose() {
            Ok(id) => id,
            Err(code) => return Ok(code),
        };

        let provider = match create_provider(&ctx.config.assistant) {
            Ok(provider) => provider,
            Err(e) => return Ok(report("Assistant is not configured", &e)),
        };
        let assistant = ClinicalAssistant::new(ctx.emr.clone(), provider);

        let response = match assistant.ask(&self.question, patient_id.as_ref()).await {
            Ok(response) => response,
            Err(e) => return Ok(report("Assistant query failed", &e)),
        };

        if self.json {
            print_json(&response)?;
        } else {
            print_response(&response);
        }
        Ok(exit::OK)
    }
}

fn print_response(response: &AssistantResponse) {
    println!("🩺 {}", response.answer);
    println!();
    println!(
        "   Confidence: {:.0}% ({})",
        response.confidence * 100.0,
        response.provider
    );

    if !response.timeline.is_empty() {
        println!();
        println!("Timeline:");
        for event in &response.timeline {
            println!("  {:<12} {}", event.date, event.event);
        }
    }

    if !response.insights.is_empty() {
        println!();
        println!("Insights:");
        for insight in &response.insights {
            println!(
                "  [{}] {} ({:.0}%)",
                insight.category,
                insight.description,
                insight.confidence * 100.0
            );
        }
    }

    if !response.recommendations.is_empty() {
        println!();
        println!("Recommendations:");
        for rec in &response.recommendations {
            println!("  ({}) {}", rec.priority, rec.description);
            if !rec.rationale.is_empty() {
                println!("         {}", rec.rationale);
            }
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::parse_from(["emrlink", "ask", "Any drug interactions?", "--patient", "PAT-001"]);
        let Commands::Ask(args) = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(args.question, "Any drug interactions?");
        assert_eq!(args.patient.as_deref(), Some("PAT-001"));
        assert!(!args.json);
    }
}
