//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for EmrLink using clap.

pub mod commands;

use crate::domain::{EmrError, EmrLinkError};
use clap::{Parser, Subcommand};

/// Process exit codes shared by every command
pub mod exit {
    pub const OK: i32 = 0;
    /// The vendor answered but rejected the connection test
    pub const TEST_FAILED: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
    pub const NOT_FOUND: i32 = 3;
    pub const CONNECTION_ERROR: i32 = 4;
    pub const FATAL: i32 = 5;
}

/// Exit code for an error surfaced by a command
pub fn exit_code(error: &EmrLinkError) -> i32 {
    match error {
        EmrLinkError::Configuration(_) | EmrLinkError::Validation(_) => exit::CONFIG_ERROR,
        EmrLinkError::Emr(e) => match e {
            EmrError::PatientNotFound { .. } | EmrError::ConsultationNotFound { .. } => {
                exit::NOT_FOUND
            }
            EmrError::AuthenticationFailed { .. }
            | EmrError::Connection { .. }
            | EmrError::Request { .. }
            | EmrError::InvalidResponse { .. } => exit::CONNECTION_ERROR,
            EmrError::MissingConfig { .. }
            | EmrError::UnsupportedVendor(_)
            | EmrError::NotConfigured(_)
            | EmrError::InvalidQuery(_) => exit::CONFIG_ERROR,
        },
        EmrLinkError::Assistant(e) => match e {
            crate::domain::AssistantError::Configuration { .. } => exit::CONFIG_ERROR,
            _ => exit::CONNECTION_ERROR,
        },
        EmrLinkError::Storage(_)
        | EmrLinkError::Serialization(_)
        | EmrLinkError::Io(_)
        | EmrLinkError::Other(_) => exit::FATAL,
    }
}

/// EmrLink - vendor-neutral EMR access
#[derive(Parser, Debug)]
#[command(name = "emrlink")]
#[command(version, about, long_about = None)]
#[command(author = "EmrLink Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "emrlink.toml", env = "EMRLINK_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "EMRLINK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Select an EMR vendor, test the connection and persist it
    Configure(commands::configure::ConfigureArgs),

    /// Show the active adapter and its configuration
    Status(commands::status::StatusArgs),

    /// Forget the persisted adapter and fall back to GENERIC
    Reset(commands::reset::ResetArgs),

    /// Search patients in the active EMR
    Search(commands::search::SearchArgs),

    /// Show one patient's record
    Patient(commands::patient::PatientArgs),

    /// Show a patient's clinical history
    History(commands::history::HistoryArgs),

    /// Show a patient's measurement histories
    Metrics(commands::metrics::MetricsArgs),

    /// Ask the clinical assistant a question
    Ask(commands::ask::AskArgs),
}

impl Cli {
    /// Run the selected command, returning the process exit code
    pub async fn execute(&self) -> anyhow::Result<i32> {
        match &self.command {
            Commands::Init(args) => args.execute().await,
            Commands::Configure(args) => args.execute(&self.config).await,
            Commands::Status(args) => args.execute(&self.config).await,
            Commands::Reset(args) => args.execute(&self.config).await,
            Commands::Search(args) => args.execute(&self.config).await,
            Commands::Patient(args) => args.execute(&self.config).await,
            Commands::History(args) => args.execute(&self.config).await,
            Commands::Metrics(args) => args.execute(&self.config).await,
            Commands::Ask(args) => args.execute(&self.config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AssistantError;
    use test_case::test_case;

    #[test]
    fn test_cli_parse_status() {
        let cli = Cli::parse_from(["emrlink", "status"]);
        assert_eq!(cli.config, "emrlink.toml");
        assert!(matches!(cli.command, Commands::Status(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["emrlink", "--config", "custom.toml", "reset"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::Reset(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["emrlink", "--log-level", "debug", "status"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["emrlink", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test_case(EmrLinkError::Configuration("bad".into()), exit::CONFIG_ERROR)]
    #[test_case(EmrError::UnsupportedVendor("FOO".into()).into(), exit::CONFIG_ERROR)]
    #[test_case(EmrError::MissingConfig { vendor: "OSCAR".into(), fields: vec!["baseUrl".into()] }.into(), exit::CONFIG_ERROR)]
    #[test_case(EmrError::PatientNotFound { vendor: "EPIC".into(), patient_id: "p".into() }.into(), exit::NOT_FOUND)]
    #[test_case(EmrError::Connection { vendor: "EPIC".into(), operation: "x".into(), message: "refused".into() }.into(), exit::CONNECTION_ERROR)]
    #[test_case(AssistantError::Configuration { provider: "openai".into(), message: "no key".into() }.into(), exit::CONFIG_ERROR)]
    #[test_case(AssistantError::Request { provider: "openai".into(), message: "500".into() }.into(), exit::CONNECTION_ERROR)]
    #[test_case(EmrLinkError::Storage("disk full".into()), exit::FATAL)]
    fn test_exit_code(error: EmrLinkError, expected: i32) {
        assert_eq!(exit_code(&error), expected);
    }
}
