//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::exit;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "emrlink.toml")]
    pub output: String,

    /// Include the optional sections with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing EmrLink configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(exit::CONFIG_ERROR);
        }

        let content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, content) {
            Ok(()) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set EMRLINK_ASSISTANT_API_KEY (or OPENAI_API_KEY with --with-examples)");
                println!("  2. Connect an EMR, for example:");
                println!("     emrlink configure CLINICCLOUD --set apiUrl=https://api.cliniccloud.es/v1 \\");
                println!("       --set apiKey=<key> --set clinicId=<clinic>");
                println!("  3. Check the connection: emrlink status --check");
                println!();
                Ok(exit::OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(exit::FATAL)
            }
        }
    }

    fn generate_minimal_config() -> String {
        r#"# EmrLink Configuration File

[application]
log_level = "info"

[storage]
settings_path = ".emrlink/settings.json"

[assistant]
provider = "openai"
# Or leave unset and export EMRLINK_ASSISTANT_API_KEY
# api_key = "${OPENAI_API_KEY}"
"#
        .to_string()
    }

    fn generate_config_with_examples() -> String {
        r#"# EmrLink Configuration File
#
# Values of the form ${VAR} are read from the environment (or .env).
# Any setting can also be overridden with EMRLINK_* variables.

[application]
# trace | debug | info | warn | error
log_level = "info"

[storage]
# Active EMR adapter and its credentials are persisted here by
# `emrlink configure`. Keep this file private.
settings_path = ".emrlink/settings.json"

[http]
# Default per-request timeout for vendor calls, used when an adapter
# configuration does not set timeoutSeconds itself
timeout_seconds = 30

[assistant]
# openai | medpalm
provider = "openai"
api_key = "${OPENAI_API_KEY}"
model = "gpt-4"
temperature = 0.7
max_tokens = 2048
# Insights and recommendations below this confidence are hidden
min_confidence = 0.0
timeout_seconds = 60

# Med-PaLM on Vertex AI instead:
# provider = "medpalm"
# api_key = "${VERTEX_ACCESS_TOKEN}"
# project_id = "my-gcp-project"
# location = "us-central1"

[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "/var/log/emrlink"
# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_generated_configs_parse() {
        std::env::set_var("OPENAI_API_KEY", "sk-init-test");
        assert!(parse_config(&InitArgs::generate_minimal_config()).is_ok());
        assert!(parse_config(&InitArgs::generate_config_with_examples()).is_ok());
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("emrlink.toml");
        fs::write(&output, "# existing").unwrap();

        let args = InitArgs {
            output: output.display().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), exit::CONFIG_ERROR);
        assert_eq!(fs::read_to_string(&output).unwrap(), "# existing");

        let args = InitArgs { force: true, ..args };
        assert_eq!(args.execute().await.unwrap(), exit::OK);
        assert!(fs::read_to_string(&output).unwrap().contains("[assistant]"));
    }
}
