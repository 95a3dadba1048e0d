//! Configure command implementation
//!
//! Builds an adapter for the chosen vendor, tests the connection and only
//! then persists it as the active adapter.

use super::context::{report, AppContext};
use crate::cli::exit;
use crate::config::EmrAdapterConfig;
use crate::domain::EmrLinkError;
use clap::Args;

/// Arguments for the configure command
#[derive(Args, Debug)]
pub struct ConfigureArgs {
    /// Vendor name (GENERIC, EPIC, OSCAR, CLINICCLOUD)
    pub vendor: String,

    /// Adapter setting, repeatable (e.g. --set baseUrl=https://emr.example.com)
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub settings: Vec<String>,
}

impl ConfigureArgs {
    /// Adapter config from the `--set` pairs, with the default HTTP timeout
    /// filled in when not given
    pub fn adapter_config(&self, default_timeout: u64) -> Result<EmrAdapterConfig, String> {
        let mut config = EmrAdapterConfig::from_pairs(&self.settings)?;
        if config.timeout_seconds.is_none() {
            config.timeout_seconds = Some(default_timeout);
        }
        Ok(config)
    }

    /// Execute the configure command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let vendor = self.vendor.trim().to_ascii_uppercase();
        tracing::info!(vendor = %vendor, "Configuring EMR adapter");

        println!("🔌 Configuring {vendor} adapter");
        println!();

        let ctx = match AppContext::load_or_report(config_path) {
            Ok(ctx) => ctx,
            Err(code) => return Ok(code),
        };

        let adapter_config = match self.adapter_config(ctx.config.http.timeout_seconds) {
            Ok(config) => config,
            Err(e) => return Ok(report("Invalid adapter setting", &EmrLinkError::Validation(e))),
        };

        match ctx.emr.configure_adapter(&vendor, adapter_config).await {
            Ok(true) => {
                println!("✅ Connection verified, {vendor} is now the active adapter");
                Ok(exit::OK)
            }
            Ok(false) => {
                println!("❌ Connection test failed for {vendor}");
                println!(
                    "   Keeping the current adapter: {}",
                    ctx.emr.get_current_adapter_name()
                );
                Ok(exit::TEST_FAILED)
            }
            Err(e) => Ok(report("Failed to configure adapter", &e)),
        }
    }
}
