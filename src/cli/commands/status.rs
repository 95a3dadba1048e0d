//! Status command implementation
//!
//! This module implements the `status` command for displaying the active
//! EMR adapter and, optionally, probing its connection.

use super::context::{report, AppContext};
use crate::cli::exit;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Also run the adapter's connection test
    #[arg(long)]
    pub check: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking adapter status");

        println!("📊 EMR Adapter Status");
        println!();

        let ctx = match AppContext::load_or_report(config_path) {
            Ok(ctx) => ctx,
            Err(code) => return Ok(code),
        };

        let adapter = ctx.emr.get_adapter();
        println!("  Active adapter:    {}", ctx.emr.get_current_adapter_name());
        println!("  Adapter name:      {}", adapter.name());
        println!(
            "  Configured:        {}",
            if ctx.emr.has_configured_adapter() { "yes" } else { "no (demo data)" }
        );
        println!("  Settings file:     {}", ctx.config.storage.settings_path);
        println!("  Supported vendors: {}", ctx.factory.supported_vendors().join(", "));

        if let Some(config) = ctx.emr.current_config() {
            println!();
            println!("Adapter configuration:");
            for (key, value) in config.redacted().as_object().into_iter().flatten() {
                let shown = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
                println!("  {key:<16} {shown}");
            }
        }

        if !self.check {
            println!();
            return Ok(exit::OK);
        }

        println!();
        match adapter.test_connection().await {
            Ok(true) => {
                println!("✅ Connection OK");
                Ok(exit::OK)
            }
            Ok(false) => {
                println!("❌ Connection test failed");
                Ok(exit::TEST_FAILED)
            }
            Err(e) => Ok(report("Connection test error", &e)),
        }
    }
}
