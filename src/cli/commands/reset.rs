//! Reset command implementation

use super::context::{report, AppContext};
use crate::cli::exit;
use clap::Args;

/// Arguments for the reset command
#[derive(Args, Debug)]
pub struct ResetArgs {}

impl ResetArgs {
    /// Execute the reset command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let ctx = match AppContext::load_or_report(config_path) {
            Ok(ctx) => ctx,
            Err(code) => return Ok(code),
        };

        let previous = ctx.emr.get_current_adapter_name();
        if let Err(e) = ctx.emr.reset_config() {
            return Ok(report("Failed to reset adapter configuration", &e));
        }

        println!("✅ Adapter configuration cleared ({previous} → GENERIC)");
        Ok(exit::OK)
    }
}
