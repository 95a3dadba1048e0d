// EmrLink - Vendor-neutral EMR adapter layer
// Copyright (c) 2025 EmrLink Contributors
// Licensed under the MIT License

use clap::Parser;
use emrlink::cli::{exit, Cli};
use emrlink::config::{load_config_or_default, LoggingConfig};
use emrlink::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging settings come from the config file when it loads; commands
    // report config errors themselves
    let (file_level, logging_config) = match load_config_or_default(&cli.config) {
        Ok(config) => (Some(config.application.log_level), config.logging),
        Err(_) => (None, LoggingConfig::default()),
    };
    let log_level = cli
        .log_level
        .clone()
        .or(file_level)
        .unwrap_or_else(|| "info".to_string());
    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(exit::FATAL);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "EmrLink starting");

    let exit_code = match cli.execute().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            exit::FATAL
        }
    };

    // process::exit skips destructors
    drop(guard);
    process::exit(exit_code);
}
