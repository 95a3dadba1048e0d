//! End-to-end tests for the CLI commands against the built-in demo EMR

use clap::Parser;
use emrlink::cli::{exit, Cli};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Config file whose settings live inside `dir`
fn write_config(dir: &Path) -> PathBuf {
    let settings = dir.join("settings.json");
    let config = dir.join("emrlink.toml");
    std::fs::write(
        &config,
        format!(
            "[storage]\nsettings_path = '{}'\n\n[assistant]\nprovider = \"openai\"\n",
            settings.display()
        ),
    )
    .unwrap();
    config
}

async fn run(config: &Path, args: &[&str]) -> i32 {
    let config = config.display().to_string();
    let mut argv = vec!["emrlink", "--config", config.as_str()];
    argv.extend_from_slice(args);
    Cli::parse_from(argv).execute().await.unwrap()
}

#[tokio::test]
async fn test_status_and_reset_on_fresh_install() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    assert_eq!(run(&config, &["status"]).await, exit::OK);
    assert_eq!(run(&config, &["status", "--check"]).await, exit::OK);
    assert_eq!(run(&config, &["reset"]).await, exit::OK);
}

#[tokio::test]
async fn test_patient_lookup_exit_codes() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    assert_eq!(run(&config, &["patient", "PAT-001"]).await, exit::OK);
    assert_eq!(run(&config, &["patient", "PAT-001", "--json"]).await, exit::OK);
    assert_eq!(run(&config, &["patient", "PAT-404"]).await, exit::NOT_FOUND);
    assert_eq!(run(&config, &["patient", "  "]).await, exit::CONFIG_ERROR);
}

#[tokio::test]
async fn test_search_history_and_metrics() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    assert_eq!(run(&config, &["search", "--name", "María"]).await, exit::OK);
    assert_eq!(run(&config, &["search"]).await, exit::CONFIG_ERROR);
    assert_eq!(
        run(&config, &["history", "PAT-001", "--only", "allergies,medications"]).await,
        exit::OK
    );
    assert_eq!(
        run(&config, &["history", "PAT-001", "--from", "2025-01-01", "--to", "2024-01-01"]).await,
        exit::CONFIG_ERROR
    );
    assert_eq!(
        run(&config, &["metrics", "PAT-001", "--type", "weight,bloodPressure"]).await,
        exit::OK
    );
}

#[tokio::test]
async fn test_configure_rejects_bad_input_without_persisting() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    assert_eq!(run(&config, &["configure", "cerner"]).await, exit::CONFIG_ERROR);
    assert_eq!(
        run(&config, &["configure", "OSCAR", "--set", "baseUrl=https://oscar.example.com"]).await,
        exit::CONFIG_ERROR
    );
    assert_eq!(
        run(&config, &["configure", "EPIC", "--set", "timeoutSeconds=never"]).await,
        exit::CONFIG_ERROR
    );
    assert!(!dir.path().join("settings.json").exists());
}

#[tokio::test]
async fn test_configure_generic_persists() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    assert_eq!(run(&config, &["configure", "generic"]).await, exit::OK);

    let settings = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
    assert!(settings.contains("\"GENERIC\""));
}

#[tokio::test]
async fn test_invalid_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("emrlink.toml");
    std::fs::write(&config, "[http]\ntimeout_seconds = 0\n").unwrap();

    assert_eq!(run(&config, &["status"]).await, exit::CONFIG_ERROR);
}
