//! Integration tests for settings files and backups.
//!
//! Tests verify settings discovery, per-format parsing, relative storage
//! paths and export/import through real files.

use std::time::Duration;

use tempfile::TempDir;

use coach::backup;
use coach::error::AdminError;
use coach::model::AppConfig;
use coach::settings::{DocFormat, Settings};

use crate::common::env::with_config_home;
use crate::common::fixtures::TestFile;

// ===== Discovery Tests =====

#[test]
fn test_missing_default_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let _guard = with_config_home(dir.path().to_str().unwrap());

    assert_eq!(Settings::load(None).unwrap(), Settings::default());
}

#[test]
fn test_default_file_is_discovered() {
    let dir = TempDir::new().unwrap();
    let app_dir = dir.path().join("coach");
    std::fs::create_dir_all(&app_dir).unwrap();
    std::fs::write(
        app_dir.join("config.toml"),
        "[ingest]\nmax_width = 640\n",
    )
    .unwrap();
    let _guard = with_config_home(dir.path().to_str().unwrap());

    let settings = Settings::load(None).unwrap();
    assert_eq!(settings.ingest.max_width, 640);
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, AdminError::SettingsInvalid(msg) if msg.contains("not found")));
}

// ===== Format Tests =====

#[test]
fn test_yaml_settings() {
    let file = TestFile::new(
        "settings.yaml",
        "storage:\n  quota_bytes: 0\nonboarding:\n  step_interval_ms: 250\n",
    );
    let settings = Settings::load(Some(&file.path)).unwrap();
    assert_eq!(settings.quota(), None);
    assert_eq!(settings.step_interval(), Duration::from_millis(250));
}

#[test]
fn test_relative_storage_path_resolves_against_file() {
    let file = TestFile::new("settings.toml", "[storage]\npath = \"data/coach.db\"\n");
    let settings = Settings::load(Some(&file.path)).unwrap();

    let expected = file.dir.path().canonicalize().unwrap().join("data/coach.db");
    assert_eq!(settings.db_path().unwrap(), expected);
}

#[test]
fn test_invalid_values_are_rejected() {
    let file = TestFile::new("settings.toml", "[ingest]\njpeg_quality = 0\n");
    let err = Settings::load(Some(&file.path)).unwrap_err();
    assert!(matches!(err, AdminError::SettingsInvalid(_)));
}

#[test]
fn test_syntax_error_names_format() {
    let file = TestFile::new("settings.toml", "[ingest\nmax_width = 1");
    let err = Settings::load(Some(&file.path)).unwrap_err();
    assert!(matches!(err, AdminError::SettingsParse(msg) if msg.starts_with("TOML:")));
}

#[test]
fn test_unsupported_extension() {
    let file = TestFile::new("settings.ini", "max_width=1");
    assert!(Settings::load(Some(&file.path)).is_err());
    assert!(DocFormat::from_extension(&file.path).is_none());
}

// ===== Backup Tests =====

#[test]
fn test_yaml_backup_round_trip_keeps_details() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("profile.yaml");
    let mut config = AppConfig {
        professional_name: "Ana Souza".to_string(),
        is_onboarded: true,
        ..AppConfig::default()
    };
    config.services[1]
        .details
        .insert("highlights".to_string(), serde_json::json!(["Weekly check-in", "App access"]));

    assert_eq!(backup::export(&config, &path).unwrap(), DocFormat::Yaml);
    assert_eq!(backup::import(&path).unwrap(), config);
}

#[test]
fn test_import_rejects_duplicate_ids() {
    let file = TestFile::new(
        "dup.json",
        r#"{"services":[{"id":"a","title":"One"},{"id":"a","title":"Two"}]}"#,
    );
    let err = backup::import(&file.path).unwrap_err();
    assert!(matches!(err, AdminError::DuplicateServiceId { id } if id == "a"));
}
