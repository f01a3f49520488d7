//! Configuration round-trips through TOML and the loader

use fleet_backup::config::load_config;
use std::fs;
use test_utils::{config_with_webhook_toml, minimal_config_toml, ConfigBuilder, TestContext};

#[test]
fn test_builder_config_round_trips_through_toml() {
    let (config, temp_dir) = ConfigBuilder::new().with_retention_days(7).persist();

    let config_path = temp_dir.path().join("config.toml");
    let toml_str = toml::to_string_pretty(&config).unwrap();
    fs::write(&config_path, toml_str).unwrap();

    let loaded = load_config(&config_path).unwrap();
    assert_eq!(loaded.global.retention_days, 7);
    assert_eq!(loaded.global.api_base_url, config.global.api_base_url);
    assert_eq!(loaded.global.backup_dir, config.global.backup_dir);
}

#[test]
fn test_template_config_parses_with_defaults() {
    let ctx = TestContext::new();
    let toml = minimal_config_toml()
        .replace("{backup_dir}", &ctx.root().join("backups").display().to_string())
        .replace("{log_dir}", &ctx.root().join("logs").display().to_string());
    let config_path = ctx.create_file("config.toml", &toml);

    let config = load_config(&config_path).unwrap();
    assert_eq!(config.global.retention_days, 14);
    assert_eq!(config.global.action_timeout_seconds, 3600);
    assert!(!config.notifications.is_active());
}

#[test]
fn test_webhook_template_activates_notifications() {
    let ctx = TestContext::new();
    let toml = config_with_webhook_toml()
        .replace("{backup_dir}", &ctx.root().join("backups").display().to_string())
        .replace("{log_dir}", &ctx.root().join("logs").display().to_string());
    let config_path = ctx.create_file("config.toml", &toml);

    let config = load_config(&config_path).unwrap();
    assert!(config.notifications.is_active());
    assert_eq!(config.global.retention_days, 7);
}

#[test]
fn test_builder_webhook_gating() {
    let enabled = ConfigBuilder::new()
        .with_webhook("https://hooks.example.net/alerts")
        .build();
    assert!(enabled.notifications.is_active());

    let muted = ConfigBuilder::new()
        .with_webhook("https://hooks.example.net/alerts")
        .with_notifications_disabled()
        .build();
    assert!(!muted.notifications.is_active());
}
