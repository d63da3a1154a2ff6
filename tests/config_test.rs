//! Tests for the shipped configuration file

use restock::config::Config;
use restock::models::DuplicatePolicy;
use serial_test::serial;
use std::path::Path;

#[test]
fn test_config_file_exists() {
    assert!(
        Path::new("config.toml").exists(),
        "config.toml should exist in project root"
    );
}

#[test]
#[serial]
fn test_config_file_loads_and_validates() {
    let config = Config::from_file(Path::new("config.toml")).expect("config.toml should parse");
    assert!(config.validate().is_ok());

    assert_eq!(config.server.port, 10000);
    assert_eq!(config.reports.duplicate_policy, DuplicatePolicy::Merge);
    assert_eq!(config.reports.poll_interval_ms, 3000);
    assert_eq!(config.i18n.lang, "zh-TW");
}

#[test]
#[serial]
fn test_port_env_overrides_config_file() {
    std::env::set_var("PORT", "8123");
    let result = Config::from_file(Path::new("config.toml"));
    std::env::remove_var("PORT");

    let config = result.expect("config.toml should parse");
    assert_eq!(config.server.port, 8123);
    assert_eq!(config.i18n.lang, "zh-TW");
}
