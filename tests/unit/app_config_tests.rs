/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use readlingo::app_config::{Config, LogLevel};
use tempfile::TempDir;

/// Test default configuration values
#[test]
fn test_default_config_should_have_correct_defaults() {
    let config = Config::default();

    assert_eq!(config.api.base_url, "http://localhost:5000");
    assert_eq!(config.api.timeout_secs, 120);
    assert_eq!(
        config.reading.categories,
        vec!["technology", "politics", "business", "science"]
    );
    assert_eq!(config.reading.default_category, "technology");
    assert_eq!(config.reading.word_counts, vec![200, 300, 500]);
    assert_eq!(config.reading.default_word_count, 300);
    assert_eq!(config.display.panel_width, 320);
    assert_eq!(config.display.collapsed_margin, 20);
    assert_eq!(config.display.default_article_title, "Generated Article");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_with_various_configs_should_validate_correctly() {
    let mut config = Config::default();

    config.api.base_url = "not a url".to_string();
    assert!(config.validate().is_err());
    config.api.base_url = "mailto:someone@example.com".to_string();
    assert!(config.validate().is_err());
    config.api.base_url = "https://reader.example.com/api".to_string();
    assert!(config.validate().is_ok());

    config.reading.default_category = "sports".to_string();
    assert!(config.validate().is_err());
    config.reading.categories.push("sports".to_string());
    assert!(config.validate().is_ok());

    config.reading.word_counts.push(0);
    assert!(config.validate().is_err());
    config.reading.word_counts.pop();

    config.display.panel_width = 10;
    assert!(config.validate().is_err());
    config.display.panel_width = 320;

    config.display.highlight_close = String::new();
    assert!(config.validate().is_err());
}

/// Test partial config files fall back to defaults
#[test]
fn test_from_file_with_partial_json_should_fill_defaults() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");
    std::fs::write(
        &path,
        r#"{"api": {"base_url": "http://10.0.0.2:8080"}, "log_level": "debug"}"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.api.base_url, "http://10.0.0.2:8080");
    assert_eq!(config.api.timeout_secs, 120);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.reading.default_word_count, 300);
    assert!(config.validate().is_ok());
    Ok(())
}

/// Test a missing config file is created with defaults
#[test]
fn test_load_or_create_with_missing_file_should_write_default() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");
    assert!(!path.exists());

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.api.base_url, created.api.base_url);
    assert_eq!(reloaded.reading.categories, created.reading.categories);
    Ok(())
}

/// Test unparseable config files are reported
#[test]
fn test_from_file_with_invalid_json_should_fail() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ not json")?;
    assert!(Config::from_file(&path).is_err());
    Ok(())
}

#[test]
fn test_is_known_category() {
    let config = Config::default();
    assert!(config.is_known_category("science"));
    assert!(!config.is_known_category("Science"));
}

#[test]
fn test_log_level_to_level_filter() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
