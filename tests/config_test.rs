use sentidash::config::{AppConfig, ConfigManager};
use sentidash::{Args, LogLevel};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn setup_test_config_dir() -> (TempDir, ConfigManager) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_manager = ConfigManager::with_dir(temp_dir.path().to_path_buf());
    (temp_dir, config_manager)
}

#[test]
fn test_default_config() {
    let config = AppConfig::default();

    assert_eq!(config.version, "0.1");
    assert_eq!(config.gateway.base_url, "http://127.0.0.1:5000");
    assert_eq!(config.gateway.timeout_ms, 10_000);
    assert_eq!(config.display.max_chart_ticks, 21);
    assert!(!config.display.show_debug_bar);
    assert_eq!(config.performance.event_poll_interval_ms, 25);
    assert_eq!(config.performance.auto_refresh_secs, 0);
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.file.is_none());
    assert!(!config.debug.enabled);
    assert!(config.validate().is_ok());
}

#[test]
fn test_generate_default_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let template = config_manager.generate_default_config();

    for section in [
        "[gateway]",
        "[display]",
        "[performance]",
        "[theme.colors]",
        "[logging]",
        "[debug]",
    ] {
        assert!(template.contains(section), "missing {section}");
    }
    assert!(template.contains("version = \"0.1\""));
}

#[test]
fn test_default_template_parses_to_defaults() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    let parsed: AppConfig = toml::from_str(&config_manager.generate_default_config())
        .expect("template should parse");
    let default = AppConfig::default();
    assert_eq!(parsed.gateway.base_url, default.gateway.base_url);
    assert_eq!(parsed.display.max_chart_ticks, default.display.max_chart_ticks);
    assert_eq!(parsed.theme.colors.chart_bar, default.theme.colors.chart_bar);
    assert!(parsed.validate().is_ok());
}

#[test]
fn test_write_default_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let config_path = config_manager
        .write_default_config(false)
        .expect("Failed to write config");

    assert!(config_path.exists());
    let content = fs::read_to_string(&config_path).expect("Failed to read config");
    assert!(content.contains("[gateway]"));
}

#[test]
fn test_write_default_config_requires_force() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    config_manager.write_default_config(false).unwrap();
    let err = config_manager.write_default_config(false).unwrap_err();
    assert!(err.to_string().contains("--force"));
    assert!(config_manager.write_default_config(true).is_ok());
}

#[test]
fn test_load_merges_user_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    config_manager.ensure_config_dir().unwrap();
    fs::write(
        config_manager.config_path("config.toml"),
        r#"
[gateway]
base_url = "http://dashboard.internal:8080"

[performance]
auto_refresh_secs = 1800

[theme.colors]
chart_bar = "magenta"
"#,
    )
    .unwrap();

    let config = AppConfig::load_from(&config_manager).expect("config should load");
    assert_eq!(config.gateway.base_url, "http://dashboard.internal:8080");
    assert_eq!(config.gateway.timeout_ms, 10_000);
    assert_eq!(config.performance.auto_refresh_secs, 1800);
    assert_eq!(config.theme.colors.chart_bar, "magenta");
    assert_eq!(config.theme.colors.primary, "cyan");
}

#[test]
fn test_load_without_user_config_uses_defaults() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    let config = AppConfig::load_from(&config_manager).unwrap();
    assert_eq!(config.gateway.base_url, AppConfig::default().gateway.base_url);
}

#[test]
fn test_load_rejects_malformed_file() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    config_manager.ensure_config_dir().unwrap();
    fs::write(config_manager.config_path("config.toml"), "[gateway\n").unwrap();
    let err = AppConfig::load_from(&config_manager).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut config = AppConfig::default();
    config.gateway.base_url = "localhost:5000".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.gateway.timeout_ms = 0;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.display.max_chart_ticks = 1;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.logging.level = "loud".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.theme.colors.chart_bar = "not-a-color".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("chart_bar"));
}

#[test]
fn test_cli_args_override_config() {
    let mut config = AppConfig::default();
    config.gateway.base_url = "http://from-file:5000".to_string();

    let args = Args {
        url: Some("http://from-cli:5000".to_string()),
        timeout_ms: Some(2500),
        auto_refresh_secs: Some(60),
        debug: true,
        log_level: Some(LogLevel::Debug),
        log_file: Some(PathBuf::from("/tmp/sentidash-test.log")),
        ..Args::default()
    };
    config.apply_args(&args);

    assert_eq!(config.gateway.base_url, "http://from-cli:5000");
    assert_eq!(config.gateway.timeout_ms, 2500);
    assert_eq!(config.performance.auto_refresh_secs, 60);
    assert!(config.debug.enabled);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(
        config.logging.file,
        Some(PathBuf::from("/tmp/sentidash-test.log"))
    );
}

#[test]
fn test_unset_cli_args_keep_config() {
    let mut config = AppConfig::default();
    config.performance.auto_refresh_secs = 1800;
    config.apply_args(&Args::default());
    assert_eq!(config.performance.auto_refresh_secs, 1800);
    assert_eq!(config.gateway.base_url, "http://127.0.0.1:5000");
}
