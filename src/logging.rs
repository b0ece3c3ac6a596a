//! File-backed `tracing` subscriber. The terminal belongs to the UI, so log
//! output never goes to stdout or stderr while the dashboard runs.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::APP_NAME;

/// Resolve the log file: configured path, or `<cache dir>/sentidash/sentidash.log`.
pub fn log_path(config: &LoggingConfig) -> Result<PathBuf> {
    if let Some(path) = &config.file {
        return Ok(path.clone());
    }
    let cache_dir = dirs::cache_dir().ok_or_else(|| eyre!("Could not determine cache directory"))?;
    Ok(cache_dir.join(APP_NAME).join(format!("{}.log", APP_NAME)))
}

/// Filter directive for this crate. `RUST_LOG` wins when set.
pub fn env_filter(level: &str) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::builder().from_env_lossy()
    } else {
        EnvFilter::builder().parse_lossy(format!("{}={}", APP_NAME, level))
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| eyre!("Failed to open log file {}: {}", path.display(), e))
}

/// Install the global subscriber. Returns the log file path on success.
pub fn init(config: &LoggingConfig) -> Result<PathBuf> {
    let path = log_path(config)?;
    let file = open_log_file(&path)?;

    tracing_subscriber::fmt::fmt()
        .with_target(false)
        .with_ansi(false)
        .with_thread_names(true)
        .with_env_filter(env_filter(&config.level))
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(
            "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        ))
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| eyre!("Failed to install log subscriber: {}", e))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_configured_log_path_wins() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            file: Some(PathBuf::from("/tmp/custom.log")),
        };
        assert_eq!(log_path(&config).unwrap(), PathBuf::from("/tmp/custom.log"));
    }

    #[test]
    fn test_default_log_path_is_under_app_dir() {
        let Ok(path) = log_path(&LoggingConfig::default()) else {
            return;
        };
        assert!(path.ends_with("sentidash/sentidash.log"));
    }

    #[test]
    fn test_open_log_file_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("app.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }
}
