//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! The terminal belongs to the UI, so events are appended to a log file
//! instead of stderr. `RUST_LOG` overrides the configured level.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging settings resolved from config and command line.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `flashcard_deck=debug`.
    pub level: String,
    pub file: PathBuf,
}

impl LogConfig {
    pub fn new(level: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            level: level.into(),
            file: file.into(),
        }
    }
}

/// `RUST_LOG` wins, then `level`, then plain `info`. Invalid directives fall through.
fn build_env_filter(rust_log: Option<&str>, level: &str) -> EnvFilter {
    rust_log
        .ok_or(())
        .and_then(|directives| EnvFilter::try_new(directives).map_err(|_| ()))
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn build_subscriber(
    config: &LogConfig,
    rust_log: Option<&str>,
) -> io::Result<impl Subscriber + Send + Sync + 'static> {
    let file = open_log_file(&config.file)?;
    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    Ok(tracing_subscriber::registry()
        .with(build_env_filter(rust_log, &config.level))
        .with(layer))
}

/// Install the global subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    build_subscriber(config, rust_log.as_deref())?
        .try_init()
        .map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_log_file_creates_parent() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs/nested/app.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_filter_precedence() {
        assert_eq!(build_env_filter(Some("warn"), "debug").to_string(), "warn");
        assert_eq!(build_env_filter(None, "debug").to_string(), "debug");
        assert_eq!(build_env_filter(Some("trace=bogus"), "debug").to_string(), "debug");
    }

    #[test]
    fn test_invalid_level_falls_back_to_info() {
        let filter = build_env_filter(None, "flashcard_deck=loud");
        assert_eq!(filter.to_string(), "info");
    }

    #[test]
    fn test_events_written_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let config = LogConfig::new("info", &path);

        let subscriber = build_subscriber(&config, None).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(cards = 3, "loaded deck");
            tracing::debug!("below the configured level");
        });

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("loaded deck"));
        assert!(written.contains("cards=3"));
        assert!(!written.contains("below the configured level"));
    }
}
