//! Logging setup built on the tracing ecosystem.
//!
//! # Environment Variables
//!
//! - `DUET_LOG`: Filter directive (like `RUST_LOG`), e.g., `duet_ui=debug`
//! - `DUET_LOG_FORMAT`: Output format for stderr: `pretty`, `json`, `compact`
//! - `DUET_LOG_DIR`: Directory for file logs (default `~/.duet/logs`)
//!
//! # Configuration
//!
//! ```toml
//! [logging]
//! level = "warn"
//! format = "pretty"
//!
//! [logging.file]
//! enabled = false
//! level = "debug"
//! ```
//!
//! The terminal UI owns stderr while it runs, so interactive sessions call
//! [`LoggingOptions::without_stderr`] and rely on the file sink.

use crate::Error;
use crate::config::LoggingConfig;
use std::env;
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format for stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Pretty, human-readable output with colors (default for TTY)
    #[default]
    Pretty,
    /// JSON output (one line per event)
    Json,
    /// Compact, single-line output
    Compact,
}

impl LogFormat {
    pub const VALUES: &[LogFormat] = &[LogFormat::Pretty, LogFormat::Json, LogFormat::Compact];

    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

/// Resolved logging options (config file + caller overrides).
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Default filter when no environment override is present.
    pub level: String,
    /// Output format for stderr.
    pub format: LogFormat,
    /// Write events to stderr.
    pub stderr: bool,
    /// Filter for the rolling file sink; `None` disables it.
    pub file_level: Option<String>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: LogFormat::default(), stderr: true, file_level: None }
    }
}

impl From<&LoggingConfig> for LoggingOptions {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            level: config.level.clone(),
            format: LogFormat::parse_str(&config.format).unwrap_or_default(),
            stderr: true,
            file_level: config.file.enabled.then(|| config.file.level.clone()),
        }
    }
}

impl LoggingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_file_level(mut self, level: impl Into<String>) -> Self {
        self.file_level = Some(level.into());
        self
    }

    /// Drop the stderr layer. File logging is enabled at `debug` when not already on.
    pub fn without_stderr(mut self) -> Self {
        self.stderr = false;
        if self.file_level.is_none() {
            self.file_level = Some("debug".to_string());
        }
        self
    }

    fn build_env_filter(level: &str) -> EnvFilter {
        let filter = env::var("DUET_LOG")
            .ok()
            .or_else(|| env::var("RUST_LOG").ok())
            .unwrap_or_else(|| level.to_string());

        EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new(level))
    }

    fn is_tty() -> bool {
        atty::is(atty::Stream::Stderr)
    }

    fn detect_format(&self) -> LogFormat {
        if let Ok(fmt_str) = env::var("DUET_LOG_FORMAT")
            && let Some(fmt) = LogFormat::parse_str(&fmt_str)
        {
            return fmt;
        }

        if self.format == LogFormat::Pretty && !Self::is_tty() { LogFormat::Compact } else { self.format }
    }

    fn log_dir() -> Result<PathBuf, Error> {
        if let Ok(custom_dir) = env::var("DUET_LOG_DIR") {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| Error::Config("Could not determine home directory".to_string()))?;

        Ok(PathBuf::from(home).join(".duet").join("logs"))
    }
}

/// Keeps the non-blocking file writer alive; dropping it flushes pending lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global tracing subscriber.
///
/// Sets up an environment-aware filter (`DUET_LOG` or `RUST_LOG`), an optional
/// stderr layer and an optional daily-rolling JSON file layer.
pub fn init_logging(options: LoggingOptions) -> Result<LoggingGuard, Error> {
    type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if options.stderr {
        let filter = LoggingOptions::build_env_filter(&options.level);
        let layer: BoxedLayer = match options.detect_format() {
            LogFormat::Pretty => fmt::layer().pretty().with_writer(io::stderr).with_ansi(true).with_filter(filter).boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(io::stderr).with_filter(filter).boxed(),
            LogFormat::Compact => fmt::layer().compact().with_writer(io::stderr).with_filter(filter).boxed(),
        };
        layers.push(layer);
    }

    let mut guard = None;
    if let Some(file_level) = &options.file_level {
        let log_dir = LoggingOptions::log_dir()?;
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| Error::Config(format!("Failed to create log directory: {}", e)))?;

        let file_appender = tracing_appender::rolling::daily(log_dir, "duet.log");
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        let filter = LoggingOptions::build_env_filter(file_level);
        layers.push(fmt::layer().json().with_writer(non_blocking).with_filter(filter).boxed());
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {}", e)))?;

    Ok(LoggingGuard { _file: guard })
}

/// Shorten message content for log lines.
pub fn redact(content: &str, max_chars: usize) -> String {
    let total = content.chars().count();
    if total <= max_chars {
        return content.to_string();
    }

    let mut truncated = content.chars().take(max_chars).collect::<String>();
    truncated.push_str(&format!("... ({} total chars)", total));
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileLoggingConfig;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!(LogFormat::parse_str("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse_str("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse_str("Compact"), Some(LogFormat::Compact));
        assert_eq!(LogFormat::parse_str("invalid"), None);
    }

    #[test]
    fn test_log_format_as_str_round_trips() {
        for format in LogFormat::VALUES {
            assert_eq!(LogFormat::parse_str(format.as_str()), Some(*format));
        }
    }

    #[test]
    fn test_logging_options_default() {
        let options = LoggingOptions::default();
        assert_eq!(options.level, "warn");
        assert_eq!(options.format, LogFormat::Pretty);
        assert!(options.stderr);
        assert!(options.file_level.is_none());
    }

    #[test]
    fn test_logging_options_from_config() {
        let config = LoggingConfig {
            level: "info".to_string(),
            format: "json".to_string(),
            file: FileLoggingConfig { enabled: true, level: "trace".to_string() },
        };

        let options = LoggingOptions::from(&config);
        assert_eq!(options.level, "info");
        assert_eq!(options.format, LogFormat::Json);
        assert_eq!(options.file_level.as_deref(), Some("trace"));
    }

    #[test]
    fn test_logging_options_unknown_format_falls_back() {
        let config = LoggingConfig { format: "fancy".to_string(), ..Default::default() };
        assert_eq!(LoggingOptions::from(&config).format, LogFormat::Pretty);
    }

    #[test]
    fn test_without_stderr_enables_file_sink() {
        let options = LoggingOptions::new().with_level("info").without_stderr();
        assert!(!options.stderr);
        assert_eq!(options.file_level.as_deref(), Some("debug"));

        let options = LoggingOptions::new().with_file_level("trace").without_stderr();
        assert_eq!(options.file_level.as_deref(), Some("trace"));
    }

    #[test]
    fn test_redact_short_content_untouched() {
        assert_eq!(redact("hello", 10), "hello");
    }

    #[test]
    fn test_redact_long_content() {
        let redacted = redact("abcdefghijklmnopqrstuvwxyz", 10);
        assert!(redacted.starts_with("abcdefghij..."));
        assert!(redacted.contains("26 total chars"));
    }

    #[test]
    fn test_redact_counts_chars_not_bytes() {
        let redacted = redact("héllo wörld", 5);
        assert!(redacted.starts_with("héllo..."));
    }
}
