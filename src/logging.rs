//! Structured logging initialisation.
//!
//! JSON output for production, pretty output for development. Configuration
//! comes from environment variables:
//!
//! - `ISOVIEW_LOG_LEVEL` - trace/debug/info/warn/error (default `info`)
//! - `ISOVIEW_LOG_FORMAT` - `json` or `pretty` (default `json`)
//! - `ISOVIEW_LOG_ASYNC` - buffer output on a background writer (default `true`)
//! - `ISOVIEW_LOG_TARGET_FILTER` - extra comma-separated filter directives
//! - `ISOVIEW_LOG_INCLUDE_LOCATION` - include file:line (default `false`)
//!
//! `RUST_LOG` takes precedence over the level when set.

use anyhow::{Context, Result};
use std::env;
use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Write through a non-blocking background writer
    pub async_logging: bool,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location (dev only)
    pub include_location: bool,
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("ISOVIEW_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(
                &env::var("ISOVIEW_LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
            ),
            async_logging: env::var("ISOVIEW_LOG_ASYNC")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            target_filter: env::var("ISOVIEW_LOG_TARGET_FILTER").ok(),
            include_location: env::var("ISOVIEW_LOG_INCLUDE_LOCATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }

    #[must_use]
    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            async_logging: false,
            target_filter: None,
            include_location: true,
        }
    }

    #[must_use]
    pub fn default_prod() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Json,
            async_logging: true,
            target_filter: None,
            include_location: false,
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        // Connection-level noise from the transport.
        if let Ok(directive) = "may_minihttp=warn".parse() {
            filter = filter.add_directive(directive);
        }

        if let Some(target_filter) = &self.target_filter {
            for directive in target_filter.split(',').map(str::trim) {
                if directive.is_empty() {
                    continue;
                }
                match directive.parse() {
                    Ok(directive) => filter = filter.add_directive(directive),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {}", directive),
                }
            }
        }
        filter
    }
}

/// Initialize logging from `ISOVIEW_LOG_*` with `log_level` overriding the level.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_logging(log_level: &str) -> Result<()> {
    let mut config = LogConfig::from_env();
    config.log_level = log_level.to_string();
    init_logging_with_config(&config)
}

/// Install the global subscriber described by `config`.
///
/// With `async_logging` output goes through a background writer whose guard
/// lives for the rest of the process; otherwise every event is written to
/// stdout before the logging call returns.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    if config.async_logging {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());
        registry
            .with(fmt_layer(config, non_blocking))
            .try_init()
            .context("Failed to initialize async logging")?;

        // Leaked so buffered lines are flushed for the application lifetime.
        std::mem::forget(guard);
    } else {
        registry
            .with(fmt_layer(config, std::io::stdout))
            .try_init()
            .context("Failed to initialize sync logging")?;
    }
    Ok(())
}

/// JSON or pretty formatting layer writing to `writer`.
fn fmt_layer<S, W>(config: &LogConfig, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_span_list(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    #[test]
    fn test_sync_layer_writes_before_returning() {
        let mut config = LogConfig::default_prod();
        config.async_logging = false;
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber =
            tracing_subscriber::registry().with(fmt_layer(&config, move || sink.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(widget = 7, "widget loaded");
        });

        let out = captured.text();
        assert!(out.contains("widget loaded"));
        assert!(out.contains("\"widget\":7"));
    }

    #[test]
    fn test_pretty_layer_uses_writer() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::registry()
            .with(fmt_layer(&LogConfig::default_dev(), move || sink.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("gear slipped");
        });

        assert!(captured.text().contains("gear slipped"));
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("PRETTY"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("invalid"), LogFormat::Json);
    }

    #[test]
    fn test_defaults() {
        let dev = LogConfig::default_dev();
        assert_eq!(dev.format, LogFormat::Pretty);
        assert!(!dev.async_logging);
        assert_eq!(dev.level(), Level::DEBUG);

        let prod = LogConfig::default_prod();
        assert_eq!(prod.format, LogFormat::Json);
        assert!(prod.async_logging);
        assert_eq!(prod.level(), Level::INFO);
    }

    #[test]
    fn test_unknown_level_is_info() {
        let mut config = LogConfig::default_dev();
        config.log_level = "chatty".to_string();
        assert_eq!(config.level(), Level::INFO);
    }
}
