//! Structured logging initialization
//!
//! Logging is configured from `MASKR_*` environment variables and installed as
//! a `tracing-subscriber` registry with an [`EnvFilter`] and one fmt layer
//! (JSON for production, pretty-print for development). Output goes to stderr
//! so stdout stays free for command output.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `MASKR_LOG_LEVEL` | `info` | trace/debug/info/warn/error |
//! | `MASKR_LOG_FORMAT` | `json` | json/pretty |
//! | `MASKR_LOG_TARGET_FILTER` | unset | extra comma-separated filter directives |
//! | `MASKR_LOG_INCLUDE_LOCATION` | `false` | include file:line |
//!
//! `RUST_LOG`, when set, takes precedence over `MASKR_LOG_LEVEL`.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location (dev only)
    pub include_location: bool,
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("MASKR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::parse(
                &env::var("MASKR_LOG_FORMAT").unwrap_or_else(|_| "json".to_string()),
            ),
            target_filter: env::var("MASKR_LOG_TARGET_FILTER").ok(),
            include_location: env::var("MASKR_LOG_INCLUDE_LOCATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }

    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: true,
        }
    }

    pub fn default_prod() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Json,
            target_filter: None,
            include_location: false,
        }
    }

    /// Parsed level; unknown names fall back to `INFO`.
    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let mut env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        if let Some(target_filter) = &self.target_filter {
            for filter in target_filter.split(',') {
                let filter = filter.trim();
                if filter.is_empty() {
                    continue;
                }
                match filter.parse() {
                    Ok(directive) => env_filter = env_filter.add_directive(directive),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {}", filter),
                }
            }
        }
        env_filter
    }
}

/// Initialize logging from the environment, overriding the level.
///
/// ```no_run
/// maskrouter::otel::init_logging("warn").expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: &str) -> Result<()> {
    let mut config = LogConfig::from_env();
    config.log_level = log_level.to_string();
    init_logging_with_config(&config)
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_span_list(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}
