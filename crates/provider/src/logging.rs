//! Tracing setup for the provider binary.
//!
//! The plugin host reads the provider's stdout, so every layer writes to
//! stderr. The filter comes from `TF_LOG_PROVIDER_PINGONE`, then `RUST_LOG`,
//! then the configured level.

use std::io;
use std::sync::OnceLock;

pub use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Provider-specific filter variable, checked before `RUST_LOG`.
pub const FILTER_ENV: &str = "TF_LOG_PROVIDER_PINGONE";

/// Tracing output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TracingFormat {
    /// Pretty-printed human-readable format
    Pretty,
    /// Compact single-line format
    Compact,
    /// Structured JSON format
    Json,
}

impl std::str::FromStr for TracingFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown tracing format: {s}")),
        }
    }
}

/// Log level options for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Show all logs (trace level)
    Trace,
    /// Show debug and above
    Debug,
    /// Show info and above
    Info,
    /// Show warnings and above (default)
    Warn,
    /// Show errors only
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Output format
    pub format: TracingFormat,
    /// Level used when no filter variable is set
    pub level: Level,
    /// Explicit filter directive, overriding the environment
    pub filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            format: TracingFormat::Compact,
            level: Level::WARN,
            filter: None,
        }
    }
}

static CORRELATION_ID: OnceLock<Uuid> = OnceLock::new();

/// Correlation ID for this provider process.
pub fn correlation_id() -> Uuid {
    *CORRELATION_ID.get_or_init(Uuid::new_v4)
}

fn level_directive(level: Level) -> String {
    let level = match level {
        Level::TRACE => "trace",
        Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warn",
        Level::ERROR => "error",
    };
    format!(
        "terraform_provider_pingone={level},pingone_sdk={level},pingone_framework={level},pingone_verify={level}"
    )
}

/// The filter directive to use, in priority order.
fn filter_directive(config: &TracingConfig) -> String {
    config
        .filter
        .clone()
        .or_else(|| std::env::var(FILTER_ENV).ok().filter(|v| !v.trim().is_empty()))
        .or_else(|| std::env::var(EnvFilter::DEFAULT_ENV).ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| level_directive(config.level))
}

/// Installs the global subscriber.
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    let correlation_id = correlation_id();
    let directive = filter_directive(config);
    let env_filter = EnvFilter::try_new(&directive).map_err(|e| Error::Tracing {
        message: format!("invalid filter \"{directive}\": {e}"),
    })?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match config.format {
        TracingFormat::Pretty => {
            let layer = tracing_subscriber::fmt::layer()
                .pretty()
                .with_writer(io::stderr)
                .with_target(true);
            registry.with(layer).try_init()
        }
        TracingFormat::Compact => {
            let layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_target(false)
                .with_ansi(false);
            registry.with(layer).try_init()
        }
        TracingFormat::Json => {
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_current_span(true)
                .with_span_list(true);
            registry.with(layer).try_init()
        }
    };
    installed.map_err(|e| Error::Tracing { message: e.to_string() })?;

    tracing::info!(
        correlation_id = %correlation_id,
        version = env!("CARGO_PKG_VERSION"),
        format = ?config.format,
        "Tracing initialized for the PingOne provider"
    );

    Ok(())
}
