//! Tracing setup for callers that embed the conversion pipeline
//!
//! The library itself only emits events. Binaries driving batch conversions
//! call [`init_tracing`] once, usually with [`TracingLevel::from_env`].

use std::str::FromStr;

use error_stack::Report;
use tracing::Level;
use tracing_subscriber::Registry;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::constants::LOGLEVEL_ENV;
use crate::error::{Error, Result};

/// Tracing levels accepted from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TracingLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational events and above
    #[default]
    Info,
    /// Debug events and above
    Debug,
    /// Everything
    Trace,
}

impl FromStr for TracingLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(format!(
                "Invalid tracing level '{s}'. Valid levels are: error, warn, info, debug, trace"
            )),
        }
    }
}

impl From<TracingLevel> for Level {
    fn from(level: TracingLevel) -> Self {
        match level {
            TracingLevel::Error => Self::ERROR,
            TracingLevel::Warn => Self::WARN,
            TracingLevel::Info => Self::INFO,
            TracingLevel::Debug => Self::DEBUG,
            TracingLevel::Trace => Self::TRACE,
        }
    }
}

impl TracingLevel {
    /// Read the level from the `LOGLEVEL` environment variable, defaulting to info
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(LOGLEVEL_ENV).ok().as_deref())
    }

    /// Resolve a raw `LOGLEVEL` value; unset or unrecognized values fall back to info
    #[must_use]
    pub fn from_env_value(value: Option<&str>) -> Self {
        value
            .and_then(|raw| Self::from_str(raw).ok())
            .unwrap_or_default()
    }
}

/// Install a global subscriber writing to stderr at `level`
///
/// # Errors
///
/// Returns [`Error::Logging`] if a global subscriber is already installed.
pub fn init_tracing(level: TracingLevel) -> Result<()> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    Registry::default()
        .with(LevelFilter::from_level(level.into()))
        .with(stderr_layer)
        .try_init()
        .map_err(|e| {
            Report::new(Error::failed_to("install tracing subscriber", e))
                .attach(format!("Requested level: {level:?}"))
        })
}
