//! # Structured Logging
//!
//! Installs the `tracing` subscriber for hosts that embed the core and do not
//! bring their own. Format is JSON or pretty-printed; filtering comes from
//! `RUST_LOG` with a caller-supplied fallback.
//!
//! Output goes to stderr so that stdout stays free for whatever the host
//! pipes through it.
//!
//! The core itself only emits events (`debug!` for digests and sizes, `info!`
//! for broadcast outcomes, `warn!` for fallbacks). It never installs a
//! subscriber on its own.

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output for local development.
    #[default]
    Pretty,
    /// JSON lines for log aggregation.
    Json,
}

impl LogFormat {
    /// Parse a format string. Accepts "json" or "pretty" (case-insensitive).
    /// Anything else falls back to `Pretty`.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Failure to install the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The default directive string did not parse.
    #[error("invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    /// A global subscriber is already installed (the host got there first).
    #[error("tracing subscriber already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Build the filter: `RUST_LOG` wins, otherwise `default_level`.
fn build_filter(default_level: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level).map_err(|e| LoggingError::InvalidFilter {
            directive: default_level.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Initialize the global tracing subscriber.
///
/// Unlike a binary's `main`, a library cannot assume it is first. A second
/// call returns [`LoggingError::AlreadyInitialized`] instead of panicking,
/// and callers are free to ignore it.
///
/// ```text
/// RUST_LOG=txkit_core=debug
/// ```
pub fn init_logging(default_level: &str, format: LogFormat) -> Result<(), LoggingError> {
    let env_filter = build_filter(default_level)?;

    let result = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init(),
    };

    result.map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(?format, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing_is_lossy() {
        assert_eq!(LogFormat::from_str_lossy("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_lossy(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::from_str_lossy("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str_lossy("yaml"), LogFormat::Pretty);
    }

    #[test]
    fn second_init_is_an_error_not_a_panic() {
        let _ = init_logging("warn", LogFormat::Pretty);
        let second = init_logging("warn", LogFormat::Json);
        assert!(matches!(second, Err(LoggingError::AlreadyInitialized(_))));
    }
}
