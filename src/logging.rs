//! Structured logging on stderr.
//!
//! stdout carries the payment report, so every log line, pretty or JSON, goes
//! to stderr. `RUST_LOG` takes precedence over `--log-level` when it parses;
//! a malformed `--log-level` is a startup error.

use crate::error::{GatewayError, Result};
use clap::ValueEnum;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines without colors.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Picks the filter directives: `rust_log` when it is set and valid,
/// otherwise `default_level`.
pub fn build_filter(default_level: &str, rust_log: Option<&str>) -> Result<EnvFilter> {
    if let Some(filter) = rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
    {
        return Ok(filter);
    }

    EnvFilter::try_new(default_level).map_err(|e| {
        GatewayError::LoggingError(format!("invalid log level {default_level:?}: {e}"))
    })
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(default_level: &str, format: LogFormat) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(default_level, rust_log.as_deref())?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_ansi(false),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init(),
    };
    installed.map_err(|e| GatewayError::LoggingError(e.to_string()))?;

    tracing::debug!(?format, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_without_rust_log() {
        let filter = build_filter("warn", None).unwrap();
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn test_rust_log_overrides_default() {
        let filter = build_filter("info", Some("paygate=debug")).unwrap();
        assert!(filter.to_string().contains("paygate=debug"));
    }

    #[test]
    fn test_unusable_rust_log_falls_back() {
        for rust_log in ["paygate=loud", "   "] {
            let filter = build_filter("info", Some(rust_log)).unwrap();
            assert_eq!(filter.to_string(), "info");
        }
    }

    #[test]
    fn test_bad_default_level_is_an_error() {
        let err = build_filter("paygate=loud", None).unwrap_err();
        assert!(matches!(err, GatewayError::LoggingError(_)));
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_second_init_fails_instead_of_panicking() {
        let _ = init_logging("warn", LogFormat::Json);
        assert!(init_logging("warn", LogFormat::Pretty).is_err());
    }
}
