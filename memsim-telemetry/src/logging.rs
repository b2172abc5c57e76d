//! ## memsim-telemetry::logging
//! **Structured logging with `tracing`**
//!
//! Diagnostics are written to stderr so the interactive transcript on stdout
//! stays clean. `RUST_LOG` takes precedence over the configured level.

use std::str::FromStr;

use tracing::info_span;
use tracing_subscriber::{fmt as subscriber_fmt, EnvFilter};

/// Output layout for the fmt subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. Fails if one is already installed.
    pub fn init(
        default_level: &str,
        format: LogFormat,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_level))?;

        let builder = subscriber_fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false);

        match format {
            LogFormat::Pretty => builder.pretty().try_init(),
            LogFormat::Compact => builder.compact().try_init(),
        }
    }

    /// Emits one `info` event inside a `session_event` span.
    pub fn log_event(event_type: &str, metadata: &[(&str, String)]) {
        let span = info_span!("session_event", event_type = event_type);
        let _guard = span.enter();

        tracing::info!(metadata = ?metadata, "Session event occurred");
    }
}
