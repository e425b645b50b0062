//! Tracing subscriber bootstrap.
//!
//! Processes that want the default [`TracingSink`](crate::TracingSink)
//! output somewhere need a subscriber installed. [`Telemetry`] is a small
//! builder for the common shapes: pretty for development, compact or JSON
//! for production log aggregation.
//!
//! Initialization is idempotent: if a subscriber is already installed,
//! [`Telemetry::init`] leaves it in place.
//!
//! # Example
//!
//! ```
//! use plinth_events::{Telemetry, TelemetryFormat};
//! use tracing::Level;
//!
//! Telemetry::default()
//!     .with_level(Level::DEBUG)
//!     .with_format(TelemetryFormat::Compact)
//!     .init();
//! ```

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ─────────────────────────────────────────────────────────────────────────────
// TelemetryFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Output format for the installed subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TelemetryFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

// ─────────────────────────────────────────────────────────────────────────────
// Telemetry
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for the tracing subscriber stack.
#[derive(Debug, Clone)]
pub struct Telemetry {
    /// Maximum log level.
    level: Level,
    /// Output format.
    format: TelemetryFormat,
    /// Environment filter (e.g., "plinth=debug,hyper=warn").
    env_filter: Option<String>,
    /// Whether to include span enter/exit events.
    span_events: bool,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TelemetryFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl Telemetry {
    /// Creates a new `Telemetry` builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TelemetryFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a custom environment filter string.
    ///
    /// Format: `target=level,target=level,...`
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Installs the subscriber.
    ///
    /// A no-op if a global subscriber is already installed.
    pub fn init(self) {
        let env_filter = match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
            }
            None => EnvFilter::new(self.level.as_str()),
        };

        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        match self.format {
            TelemetryFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
            TelemetryFormat::Compact => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
            TelemetryFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
        }
    }
}
