//! Diagnostic events and sinks for the Plinth framework.
//!
//! Both core subsystems, the service registry and the hook pipelines,
//! report what they do through a small, fixed vocabulary of named events.
//! This crate owns that vocabulary and the seam it travels through:
//!
//! - [`Diagnostic`] - the unified event enum with verbatim event names
//! - [`EventSink`] - the transport seam a telemetry collaborator plugs into
//! - [`TracingSink`] - the default sink, forwarding to [`tracing`]
//! - [`CollectingSink`] - an in-memory sink for tests
//! - [`Telemetry`] - subscriber bootstrap for processes that want one
//!
//! Event names and their field sets are part of the observable contract and
//! must not change; downstream consumers match on them.

/// Unified diagnostic event enum.
pub mod event;

/// Event sink trait and built-in sinks.
pub mod sink;

/// Tracing subscriber bootstrap.
pub mod telemetry;

pub use event::{Diagnostic, Severity};
pub use sink::{CollectingSink, EventSink, TracingSink};
pub use telemetry::{Telemetry, TelemetryFormat};
