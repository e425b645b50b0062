//! Event sinks: where diagnostics go.
//!
//! The registry and hook pipelines emit through an [`EventSink`] trait
//! object, so the transport is a seam rather than a hard dependency. The
//! default is [`TracingSink`]; tests usually swap in a [`CollectingSink`]
//! and assert on the captured events.

use parking_lot::Mutex;

use crate::event::{Diagnostic, Severity};

// ─────────────────────────────────────────────────────────────────────────────
// EventSink
// ─────────────────────────────────────────────────────────────────────────────

/// Receiver for diagnostic events.
///
/// Implementations must be cheap and non-blocking; emitters call
/// [`emit`](Self::emit) synchronously on the request path.
pub trait EventSink: Send + Sync {
    /// Delivers one event to the sink.
    fn emit(&self, event: &Diagnostic);
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingSink
// ─────────────────────────────────────────────────────────────────────────────

/// The default sink: forwards each event to [`tracing`] at the event's
/// severity, with the event name as a structured field.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &Diagnostic) {
        match event.severity() {
            Severity::Debug => tracing::debug!(event = event.name(), "{}", event),
            Severity::Info => tracing::info!(event = event.name(), "{}", event),
            Severity::Warn => tracing::warn!(event = event.name(), "{}", event),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CollectingSink
// ─────────────────────────────────────────────────────────────────────────────

/// An in-memory sink that records every event it receives, in order.
///
/// Intended for tests asserting on the diagnostic contract.
///
/// # Example
///
/// ```
/// use plinth_events::{CollectingSink, Diagnostic, EventSink};
///
/// let sink = CollectingSink::new();
/// sink.emit(&Diagnostic::Registration { contract: "Mailer" });
///
/// assert_eq!(sink.names(), vec!["registration"]);
/// ```
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Creates a new empty collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded events, in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.lock().clone()
    }

    /// Returns the names of all recorded events, in emission order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(Diagnostic::name).collect()
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if no events were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Discards all recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: &Diagnostic) {
        self.events.lock().push(event.clone());
    }
}
