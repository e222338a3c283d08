//! Cycle diagnostics.
//!
//! A detected cycle is not an error. The freezer substitutes the omitted marker and reports a
//! [`CycleEvent`] to whatever [`DiagnosticSink`] the caller supplied.

use deepfreeze_types::Path;
use serde::Serialize;

/// A composite value was reached a second time during one traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleEvent {
    /// Where the repeated reference was found (and replaced by the omitted marker).
    pub current: Path,
    /// Where the same object was first visited.
    pub original: Path,
}

/// Receiver for diagnostic events raised while freezing.
pub trait DiagnosticSink {
    fn cycle_detected(&mut self, event: CycleEvent);
}

/// Logs each event through `tracing` at `warn` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn cycle_detected(&mut self, event: CycleEvent) {
        tracing::warn!(
            current = %event.current,
            original = %event.original,
            "Circular reference replaced with omitted marker"
        );
    }
}

/// Keeps every event in memory, in detection order.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    events: Vec<CycleEvent>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[CycleEvent] {
        &self.events
    }

    #[must_use]
    pub fn into_events(self) -> Vec<CycleEvent> {
        self.events
    }
}

impl DiagnosticSink for CollectingSink {
    fn cycle_detected(&mut self, event: CycleEvent) {
        self.events.push(event);
    }
}

impl<F: FnMut(CycleEvent)> DiagnosticSink for F {
    fn cycle_detected(&mut self, event: CycleEvent) {
        self(event);
    }
}
