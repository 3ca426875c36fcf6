//! Event emitter abstraction for decoupling the refresh loop from transport.

use super::RefreshEvent;

/// Trait for emitting refresh events without knowledge of transport.
pub trait EventEmitter: Send + Sync {
    /// Emits the outcome of a refresh cycle.
    fn emit_refresh(&self, event: RefreshEvent);
}

/// No-op emitter for tests and hosts that only poll the snapshot.
pub struct NoopEventEmitter;

impl EventEmitter for NoopEventEmitter {
    fn emit_refresh(&self, _event: RefreshEvent) {}
}

/// Logging emitter for debugging and development.
pub struct LoggingEventEmitter;

impl EventEmitter for LoggingEventEmitter {
    fn emit_refresh(&self, event: RefreshEvent) {
        match &event {
            RefreshEvent::Updated { .. } => tracing::debug!(?event, "refresh_event"),
            RefreshEvent::Failed { .. } => tracing::warn!(?event, "refresh_event"),
        }
    }
}
