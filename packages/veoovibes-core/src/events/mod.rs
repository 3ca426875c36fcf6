//! Refresh events for host-side subscribers.
//!
//! This module provides:
//! - [`EventEmitter`] trait the refresh coordinator emits through
//! - [`BroadcastEventBridge`] fanning events out to `tokio` broadcast receivers
//! - [`RefreshEvent`], the outcome of one refresh cycle

mod bridge;
mod emitter;

pub use bridge::BroadcastEventBridge;
pub use emitter::{EventEmitter, LoggingEventEmitter, NoopEventEmitter};

use serde::Serialize;

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RefreshEvent {
    /// A new snapshot was published.
    Updated {
        /// Number of rooms in the new snapshot.
        #[serde(rename = "roomCount")]
        room_count: usize,
        /// Rooms whose status fetch failed and were degraded this cycle.
        #[serde(rename = "degradedRooms")]
        degraded_rooms: Vec<String>,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
    /// The cycle failed; the previous snapshot remains published.
    Failed {
        message: String,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
}

impl RefreshEvent {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}
