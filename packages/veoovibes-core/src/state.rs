//! Core configuration and the published snapshot.
//!
//! A [`Snapshot`] is assembled by one refresh cycle and published whole through
//! [`SnapshotStore`]; readers hold an `Arc` and never see a mix of two cycles.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::protocol_constants::{
    DEFAULT_SCAN_INTERVAL_SECS, MAX_SCAN_INTERVAL_SECS, MIN_SCAN_INTERVAL_SECS,
};
use crate::vendor::types::{Favorites, Feedback, PlayerStatus, Room};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Connection settings for one controller.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Controller host name or IP, optionally with `:port`.
    pub host: String,
    /// Static API key sent with every request.
    pub api_key: String,
    /// Interval between refresh cycles (seconds).
    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,
}

fn default_scan_interval() -> u64 {
    DEFAULT_SCAN_INTERVAL_SECS
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("api_key", &"<redacted>")
            .field("scan_interval_secs", &self.scan_interval_secs)
            .finish()
    }
}

impl Config {
    /// Creates a config with the default scan interval.
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
            scan_interval_secs: DEFAULT_SCAN_INTERVAL_SECS,
        }
    }

    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("host must not be empty".to_string());
        }
        if self.api_key.trim().is_empty() {
            return Err("api_key must not be empty".to_string());
        }
        if !(MIN_SCAN_INTERVAL_SECS..=MAX_SCAN_INTERVAL_SECS).contains(&self.scan_interval_secs) {
            return Err(format!(
                "scan_interval_secs must be within {}..={} (got {})",
                MIN_SCAN_INTERVAL_SECS, MAX_SCAN_INTERVAL_SECS, self.scan_interval_secs
            ));
        }
        Ok(())
    }

    /// Returns the scan interval as a `Duration`.
    pub fn scan_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.scan_interval_secs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Snapshot
// ─────────────────────────────────────────────────────────────────────────────

/// Everything known about the controller as of one refresh cycle.
///
/// Every listed room has a `room_status` entry; rooms whose status fetch
/// failed carry an empty [`PlayerStatus`].
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub rooms: BTreeMap<String, Room>,
    pub room_status: BTreeMap<String, PlayerStatus>,
    pub feedback: Feedback,
    pub favorites: Arc<Favorites>,
    /// Rooms whose status fetch failed this cycle.
    pub degraded_rooms: BTreeSet<String>,
    /// Unix millis when the cycle completed.
    pub fetched_at_ms: u64,
}

impl Snapshot {
    /// Returns the room's status, or `None` if the room is not listed.
    pub fn status(&self, room_id: &str) -> Option<&PlayerStatus> {
        self.room_status.get(room_id)
    }

    pub fn has_room(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }
}

/// Holder of the latest published snapshot.
///
/// Writers swap the `Arc` in one step; readers clone it and release the lock.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotStore {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Returns the latest snapshot.
    #[must_use]
    pub fn load(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    /// Replaces the latest snapshot.
    pub fn publish(&self, snapshot: Snapshot) {
        *self.current.write() = Arc::new(snapshot);
    }
}
