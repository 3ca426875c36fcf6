//! Fixed protocol constants that should NOT be changed.
//!
//! These values are defined by the veoovibes controller's HTTP API (v1) and
//! by the integration's own contract with its host.

// ─────────────────────────────────────────────────────────────────────────────
// Vendor HTTP API
// ─────────────────────────────────────────────────────────────────────────────

/// Base path of every v1 endpoint (`http://<host>/api/v1/<endpoint>`).
pub const API_BASE_PATH: &str = "/api/v1";

/// Query parameter carrying the static API key on every request.
pub const API_KEY_PARAM: &str = "api_key";

/// Literal value of the envelope `status` field on success.
///
/// Any other value is a rejected call, even with HTTP 200.
pub const STATUS_SUCCEEDED: &str = "succeeded";

/// Timeout for every vendor HTTP request (seconds).
///
/// 10 seconds is reasonable for LAN operations.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Endpoint names, exactly as the controller expects them.
pub mod endpoints {
    pub const LIST_ROOMS: &str = "listrooms";
    pub const ROOM_PLAYER_STATUS: &str = "room_player_status";
    pub const GET_ROOM_FEEDBACK: &str = "get_room_feedback";
    pub const LIST_FAVORITES: &str = "listFavorites";
    pub const ROOM_PLAY: &str = "room_play";
    pub const ROOM_STOP: &str = "room_stop";
    pub const ROOM_NEXT: &str = "room_next";
    pub const ROOM_PREV: &str = "room_prev";
    pub const ROOM_VOL_SET: &str = "room_vol_set";
    pub const ROOM_VOL_UP: &str = "room_vol_up";
    pub const ROOM_VOL_DOWN: &str = "room_vol_down";
    pub const PLAY_FAVORITE: &str = "playfavorite";
}

// ─────────────────────────────────────────────────────────────────────────────
// Polling
// ─────────────────────────────────────────────────────────────────────────────

/// Default interval between refresh cycles (seconds).
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 5;

/// Smallest accepted refresh interval (seconds).
pub const MIN_SCAN_INTERVAL_SECS: u64 = 1;

/// Largest accepted refresh interval (seconds).
pub const MAX_SCAN_INTERVAL_SECS: u64 = 30;

/// Lifetime of the shared favorites cache (seconds).
///
/// Favorites change rarely; refetching them every tick is wasted load on the
/// controller.
pub const FAVORITES_TTL_SECS: u64 = 300;

// ─────────────────────────────────────────────────────────────────────────────
// Host Surface
// ─────────────────────────────────────────────────────────────────────────────

/// Integration domain, used in device identifiers and the setup unique id.
pub const DOMAIN: &str = "veoovibes";

/// Media content type addressing the favorites folder and its leaves.
pub const CTX_FAVORITE: &str = "favorite";

/// Media content type / id of the browse root.
pub const CTX_LIBRARY: &str = "library";

/// Content id of the favorites folder.
pub const FAVORITES_CONTENT_ID: &str = "favorites";

/// Manufacturer reported in device info.
pub const MANUFACTURER: &str = "inveoo GmbH";

/// Capacity of the refresh event broadcast channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;
