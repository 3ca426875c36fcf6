//! veoovibes Core - bridge between a veoovibes multi-room audio controller and
//! a home-automation host.
//!
//! The crate polls the controller's HTTP API, merges its differently shaped
//! responses into one snapshot per cycle, and exposes every room as a media
//! player entity with playback, volume and favorites control.
//!
//! # Architecture
//!
//! - [`vendor`]: Controller HTTP client (envelope checking, typed operations)
//! - [`services`]: State aggregation, favorites cache, refresh loop, command dispatch
//! - [`room_view`]: Pure per-room projection of a snapshot
//! - [`browse`]: Favorites browse tree
//! - [`entity`]: Host-facing room entities
//! - [`bootstrap`]: Connectivity check and composition root
//! - [`api`]: HTTP surface for hosts that talk JSON
//! - [`events`]: Refresh outcome events
//! - [`error`]: Centralized error types
//!
//! # Abstraction Traits
//!
//! - [`VeoovibesReads`] / [`VeoovibesControls`]: controller operations, mocked in tests
//! - [`EventEmitter`](events::EventEmitter): refresh outcome delivery

#![warn(clippy::all)]

pub mod api;
pub mod bootstrap;
pub mod browse;
pub mod entity;
pub mod error;
pub mod events;
pub mod protocol_constants;
pub mod room_view;
pub mod services;
pub mod state;
pub mod utils;
pub mod vendor;

// Re-export commonly used types at the crate root
pub use bootstrap::{
    setup, setup_with_client, validate_connection, BootstrappedServices, ConnectionInfo,
};
pub use browse::{BrowseMedia, MediaClass};
pub use entity::{DeviceInfo, Feature, RoomEntity};
pub use error::{ApiResult, ErrorCode, VeoovibesError, VeoovibesResult};
pub use events::{
    BroadcastEventBridge, EventEmitter, LoggingEventEmitter, NoopEventEmitter, RefreshEvent,
};
pub use room_view::{PlaybackState, RoomAttributes, RoomView};
pub use services::{RefreshCoordinator, RoomController, StateAggregator};
pub use state::{Config, Snapshot};
pub use utils::now_millis;

// Re-export controller client types
pub use vendor::{
    ApiError, VeoovibesClient, VeoovibesClientImpl, VeoovibesControls, VeoovibesReads,
};

// Re-export API types
pub use api::{create_router, start_server, AppState, ServerError};
