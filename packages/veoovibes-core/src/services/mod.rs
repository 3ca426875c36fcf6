//! Application services layer.
//!
//! Services orchestrate between the host-facing surface (`entity`, `api`) and
//! the controller client (`vendor`).

pub mod aggregator;
pub mod favorites_cache;
pub mod refresh_coordinator;
pub mod room_controller;

pub use aggregator::StateAggregator;
pub use favorites_cache::FavoritesCache;
pub use refresh_coordinator::RefreshCoordinator;
pub use room_controller::{volume_to_percent, RoomController};
