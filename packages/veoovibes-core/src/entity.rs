//! Host-facing media player entity for one room.
//!
//! An entity holds no state of its own besides its room id: every property is
//! read from the coordinator's latest snapshot, and every command goes through
//! the shared [`RoomController`].

use std::sync::Arc;

use serde::Serialize;

use crate::browse::{browse, BrowseMedia};
use crate::error::{VeoovibesError, VeoovibesResult};
use crate::protocol_constants::{DOMAIN, MANUFACTURER};
use crate::room_view::{RoomAttributes, RoomView};
use crate::services::{RefreshCoordinator, RoomController};

/// Device class reported for every room.
pub const DEVICE_CLASS_SPEAKER: &str = "speaker";

/// Capabilities a room entity supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Play,
    Stop,
    NextTrack,
    PreviousTrack,
    VolumeSet,
    VolumeStep,
    BrowseMedia,
    PlayMedia,
}

pub const SUPPORTED_FEATURES: &[Feature] = &[
    Feature::Play,
    Feature::Stop,
    Feature::NextTrack,
    Feature::PreviousTrack,
    Feature::VolumeSet,
    Feature::VolumeStep,
    Feature::BrowseMedia,
    Feature::PlayMedia,
];

/// Device registry information for a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// `(domain, "<host>-<room id>")`.
    pub identifiers: Vec<(String, String)>,
    pub manufacturer: String,
    pub model: String,
    pub name: String,
    pub configuration_url: String,
}

/// Formats the display name of a room.
pub fn display_name(room_name: &str) -> String {
    format!("{} – {}", DOMAIN, room_name)
}

/// Media player entity bound to one room.
#[derive(Clone)]
pub struct RoomEntity {
    room_id: String,
    host: String,
    coordinator: Arc<RefreshCoordinator>,
    controller: RoomController,
}

impl std::fmt::Debug for RoomEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomEntity")
            .field("room_id", &self.room_id)
            .field("host", &self.host)
            .finish()
    }
}

impl RoomEntity {
    pub fn new(
        room_id: impl Into<String>,
        host: impl Into<String>,
        coordinator: Arc<RefreshCoordinator>,
        controller: RoomController,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            host: host.into(),
            coordinator,
            controller,
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn unique_id(&self) -> String {
        format!("{}_room_{}", DOMAIN, self.room_id)
    }

    /// Room name from the latest snapshot, `Room <id>` once the room is gone.
    pub fn room_name(&self) -> String {
        self.coordinator
            .snapshot()
            .rooms
            .get(&self.room_id)
            .map(|room| room.name.clone())
            .unwrap_or_else(|| format!("Room {}", self.room_id))
    }

    pub fn name(&self) -> String {
        display_name(&self.room_name())
    }

    pub fn device_class(&self) -> &'static str {
        DEVICE_CLASS_SPEAKER
    }

    pub fn supported_features(&self) -> &'static [Feature] {
        SUPPORTED_FEATURES
    }

    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            identifiers: vec![(DOMAIN.to_string(), format!("{}-{}", self.host, self.room_id))],
            manufacturer: MANUFACTURER.to_string(),
            model: DOMAIN.to_string(),
            name: self.name(),
            configuration_url: format!("http://{}", self.host),
        }
    }

    /// Current properties, recomputed from the latest snapshot.
    pub fn attributes(&self) -> RoomAttributes {
        let snapshot = self.coordinator.snapshot();
        RoomView::new(&snapshot, &self.room_id).attributes()
    }

    /// Resolves a browse request against the cached favorites.
    pub fn browse_media(
        &self,
        media_content_type: Option<&str>,
        _media_content_id: Option<&str>,
    ) -> BrowseMedia {
        let snapshot = self.coordinator.snapshot();
        browse(&self.name(), &snapshot.favorites, media_content_type)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn media_play(&self) -> VeoovibesResult<()> {
        self.controller.play(&self.room_id).await
    }

    pub async fn media_stop(&self) -> VeoovibesResult<()> {
        self.controller.stop(&self.room_id).await
    }

    pub async fn media_next_track(&self) -> VeoovibesResult<()> {
        self.controller.next_track(&self.room_id).await
    }

    pub async fn media_previous_track(&self) -> VeoovibesResult<()> {
        self.controller.previous_track(&self.room_id).await
    }

    pub async fn volume_up(&self) -> VeoovibesResult<()> {
        self.controller.volume_up(&self.room_id).await
    }

    pub async fn volume_down(&self) -> VeoovibesResult<()> {
        self.controller.volume_down(&self.room_id).await
    }

    pub async fn set_volume_level(&self, level: f64) -> VeoovibesResult<()> {
        self.controller.set_volume_level(&self.room_id, level).await
    }

    pub async fn play_favorite(&self, fav_id: &str) -> VeoovibesResult<()> {
        self.controller.play_favorite(&self.room_id, fav_id).await
    }

    pub async fn play_media(
        &self,
        media_content_type: &str,
        media_content_id: &str,
    ) -> VeoovibesResult<()> {
        self.controller
            .play_media(&self.room_id, media_content_type, media_content_id)
            .await
    }
}

/// Builds one entity per room in the coordinator's latest snapshot.
pub fn room_entities(
    host: &str,
    coordinator: &Arc<RefreshCoordinator>,
    controller: &RoomController,
) -> Vec<RoomEntity> {
    coordinator
        .snapshot()
        .rooms
        .keys()
        .map(|room_id| RoomEntity::new(room_id, host, coordinator.clone(), controller.clone()))
        .collect()
}

/// Builds the entity for one room, failing if it is not in the latest snapshot.
pub fn room_entity(
    host: &str,
    coordinator: &Arc<RefreshCoordinator>,
    controller: &RoomController,
    room_id: &str,
) -> VeoovibesResult<RoomEntity> {
    if !coordinator.snapshot().has_room(room_id) {
        return Err(VeoovibesError::RoomNotFound(room_id.to_string()));
    }
    Ok(RoomEntity::new(room_id, host, coordinator.clone(), controller.clone()))
}
