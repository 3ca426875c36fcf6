//! Command dispatch for room entities.
//!
//! Each command maps onto exactly one controller call. On success the refresh
//! loop is woken so the next snapshot reflects the change; the command does not
//! wait for that refresh.

use std::sync::Arc;

use tokio::sync::Notify;

use crate::error::{VeoovibesError, VeoovibesResult};
use crate::protocol_constants::CTX_FAVORITE;
use crate::vendor::traits::VeoovibesControls;

/// Converts a 0.0-1.0 volume fraction to the controller's 0-100 scale.
///
/// Rounds half up, then clamps.
pub fn volume_to_percent(level: f64) -> VeoovibesResult<u8> {
    if !level.is_finite() {
        return Err(VeoovibesError::InvalidRequest(format!(
            "volume_level must be a finite number (got {})",
            level
        )));
    }
    Ok((level * 100.0).round().clamp(0.0, 100.0) as u8)
}

/// Dispatches user commands to the controller.
#[derive(Clone)]
pub struct RoomController {
    client: Arc<dyn VeoovibesControls>,
    refresh_notify: Arc<Notify>,
}

impl RoomController {
    pub fn new(client: Arc<dyn VeoovibesControls>, refresh_notify: Arc<Notify>) -> Self {
        Self {
            client,
            refresh_notify,
        }
    }

    fn request_refresh(&self) {
        self.refresh_notify.notify_one();
    }

    pub async fn play(&self, room_id: &str) -> VeoovibesResult<()> {
        self.client.room_play(room_id).await?;
        self.request_refresh();
        Ok(())
    }

    pub async fn stop(&self, room_id: &str) -> VeoovibesResult<()> {
        self.client.room_stop(room_id).await?;
        self.request_refresh();
        Ok(())
    }

    pub async fn next_track(&self, room_id: &str) -> VeoovibesResult<()> {
        self.client.room_next(room_id).await?;
        self.request_refresh();
        Ok(())
    }

    pub async fn previous_track(&self, room_id: &str) -> VeoovibesResult<()> {
        self.client.room_prev(room_id).await?;
        self.request_refresh();
        Ok(())
    }

    pub async fn volume_up(&self, room_id: &str) -> VeoovibesResult<()> {
        self.client.room_vol_up(room_id).await?;
        self.request_refresh();
        Ok(())
    }

    pub async fn volume_down(&self, room_id: &str) -> VeoovibesResult<()> {
        self.client.room_vol_down(room_id).await?;
        self.request_refresh();
        Ok(())
    }

    /// Sets the absolute volume from a 0.0-1.0 fraction.
    pub async fn set_volume_level(&self, room_id: &str, level: f64) -> VeoovibesResult<()> {
        let percent = volume_to_percent(level)?;
        self.client.room_vol_set(room_id, percent).await?;
        self.request_refresh();
        Ok(())
    }

    pub async fn play_favorite(&self, room_id: &str, fav_id: &str) -> VeoovibesResult<()> {
        if fav_id.trim().is_empty() {
            return Err(VeoovibesError::InvalidRequest("fav_id must not be empty".into()));
        }
        self.client.play_favorite(room_id, fav_id).await?;
        self.request_refresh();
        Ok(())
    }

    /// Plays a browsed item. Only favorites are playable; anything else is
    /// ignored without error.
    pub async fn play_media(
        &self,
        room_id: &str,
        media_content_type: &str,
        media_content_id: &str,
    ) -> VeoovibesResult<()> {
        if media_content_type != CTX_FAVORITE {
            log::debug!(
                "[Commands] Ignoring play_media of type '{}' for room {}",
                media_content_type,
                room_id
            );
            return Ok(());
        }
        self.play_favorite(room_id, media_content_id).await
    }
}
