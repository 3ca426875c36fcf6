//! Per-room projection of a snapshot.
//!
//! A [`RoomView`] is pure: every property is recomputed from the snapshot it
//! borrows, so a room's view always reflects exactly one refresh cycle.
//!
//! Precedence, first match wins:
//! - state: status playing (code or flag), status paused, feedback text present,
//!   status stopped, otherwise idle
//! - title: feedback `roomtext`, status `title`, feedback `roomtitle`
//! - artist / album: status, then feedback
//! - volume: status `current_volume` when present, else feedback `roomvol`

use serde::Serialize;
use sha1::{Digest, Sha1};

use crate::state::Snapshot;
use crate::utils::clean_text;
use crate::vendor::types::{PlayerStatus, PlayerText, Room, StatusCode};

/// Playback state exposed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Playing,
    Idle,
}

/// Content type reported for every room.
pub const MEDIA_CONTENT_TYPE_MUSIC: &str = "music";

/// Read-only view of one room within one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct RoomView<'a> {
    room_id: &'a str,
    snapshot: &'a Snapshot,
}

impl<'a> RoomView<'a> {
    pub fn new(snapshot: &'a Snapshot, room_id: &'a str) -> Self {
        Self { room_id, snapshot }
    }

    pub fn room_id(&self) -> &'a str {
        self.room_id
    }

    pub fn room(&self) -> Option<&'a Room> {
        self.snapshot.rooms.get(self.room_id)
    }

    fn status(&self) -> Option<&'a PlayerStatus> {
        self.snapshot.status(self.room_id)
    }

    fn text(&self) -> Option<&'a PlayerText> {
        self.snapshot.feedback.text_for(self.room_id)
    }

    fn status_field(&self, field: fn(&PlayerStatus) -> Option<&str>) -> Option<&'a str> {
        clean_text(self.status().and_then(field))
    }

    fn text_field(&self, field: fn(&PlayerText) -> Option<&str>) -> Option<&'a str> {
        clean_text(self.text().and_then(field))
    }

    /// `false` only when the room list says so; a room missing from the
    /// snapshot is treated the same.
    pub fn available(&self) -> bool {
        self.room().map(|r| r.is_available).unwrap_or(false)
    }

    pub fn state(&self) -> PlaybackState {
        let code = self
            .status()
            .map(PlayerStatus::status_code)
            .unwrap_or(StatusCode::Unknown);
        let playing_flag = self
            .status()
            .and_then(PlayerStatus::is_playing_flag)
            .unwrap_or(false);

        if code == StatusCode::Playing || playing_flag {
            return PlaybackState::Playing;
        }
        if code == StatusCode::Paused {
            return PlaybackState::Idle;
        }
        if self.text().map(PlayerText::has_text).unwrap_or(false) {
            return PlaybackState::Playing;
        }
        // Stopped and unrecognised codes both end up idle here.
        PlaybackState::Idle
    }

    pub fn media_title(&self) -> Option<&'a str> {
        self.text_field(|t| t.roomtext.as_deref())
            .or_else(|| self.status_field(|s| s.title.as_deref()))
            .or_else(|| self.text_field(|t| t.roomtitle.as_deref()))
    }

    pub fn media_artist(&self) -> Option<&'a str> {
        self.status_field(|s| s.artist.as_deref())
            .or_else(|| self.text_field(|t| t.roomartist.as_deref()))
    }

    pub fn media_album_name(&self) -> Option<&'a str> {
        self.status_field(|s| s.album.as_deref())
            .or_else(|| self.text_field(|t| t.roomalbum.as_deref()))
    }

    pub fn media_content_type(&self) -> &'static str {
        MEDIA_CONTENT_TYPE_MUSIC
    }

    /// Cover URL with a `cache=` parameter derived from the resolved metadata,
    /// so the URL changes whenever the track does.
    pub fn entity_picture(&self) -> Option<String> {
        let cover = self.status_field(|s| s.cover.as_deref())?;
        let separator = if cover.contains('?') { '&' } else { '?' };
        Some(format!("{}{}cache={}", cover, separator, self.metadata_hash()))
    }

    /// First 8 hex digits of SHA-1 over `title|artist|album`.
    fn metadata_hash(&self) -> String {
        let base = format!(
            "{}|{}|{}",
            self.media_title().unwrap_or_default(),
            self.media_artist().unwrap_or_default(),
            self.media_album_name().unwrap_or_default()
        );
        let digest = hex::encode(Sha1::digest(base.as_bytes()));
        digest[..8].to_string()
    }

    /// Volume as a fraction in `0.0..=1.0`.
    ///
    /// Feedback is consulted only when the status carries no `current_volume`;
    /// a present but unparseable status volume is unknown.
    pub fn volume_level(&self) -> Option<f64> {
        let percent = match self.status().filter(|s| s.has_volume()) {
            Some(status) => status.volume_percent(),
            None => self.snapshot.feedback.volume_for(self.room_id),
        };
        percent.map(|percent| (percent / 100.0).clamp(0.0, 1.0))
    }

    /// All host-facing properties at once.
    pub fn attributes(&self) -> RoomAttributes {
        RoomAttributes {
            room_id: self.room_id.to_string(),
            name: self.room().map(|r| r.name.clone()),
            available: self.available(),
            state: self.state(),
            media_title: self.media_title().map(str::to_string),
            media_artist: self.media_artist().map(str::to_string),
            media_album_name: self.media_album_name().map(str::to_string),
            media_content_type: self.media_content_type(),
            entity_picture: self.entity_picture(),
            volume_level: self.volume_level(),
        }
    }
}

/// Serializable form of a [`RoomView`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomAttributes {
    pub room_id: String,
    pub name: Option<String>,
    pub available: bool,
    pub state: PlaybackState,
    pub media_title: Option<String>,
    pub media_artist: Option<String>,
    pub media_album_name: Option<String>,
    pub media_content_type: &'static str,
    pub entity_picture: Option<String>,
    pub volume_level: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    use crate::vendor::test_fixtures::room;
    use crate::vendor::types::{Feedback, RoomVolume};

    fn snapshot(status: PlayerStatus, text: Option<PlayerText>) -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.rooms.insert("1".into(), room("1", "Kitchen"));
        snapshot.room_status.insert("1".into(), status);
        if let Some(mut text) = text {
            text.roomid = Some("1".into());
            snapshot.feedback.playertext.push(text);
        }
        snapshot
    }

    fn status_code(code: &str) -> PlayerStatus {
        PlayerStatus {
            status_code: Some(code.into()),
            ..Default::default()
        }
    }

    fn roomtext(text: &str) -> PlayerText {
        PlayerText {
            roomtext: Some(text.into()),
            ..Default::default()
        }
    }

    #[test]
    fn paused_status_overrides_feedback_text() {
        let snap = snapshot(status_code("paused"), Some(roomtext("Song A")));
        assert_eq!(RoomView::new(&snap, "1").state(), PlaybackState::Idle);
    }

    #[test]
    fn unknown_status_with_feedback_text_is_playing() {
        let snap = snapshot(status_code(""), Some(roomtext("Song A")));
        assert_eq!(RoomView::new(&snap, "1").state(), PlaybackState::Playing);

        let degraded = snapshot(PlayerStatus::default(), Some(roomtext("Song A")));
        assert_eq!(RoomView::new(&degraded, "1").state(), PlaybackState::Playing);
    }

    #[test]
    fn unrecognised_status_falls_through_to_feedback() {
        let snap = snapshot(status_code("buffering"), Some(roomtext("Song A")));
        assert_eq!(RoomView::new(&snap, "1").state(), PlaybackState::Playing);

        let quiet = snapshot(status_code("buffering"), None);
        assert_eq!(RoomView::new(&quiet, "1").state(), PlaybackState::Idle);
    }

    #[test]
    fn stopped_status_without_text_is_idle() {
        let snap = snapshot(status_code("STOPPED"), Some(roomtext("   ")));
        assert_eq!(RoomView::new(&snap, "1").state(), PlaybackState::Idle);
    }

    #[test]
    fn playing_flag_alone_is_playing() {
        let status = PlayerStatus {
            status_code: Some("stopped".into()),
            is_playing: Some(json!("yes")),
            ..Default::default()
        };
        let snap = snapshot(status, None);
        assert_eq!(RoomView::new(&snap, "1").state(), PlaybackState::Playing);
    }

    #[test]
    fn title_precedence() {
        let status = PlayerStatus {
            title: Some("Y".into()),
            ..Default::default()
        };

        let snap = snapshot(status.clone(), Some(roomtext("X")));
        assert_eq!(RoomView::new(&snap, "1").media_title(), Some("X"));

        let snap = snapshot(status, Some(roomtext("")));
        assert_eq!(RoomView::new(&snap, "1").media_title(), Some("Y"));

        let blank_status = PlayerStatus {
            title: Some("  ".into()),
            ..Default::default()
        };
        let text = PlayerText {
            roomtext: Some("".into()),
            roomtitle: Some("Z".into()),
            ..Default::default()
        };
        let snap = snapshot(blank_status, Some(text));
        assert_eq!(RoomView::new(&snap, "1").media_title(), Some("Z"));
    }

    #[test]
    fn artist_and_album_prefer_status() {
        let status = PlayerStatus {
            artist: Some("Status Artist".into()),
            album: Some(" ".into()),
            ..Default::default()
        };
        let text = PlayerText {
            roomartist: Some("Feed Artist".into()),
            roomalbum: Some("Feed Album".into()),
            ..Default::default()
        };
        let snap = snapshot(status, Some(text));
        let view = RoomView::new(&snap, "1");

        assert_eq!(view.media_artist(), Some("Status Artist"));
        assert_eq!(view.media_album_name(), Some("Feed Album"));
    }

    #[test]
    fn volume_normalization() {
        let status = PlayerStatus {
            current_volume: Some(json!(57)),
            ..Default::default()
        };
        let snap = snapshot(status, None);
        assert_eq!(RoomView::new(&snap, "1").volume_level(), Some(0.57));

        let mut snap = snapshot(PlayerStatus::default(), None);
        snap.feedback.roomvolume.push(RoomVolume {
            roomid: Some("1".into()),
            roomvol: Some(json!("80")),
        });
        assert_eq!(RoomView::new(&snap, "1").volume_level(), Some(0.8));

        let snap = snapshot(PlayerStatus::default(), None);
        assert_eq!(RoomView::new(&snap, "1").volume_level(), None);
    }

    #[test]
    fn unparseable_status_volume_does_not_fall_back() {
        let status = PlayerStatus {
            current_volume: Some(json!("n/a")),
            ..Default::default()
        };
        let mut snap = snapshot(status, None);
        snap.feedback.roomvolume.push(RoomVolume {
            roomid: Some("1".into()),
            roomvol: Some(json!("80")),
        });
        assert_eq!(RoomView::new(&snap, "1").volume_level(), None);
    }

    #[test]
    fn null_status_volume_falls_back_to_feedback() {
        let status = PlayerStatus {
            current_volume: Some(Value::Null),
            ..Default::default()
        };
        let mut snap = snapshot(status, None);
        snap.feedback.roomvolume.push(RoomVolume {
            roomid: Some("1".into()),
            roomvol: Some(json!(25)),
        });
        assert_eq!(RoomView::new(&snap, "1").volume_level(), Some(0.25));
    }

    #[test]
    fn volume_is_clamped() {
        let status = PlayerStatus {
            current_volume: Some(json!("140")),
            ..Default::default()
        };
        let snap = snapshot(status, None);
        assert_eq!(RoomView::new(&snap, "1").volume_level(), Some(1.0));
    }

    #[test]
    fn entity_picture_hash_tracks_metadata() {
        let status = PlayerStatus {
            cover: Some("http://ctl/cover.jpg".into()),
            title: Some("T".into()),
            artist: Some("A".into()),
            album: Some("B".into()),
            ..Default::default()
        };
        let snap = snapshot(status.clone(), None);
        let picture = RoomView::new(&snap, "1").entity_picture().unwrap();

        let expected = &hex::encode(Sha1::digest(b"T|A|B"))[..8];
        assert_eq!(picture, format!("http://ctl/cover.jpg?cache={}", expected));

        let changed = snapshot(
            PlayerStatus {
                title: Some("T2".into()),
                ..status
            },
            None,
        );
        assert_ne!(RoomView::new(&changed, "1").entity_picture().unwrap(), picture);
    }

    #[test]
    fn entity_picture_appends_to_existing_query() {
        let status = PlayerStatus {
            cover: Some("http://ctl/art?id=9".into()),
            ..Default::default()
        };
        let snap = snapshot(status, None);
        let picture = RoomView::new(&snap, "1").entity_picture().unwrap();

        let expected = &hex::encode(Sha1::digest(b"||"))[..8];
        assert_eq!(picture, format!("http://ctl/art?id=9&cache={}", expected));
    }

    #[test]
    fn no_cover_no_picture() {
        let snap = snapshot(PlayerStatus::default(), None);
        assert_eq!(RoomView::new(&snap, "1").entity_picture(), None);
    }

    #[test]
    fn availability_comes_from_room_list() {
        let mut snap = snapshot(PlayerStatus::default(), None);
        assert!(RoomView::new(&snap, "1").available());

        snap.rooms.get_mut("1").unwrap().is_available = false;
        assert!(!RoomView::new(&snap, "1").available());
        assert!(!RoomView::new(&snap, "99").available());
    }

    #[test]
    fn attributes_serialize_lowercase_state() {
        let mut snap = snapshot(status_code("playing"), None);
        snap.feedback = Feedback::default();
        let value = serde_json::to_value(RoomView::new(&snap, "1").attributes()).unwrap();

        assert_eq!(value["state"], "playing");
        assert_eq!(value["name"], "Kitchen");
        assert_eq!(value["media_content_type"], "music");
        assert!(value["volume_level"].is_null());
    }
}
