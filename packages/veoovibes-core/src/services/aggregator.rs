//! State aggregation: one refresh cycle against the controller.
//!
//! A cycle lists rooms, fans out one status fetch per room, fetches batch
//! feedback, consults the favorites cache and assembles a [`Snapshot`].
//! Only the room list is load-bearing; every other source degrades.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use crate::error::VeoovibesResult;
use crate::services::favorites_cache::FavoritesCache;
use crate::state::Snapshot;
use crate::utils::now_millis;
use crate::vendor::traits::VeoovibesReads;
use crate::vendor::types::{Feedback, PlayerStatus};

/// Builds snapshots from controller reads.
///
/// Owns the favorites cache; callers must not run two `refresh` calls at once
/// (enforced by `&mut self`).
pub struct StateAggregator {
    client: Arc<dyn VeoovibesReads>,
    favorites: FavoritesCache,
}

impl StateAggregator {
    pub fn new(client: Arc<dyn VeoovibesReads>, favorites_ttl: Duration) -> Self {
        Self {
            client,
            favorites: FavoritesCache::new(favorites_ttl),
        }
    }

    /// Runs one refresh cycle.
    ///
    /// # Errors
    /// Fails only if the room list cannot be fetched.
    pub async fn refresh(&mut self) -> VeoovibesResult<Snapshot> {
        let rooms = self.client.list_rooms().await?;
        let room_ids: Vec<String> = rooms.keys().cloned().collect();
        log::debug!("[Aggregator] Loaded rooms: {:?}", room_ids);

        let (room_status, degraded_rooms) = self.fetch_statuses(&room_ids).await;

        let feedback = match self.client.get_room_feedback(&room_ids).await {
            Ok(feedback) => feedback,
            Err(e) => {
                log::debug!("[Aggregator] get_room_feedback failed: {}", e);
                Feedback::default()
            }
        };

        let favorites = self.favorites.get(self.client.as_ref()).await;

        Ok(Snapshot {
            rooms,
            room_status,
            feedback,
            favorites,
            degraded_rooms,
            fetched_at_ms: now_millis(),
        })
    }

    /// Fetches every room's status concurrently.
    ///
    /// Failures are mapped to an empty status here, after all fetches have
    /// completed, so one room cannot cancel its siblings.
    async fn fetch_statuses(
        &self,
        room_ids: &[String],
    ) -> (BTreeMap<String, PlayerStatus>, BTreeSet<String>) {
        let futures: Vec<_> = room_ids
            .iter()
            .map(|room_id| {
                let client = Arc::clone(&self.client);
                let room_id = room_id.clone();
                async move {
                    let result = client.room_player_status(&room_id).await;
                    (room_id, result)
                }
            })
            .collect();

        let mut statuses = BTreeMap::new();
        let mut degraded = BTreeSet::new();

        for (room_id, result) in join_all(futures).await {
            let status = match result {
                Ok(status) => status,
                Err(e) => {
                    log::debug!("[Aggregator] room_player_status failed for {}: {}", room_id, e);
                    degraded.insert(room_id.clone());
                    PlayerStatus::default()
                }
            };
            statuses.insert(room_id, status);
        }

        (statuses, degraded)
    }
}
