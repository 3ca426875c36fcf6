//! Time-bounded cache of the controller's favorites.
//!
//! Favorites are refetched at most once per TTL. A failed refetch keeps serving
//! the previous list (or an empty one if none was ever fetched) and leaves the
//! timestamp untouched, so the next cycle tries again.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::vendor::traits::VeoovibesReads;
use crate::vendor::types::Favorites;

struct CachedFavorites {
    value: Arc<Favorites>,
    fetched_at: Instant,
}

/// Single-owner favorites cache, mutated only from the refresh path.
pub struct FavoritesCache {
    ttl: Duration,
    entry: Option<CachedFavorites>,
}

impl FavoritesCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// Returns `true` if the next `get` will call the controller.
    pub fn is_stale(&self) -> bool {
        match &self.entry {
            None => true,
            Some(cached) => cached.fetched_at.elapsed() > self.ttl,
        }
    }

    /// Returns the cached favorites, refreshing them first if stale.
    pub async fn get<C>(&mut self, client: &C) -> Arc<Favorites>
    where
        C: VeoovibesReads + ?Sized,
    {
        if self.is_stale() {
            match client.list_favorites().await {
                Ok(favorites) => {
                    log::debug!("[Favorites] Refreshed {} favorites", favorites.len());
                    self.entry = Some(CachedFavorites {
                        value: Arc::new(favorites),
                        fetched_at: Instant::now(),
                    });
                }
                Err(e) => {
                    log::debug!("[Favorites] list_favorites failed, serving cached: {}", e);
                }
            }
        }

        self.entry
            .as_ref()
            .map(|cached| Arc::clone(&cached.value))
            .unwrap_or_default()
    }
}
