//! Periodic refresh loop.
//!
//! Drives the [`StateAggregator`] on a fixed interval, publishes each new
//! snapshot and reports outcomes through the [`EventEmitter`]. Cycles never
//! overlap: the loop and [`RefreshCoordinator::refresh_now`] share one
//! aggregator behind an async mutex.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::VeoovibesResult;
use crate::events::{EventEmitter, RefreshEvent};
use crate::services::aggregator::StateAggregator;
use crate::state::{Snapshot, SnapshotStore};
use crate::utils::now_millis;

/// Owns the refresh schedule and the published snapshot.
pub struct RefreshCoordinator {
    aggregator: Mutex<StateAggregator>,
    store: SnapshotStore,
    emitter: Arc<dyn EventEmitter>,
    /// Shared with the command dispatcher to request an early refresh.
    refresh_notify: Arc<Notify>,
    cancel_token: CancellationToken,
    scan_interval: Duration,
    last_update_success: AtomicBool,
    last_error: RwLock<Option<String>>,
}

impl RefreshCoordinator {
    /// Creates a coordinator with an empty snapshot.
    ///
    /// # Arguments
    /// * `aggregator` - Performs the actual cycle
    /// * `emitter` - Receives one event per cycle
    /// * `refresh_notify` - Wakes the loop for a manual refresh
    /// * `scan_interval` - Time between automatic cycles
    pub fn new(
        aggregator: StateAggregator,
        emitter: Arc<dyn EventEmitter>,
        refresh_notify: Arc<Notify>,
        scan_interval: Duration,
    ) -> Self {
        Self {
            aggregator: Mutex::new(aggregator),
            store: SnapshotStore::default(),
            emitter,
            refresh_notify,
            cancel_token: CancellationToken::new(),
            scan_interval,
            last_update_success: AtomicBool::new(false),
            last_error: RwLock::new(None),
        }
    }

    /// Returns the latest published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.load()
    }

    /// Returns `true` if the most recent cycle succeeded.
    pub fn last_update_success(&self) -> bool {
        self.last_update_success.load(Ordering::SeqCst)
    }

    /// Returns the error message of the most recent failed cycle.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Requests a refresh from the running loop.
    ///
    /// Requests made while a cycle is running coalesce into one follow-up cycle.
    pub fn trigger_refresh(&self) {
        self.refresh_notify.notify_one();
    }

    /// Runs one cycle now and publishes the result.
    ///
    /// Waits for any in-flight cycle to finish first. On failure the previous
    /// snapshot stays published.
    pub async fn refresh_now(&self) -> VeoovibesResult<Arc<Snapshot>> {
        let mut aggregator = self.aggregator.lock().await;

        match aggregator.refresh().await {
            Ok(snapshot) => {
                let event = RefreshEvent::Updated {
                    room_count: snapshot.rooms.len(),
                    degraded_rooms: snapshot.degraded_rooms.iter().cloned().collect(),
                    timestamp: snapshot.fetched_at_ms,
                };
                self.store.publish(snapshot);
                self.last_update_success.store(true, Ordering::SeqCst);
                *self.last_error.write() = None;
                self.emitter.emit_refresh(event);
                Ok(self.store.load())
            }
            Err(e) => {
                self.last_update_success.store(false, Ordering::SeqCst);
                *self.last_error.write() = Some(e.to_string());
                self.emitter.emit_refresh(RefreshEvent::Failed {
                    message: e.to_string(),
                    timestamp: now_millis(),
                });
                Err(e)
            }
        }
    }

    /// Spawns the refresh loop.
    ///
    /// The first automatic cycle runs one interval after start; setup performs
    /// the initial refresh itself. A manual refresh pushes the next automatic
    /// cycle back by a full interval.
    pub fn start_monitoring(self: Arc<Self>) -> JoinHandle<()> {
        let cancel_token = self.cancel_token.clone();

        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval_at(Instant::now() + self.scan_interval, self.scan_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            log::info!(
                "[Coordinator] Polling every {}s",
                self.scan_interval.as_secs()
            );

            loop {
                let is_manual_refresh = tokio::select! {
                    _ = cancel_token.cancelled() => {
                        log::info!("[Coordinator] Shutting down refresh loop");
                        break;
                    }
                    _ = interval.tick() => false,
                    _ = self.refresh_notify.notified() => {
                        log::debug!("[Coordinator] Manual refresh triggered");
                        true
                    }
                };

                if is_manual_refresh {
                    interval.reset();
                }

                if let Err(e) = self.refresh_now().await {
                    log::error!("[Coordinator] Refresh failed: {}", e);
                }
            }
        })
    }

    /// Stops the refresh loop. An in-flight cycle completes first.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
