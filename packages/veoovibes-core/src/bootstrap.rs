//! Setup and dependency wiring.
//!
//! This is the composition root: the controller client, aggregator, refresh
//! coordinator, command dispatcher and event bridge are created and wired
//! together here and nowhere else.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::entity::{room_entities, room_entity, RoomEntity};
use crate::error::{VeoovibesError, VeoovibesResult};
use crate::events::{BroadcastEventBridge, EventEmitter, RefreshEvent};
use crate::protocol_constants::{
    DOMAIN, EVENT_CHANNEL_CAPACITY, FAVORITES_TTL_SECS, REQUEST_TIMEOUT_SECS,
};
use crate::services::{RefreshCoordinator, RoomController, StateAggregator};
use crate::state::{Config, Snapshot};
use crate::vendor::{VeoovibesClient, VeoovibesClientImpl, VeoovibesReads};

/// Result of a successful connectivity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionInfo {
    /// Unique id of the integration instance (`veoovibes:<host>`).
    pub unique_id: String,
    pub title: String,
    /// Rooms reported during the check.
    pub room_count: usize,
}

/// Creates the shared HTTP client for all controller communication.
fn create_http_client() -> VeoovibesResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| VeoovibesError::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// Checks that the controller answers a room listing with the given settings.
///
/// # Errors
/// `Configuration` if the config is invalid, `CannotConnect` for any failure
/// of the room listing.
pub async fn validate_connection(config: &Config) -> VeoovibesResult<ConnectionInfo> {
    config.validate().map_err(VeoovibesError::Configuration)?;
    let client = VeoovibesClientImpl::new(create_http_client()?, &config.host, &config.api_key);
    validate_with_client(&client, &config.host).await
}

/// Connectivity check against an already constructed client.
pub async fn validate_with_client<C>(client: &C, host: &str) -> VeoovibesResult<ConnectionInfo>
where
    C: VeoovibesReads + ?Sized,
{
    let rooms = client.list_rooms().await.map_err(|e| {
        log::warn!("[Setup] Connectivity check against {} failed: {}", host, e);
        VeoovibesError::CannotConnect(e.to_string())
    })?;

    Ok(ConnectionInfo {
        unique_id: format!("{}:{}", DOMAIN, host),
        title: format!("{} ({})", DOMAIN, host),
        room_count: rooms.len(),
    })
}

/// Container for the wired integration.
#[derive(Clone)]
pub struct BootstrappedServices {
    config: Config,
    pub coordinator: Arc<RefreshCoordinator>,
    pub controller: RoomController,
    pub event_bridge: Arc<BroadcastEventBridge>,
}

impl BootstrappedServices {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Returns the latest published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.coordinator.snapshot()
    }

    /// One entity per room in the latest snapshot.
    pub fn entities(&self) -> Vec<RoomEntity> {
        room_entities(&self.config.host, &self.coordinator, &self.controller)
    }

    /// The entity for `room_id`, or `RoomNotFound`.
    pub fn entity(&self, room_id: &str) -> VeoovibesResult<RoomEntity> {
        room_entity(&self.config.host, &self.coordinator, &self.controller, room_id)
    }

    /// Subscribes to refresh outcomes.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<RefreshEvent> {
        self.event_bridge.subscribe()
    }

    /// Starts the periodic refresh loop.
    pub fn start(&self) -> JoinHandle<()> {
        self.coordinator.clone().start_monitoring()
    }

    /// Stops the periodic refresh loop.
    pub fn shutdown(&self) {
        log::info!("[Setup] Shutting down integration for {}", self.config.host);
        self.coordinator.shutdown();
    }
}

/// Sets up the integration for one controller.
///
/// # Arguments
/// * `config` - Validated connection settings
/// * `external_emitter` - Optional emitter that sees every refresh event
///
/// # Errors
/// `Configuration` for invalid settings, `SetupNotReady` if the first
/// refresh fails.
pub async fn setup(
    config: Config,
    external_emitter: Option<Arc<dyn EventEmitter>>,
) -> VeoovibesResult<BootstrappedServices> {
    config.validate().map_err(VeoovibesError::Configuration)?;
    let client = Arc::new(VeoovibesClientImpl::new(
        create_http_client()?,
        &config.host,
        &config.api_key,
    ));
    setup_with_client(config, client, external_emitter).await
}

/// Sets up the integration over an injected client.
///
/// Wiring order:
/// 1. Event bridge (optionally forwarding to `external_emitter`)
/// 2. Aggregator with its favorites cache
/// 3. Refresh coordinator and the shared refresh `Notify`
/// 4. Command dispatcher
/// 5. First refresh, which must succeed
pub async fn setup_with_client<C>(
    config: Config,
    client: Arc<C>,
    external_emitter: Option<Arc<dyn EventEmitter>>,
) -> VeoovibesResult<BootstrappedServices>
where
    C: VeoovibesClient + 'static,
{
    config.validate().map_err(VeoovibesError::Configuration)?;

    let event_bridge = Arc::new(BroadcastEventBridge::new(EVENT_CHANNEL_CAPACITY));
    if let Some(emitter) = external_emitter {
        event_bridge.set_external_emitter(emitter);
    }

    let refresh_notify = Arc::new(Notify::new());
    let aggregator = StateAggregator::new(
        client.clone(),
        Duration::from_secs(FAVORITES_TTL_SECS),
    );
    let coordinator = Arc::new(RefreshCoordinator::new(
        aggregator,
        event_bridge.clone(),
        refresh_notify.clone(),
        config.scan_interval(),
    ));
    let controller = RoomController::new(client, refresh_notify);

    let snapshot = coordinator.refresh_now().await.map_err(|e| {
        log::warn!("[Setup] First refresh against {} failed: {}", config.host, e);
        VeoovibesError::SetupNotReady(e.to_string())
    })?;

    log::info!(
        "[Setup] Connected to {} with {} room(s), {} favorite(s)",
        config.host,
        snapshot.rooms.len(),
        snapshot.favorites.len()
    );

    Ok(BootstrappedServices {
        config,
        coordinator,
        controller,
        event_bridge,
    })
}
