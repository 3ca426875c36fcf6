//! HTTP route handlers.
//!
//! All handlers are thin - they resolve the room entity and delegate.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::response::{api_ok, api_success};
use crate::api::AppState;
use crate::entity::RoomEntity;
use crate::error::{VeoovibesError, VeoovibesResult};
use crate::protocol_constants::DOMAIN;

// ─────────────────────────────────────────────────────────────────────────────
// Request Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct VolumeRequest {
    volume_level: f64,
}

#[derive(Deserialize)]
struct PlayFavoriteRequest {
    fav_id: String,
}

#[derive(Deserialize)]
struct PlayMediaRequest {
    media_content_type: String,
    media_content_id: String,
}

#[derive(Deserialize)]
struct BrowseQuery {
    media_content_type: Option<String>,
    media_content_id: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Creates the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/rooms", get(list_rooms))
        .route("/api/rooms/{room_id}", get(get_room))
        .route("/api/rooms/{room_id}/browse", get(browse_media))
        .route("/api/rooms/{room_id}/volume", post(set_volume))
        .route("/api/rooms/{room_id}/play_favorite", post(play_favorite))
        .route("/api/rooms/{room_id}/play_media", post(play_media))
        .route("/api/rooms/{room_id}/{command}", post(room_command))
        .route("/api/refresh", post(handle_refresh))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn entity_json(entity: &RoomEntity) -> Value {
    json!({
        "unique_id": entity.unique_id(),
        "name": entity.name(),
        "device_class": entity.device_class(),
        "device_info": entity.device_info(),
        "supported_features": entity.supported_features(),
        "attributes": entity.attributes(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let coordinator = &state.services.coordinator;
    api_success(json!({
        "status": "ok",
        "service": DOMAIN,
        "host": state.services.host(),
        "lastUpdateSuccess": coordinator.last_update_success(),
        "lastError": coordinator.last_error(),
        "roomCount": coordinator.snapshot().rooms.len(),
    }))
}

async fn list_rooms(State(state): State<AppState>) -> impl IntoResponse {
    let rooms: Vec<Value> = state.services.entities().iter().map(entity_json).collect();
    api_success(rooms)
}

async fn get_room(
    Path(room_id): Path<String>,
    State(state): State<AppState>,
) -> VeoovibesResult<impl IntoResponse> {
    let entity = state.services.entity(&room_id)?;
    Ok(api_success(entity_json(&entity)))
}

async fn browse_media(
    Path(room_id): Path<String>,
    Query(query): Query<BrowseQuery>,
    State(state): State<AppState>,
) -> VeoovibesResult<impl IntoResponse> {
    let entity = state.services.entity(&room_id)?;
    Ok(api_success(entity.browse_media(
        query.media_content_type.as_deref(),
        query.media_content_id.as_deref(),
    )))
}

/// Parameterless transport and volume-step commands.
async fn room_command(
    Path((room_id, command)): Path<(String, String)>,
    State(state): State<AppState>,
) -> VeoovibesResult<impl IntoResponse> {
    let entity = state.services.entity(&room_id)?;
    match command.as_str() {
        "play" => entity.media_play().await?,
        "stop" => entity.media_stop().await?,
        "next" => entity.media_next_track().await?,
        "previous" => entity.media_previous_track().await?,
        "volume_up" => entity.volume_up().await?,
        "volume_down" => entity.volume_down().await?,
        other => {
            return Err(VeoovibesError::InvalidRequest(format!(
                "Unknown command: {}",
                other
            )))
        }
    }
    Ok(api_ok())
}

async fn set_volume(
    Path(room_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<VolumeRequest>,
) -> VeoovibesResult<impl IntoResponse> {
    state
        .services
        .entity(&room_id)?
        .set_volume_level(payload.volume_level)
        .await?;
    Ok(api_success(json!({ "room_id": room_id, "volume_level": payload.volume_level })))
}

async fn play_favorite(
    Path(room_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<PlayFavoriteRequest>,
) -> VeoovibesResult<impl IntoResponse> {
    state
        .services
        .entity(&room_id)?
        .play_favorite(&payload.fav_id)
        .await?;
    Ok(api_ok())
}

async fn play_media(
    Path(room_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<PlayMediaRequest>,
) -> VeoovibesResult<impl IntoResponse> {
    state
        .services
        .entity(&room_id)?
        .play_media(&payload.media_content_type, &payload.media_content_id)
        .await?;
    Ok(api_ok())
}

/// Runs a refresh cycle immediately.
async fn handle_refresh(State(state): State<AppState>) -> VeoovibesResult<impl IntoResponse> {
    let snapshot = state.services.coordinator.refresh_now().await?;
    Ok(api_success(json!({
        "success": true,
        "roomCount": snapshot.rooms.len(),
        "degradedRooms": snapshot.degraded_rooms,
    })))
}
