use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::types::{RoomOccupancyResponse, RoomStatus};
use crate::shared::{AppError, AppState};

/// HTTP handler for the occupancy snapshot
///
/// GET /rooms
/// Same data as the `room_status` message
#[instrument(name = "list_rooms", skip(state))]
pub async fn list_rooms(State(state): State<AppState>) -> Json<RoomStatus> {
    let status = state.room_service.room_snapshot().await;

    info!(room_count = status.len(), "Rooms listed successfully");

    Json(status)
}

/// HTTP handler for a single room's occupancy
///
/// GET /rooms/:room_name
#[instrument(name = "get_room", skip(state))]
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_name): Path<String>,
) -> Result<Json<RoomOccupancyResponse>, AppError> {
    let status = state.room_service.room_snapshot().await;

    let count = status
        .get(&room_name)
        .copied()
        .ok_or_else(|| AppError::NotFound(format!("Room not found: {}", room_name)))?;

    Ok(Json(RoomOccupancyResponse {
        room: room_name,
        count,
    }))
}
