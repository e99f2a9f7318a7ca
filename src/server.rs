use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::{net::TcpListener, task::JoinHandle};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::config::ServerConfig;
use crate::event::{start_room_subscriptions, EventBus, RoomEventError, RoomEventHandler};
use crate::room::{get_room, list_rooms, repository::InMemoryRoomRepository};
use crate::shared::{AppError, AppState};
use crate::websockets::{websocket_handler, InMemoryConnectionManager, WebSocketRoomSubscriber};

/// Wires the in-memory stores, connection registry and room channels
pub fn build_state(config: ServerConfig) -> AppState {
    let room_repository = Arc::new(InMemoryRoomRepository::new(config.room_names.clone()));
    let event_bus = EventBus::new(config.room_names.clone(), config.event_channel_capacity);
    let connection_manager = Arc::new(InMemoryConnectionManager::new());

    AppState::new(
        Arc::new(config),
        connection_manager,
        room_repository,
        event_bus,
    )
}

/// Starts the per-room workers that deliver room events to WebSocket clients
pub fn start_room_workers(state: &AppState) -> Result<Vec<JoinHandle<()>>, RoomEventError> {
    let subscriber: Arc<dyn RoomEventHandler> = Arc::new(WebSocketRoomSubscriber::new(
        Arc::clone(&state.room_service),
        Arc::clone(&state.connection_manager),
    ));

    start_room_subscriptions(&state.config.room_names, subscriber, &state.event_bus)
}

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/ws", get(websocket_handler))
        .route("/rooms", get(list_rooms))
        .route("/rooms/:room_name", get(get_room));

    if let Some(dir) = &state.config.static_dir {
        info!(static_dir = %dir.display(), "Serving static client files");
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Runs the server on an already bound listener until it stops
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), AppError> {
    let workers = start_room_workers(&state)?;
    info!(rooms = workers.len(), "Room workers started");

    let app = router(state);
    axum::serve(listener, app).await?;
    Ok(())
}
