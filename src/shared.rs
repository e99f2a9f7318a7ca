use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{ConfigError, ServerConfig};
use crate::event::{EventBus, RoomEventError};
use crate::room::{repository::RoomRepository, RoomService};
use crate::websockets::ConnectionManager;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub room_service: Arc<RoomService>,
    pub event_bus: EventBus,
}

impl AppState {
    pub fn new(
        config: Arc<ServerConfig>,
        connection_manager: Arc<dyn ConnectionManager>,
        room_repository: Arc<dyn RoomRepository + Send + Sync>,
        event_bus: EventBus,
    ) -> Self {
        let room_service = Arc::new(RoomService::new(
            room_repository,
            Arc::clone(&connection_manager),
        ));

        Self {
            config,
            connection_manager,
            room_service,
            event_bus,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Event subscription error: {0}")]
    Subscription(#[from] RoomEventError),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Config(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Subscription(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
