use async_trait::async_trait;
use thiserror::Error;

use super::events::RoomEvent;

/// Errors that can occur when handling room events
#[derive(Debug, Error)]
pub enum RoomEventError {
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("Room already has a worker: {0}")]
    AlreadySubscribed(String),

    #[error("Failed to serialize message: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Handler error: {0}")]
    HandlerError(String),
}

/// Trait for components that can handle room events
///
/// This provides a clean interface for reacting to room-specific events
/// without being tied to WebSocket or connection specifics.
#[async_trait]
pub trait RoomEventHandler: Send + Sync {
    /// Handle a room event
    ///
    /// Rejected requests (unknown room, non-member sender) are not errors;
    /// handlers drop them and return Ok(()).
    async fn handle_room_event(&self, room: &str, event: RoomEvent)
        -> Result<(), RoomEventError>;

    /// Get a human-readable name for this handler (for logging/debugging)
    fn handler_name(&self) -> &'static str;
}
