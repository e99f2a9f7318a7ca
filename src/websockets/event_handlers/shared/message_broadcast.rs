use crate::{
    event::RoomEventError,
    room::RoomReady,
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};
use std::sync::Arc;

pub struct MessageBroadcaster;

impl MessageBroadcaster {
    pub async fn send_to_player(
        connection_manager: &Arc<dyn ConnectionManager>,
        connection_id: &str,
        message: &WebSocketMessage,
    ) -> Result<(), RoomEventError> {
        let message_json = serde_json::to_string(message)?;
        connection_manager
            .send_to_player(connection_id, &message_json)
            .await;
        Ok(())
    }

    pub async fn broadcast_to_players(
        connection_manager: &Arc<dyn ConnectionManager>,
        connection_ids: &[String],
        message: &WebSocketMessage,
    ) -> Result<(), RoomEventError> {
        let message_json = serde_json::to_string(message)?;
        connection_manager
            .send_to_players(connection_ids, &message_json)
            .await;
        Ok(())
    }

    /// Sends to every member except the one the message came from
    pub async fn broadcast_to_others(
        connection_manager: &Arc<dyn ConnectionManager>,
        connection_ids: &[String],
        sender_id: &str,
        message: &WebSocketMessage,
    ) -> Result<(), RoomEventError> {
        let others: Vec<String> = connection_ids
            .iter()
            .filter(|id| id.as_str() != sender_id)
            .cloned()
            .collect();
        Self::broadcast_to_players(connection_manager, &others, message).await
    }

    pub async fn broadcast_to_all(
        connection_manager: &Arc<dyn ConnectionManager>,
        message: &WebSocketMessage,
    ) -> Result<(), RoomEventError> {
        let message_json = serde_json::to_string(message)?;
        connection_manager.broadcast(&message_json).await;
        Ok(())
    }

    /// Sends ROOM_READY to the members listed in the announcement
    pub async fn announce_room_ready(
        connection_manager: &Arc<dyn ConnectionManager>,
        ready: &RoomReady,
    ) -> Result<(), RoomEventError> {
        let members: Vec<String> = ready.names.keys().cloned().collect();
        Self::broadcast_to_players(
            connection_manager,
            &members,
            &WebSocketMessage::room_ready(ready),
        )
        .await
    }
}
