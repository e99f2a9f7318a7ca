use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::{
    event::RoomEventError,
    room::RoomService,
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};

use super::shared::MessageBroadcaster;

/// Pass-through relays between the two members of a room.
///
/// Payloads are forwarded unchanged; senders outside the room are ignored.
pub struct RelayEventHandlers {
    room_service: Arc<RoomService>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl RelayEventHandlers {
    pub fn new(room_service: Arc<RoomService>, connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self {
            room_service,
            connection_manager,
        }
    }

    /// Topic goes to every member, the sender included
    pub async fn handle_topic(
        &self,
        room_name: &str,
        sender_id: &str,
        topic: &str,
    ) -> Result<(), RoomEventError> {
        let Some(members) = self.members(room_name, sender_id).await else {
            return Ok(());
        };

        MessageBroadcaster::broadcast_to_players(
            &self.connection_manager,
            &members,
            &WebSocketMessage::receive_topic(topic.to_string()).from_sender(sender_id),
        )
        .await
    }

    pub async fn handle_draw(
        &self,
        room_name: &str,
        sender_id: &str,
        payload: Value,
    ) -> Result<(), RoomEventError> {
        let Some(members) = self.members(room_name, sender_id).await else {
            return Ok(());
        };

        MessageBroadcaster::broadcast_to_others(
            &self.connection_manager,
            &members,
            sender_id,
            &WebSocketMessage::draw(payload).from_sender(sender_id),
        )
        .await
    }

    pub async fn handle_result(
        &self,
        room_name: &str,
        sender_id: &str,
        payload: Value,
    ) -> Result<(), RoomEventError> {
        let Some(members) = self.members(room_name, sender_id).await else {
            return Ok(());
        };

        MessageBroadcaster::broadcast_to_others(
            &self.connection_manager,
            &members,
            sender_id,
            &WebSocketMessage::result(payload).from_sender(sender_id),
        )
        .await
    }

    async fn members(&self, room_name: &str, sender_id: &str) -> Option<Vec<String>> {
        match self.room_service.members_for_sender(sender_id, room_name).await {
            Ok(members) => Some(members),
            Err(e) => {
                debug!(room = %room_name, error = %e, "Relay dropped");
                None
            }
        }
    }
}
