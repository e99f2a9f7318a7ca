use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    event::RoomEventError,
    room::{JoinOutcome, Participant, RoomService},
    websockets::{
        connection_manager::ConnectionManager,
        messages::{JoinRoomPayload, WebSocketMessage},
    },
};

use super::shared::MessageBroadcaster;

/// Handlers for requests tied to a connection rather than a single room:
/// listing rooms, joining, leaving and disconnecting.
///
/// These run inline on the connection's own task, so one participant's
/// membership changes never overlap.
pub struct ConnectionEventHandlers {
    room_service: Arc<RoomService>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl ConnectionEventHandlers {
    pub fn new(room_service: Arc<RoomService>, connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self {
            room_service,
            connection_manager,
        }
    }

    /// Replies with the occupancy snapshot to the requester only
    pub async fn handle_get_rooms(&self, connection_id: &str) -> Result<(), RoomEventError> {
        let status = self.room_service.room_snapshot().await;
        MessageBroadcaster::send_to_player(
            &self.connection_manager,
            connection_id,
            &WebSocketMessage::room_status(&status),
        )
        .await
    }

    pub async fn handle_join_request(
        &self,
        connection_id: &str,
        payload: JoinRoomPayload,
    ) -> Result<(), RoomEventError> {
        let Some(room_name) = payload.room_name.filter(|r| !r.is_empty()) else {
            debug!(connection_id = %connection_id, "Join request without room name dropped");
            return Ok(());
        };

        let participant = Participant::new(connection_id, payload.name, payload.icon);

        match self.room_service.join_room(participant, &room_name).await {
            Ok(JoinOutcome::Joined { ready, .. }) => {
                self.broadcast_room_status().await?;
                if let Some(ready) = ready {
                    info!(
                        room = %ready.room,
                        host_id = %ready.host_id,
                        "Room ready"
                    );
                    MessageBroadcaster::announce_room_ready(&self.connection_manager, &ready)
                        .await?;
                }
            }
            Ok(JoinOutcome::AlreadyMember) => {
                debug!(connection_id = %connection_id, room = %room_name, "Repeated join ignored");
            }
            Err(e) => {
                debug!(
                    connection_id = %connection_id,
                    room = %room_name,
                    error = %e,
                    "Join request rejected"
                );
            }
        }

        Ok(())
    }

    pub async fn handle_leave_request(&self, connection_id: &str) -> Result<(), RoomEventError> {
        match self.room_service.leave_room(connection_id).await {
            Ok(outcome) => {
                info!(
                    connection_id = %connection_id,
                    room = %outcome.room,
                    remaining = outcome.remaining.len(),
                    "Leave request processed successfully"
                );
                self.broadcast_room_status().await
            }
            Err(e) => {
                debug!(connection_id = %connection_id, error = %e, "Leave request rejected");
                Ok(())
            }
        }
    }

    /// Cleanup after the transport closed. The connection must already be
    /// gone from the connection manager.
    pub async fn handle_disconnect(&self, connection_id: &str) -> Result<(), RoomEventError> {
        if let Ok(outcome) = self.room_service.leave_room(connection_id).await {
            info!(
                connection_id = %connection_id,
                room = %outcome.room,
                "Removed disconnected participant from room"
            );
        }
        // Every disconnect is followed by a status broadcast
        self.broadcast_room_status().await
    }

    async fn broadcast_room_status(&self) -> Result<(), RoomEventError> {
        let status = self.room_service.room_snapshot().await;
        MessageBroadcaster::broadcast_to_all(
            &self.connection_manager,
            &WebSocketMessage::room_status(&status),
        )
        .await
    }
}
