use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    event::RoomEventError,
    room::RoomService,
    websockets::connection_manager::ConnectionManager,
};

use super::shared::MessageBroadcaster;

/// Handlers for profile updates inside a room
pub struct RoomEventHandlers {
    room_service: Arc<RoomService>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl RoomEventHandlers {
    pub fn new(room_service: Arc<RoomService>, connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self {
            room_service,
            connection_manager,
        }
    }

    /// Records the member's profile; a profile that completes the pair
    /// triggers the ROOM_READY announcement.
    pub async fn handle_profile_submitted(
        &self,
        room_name: &str,
        participant_id: &str,
        name: Option<String>,
        icon: Option<String>,
    ) -> Result<(), RoomEventError> {
        debug!(
            room = %room_name,
            participant_id = %participant_id,
            "Handling profile submitted event"
        );

        let outcome = match self
            .room_service
            .set_profile(participant_id, room_name, name, icon)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(room = %room_name, error = %e, "Profile update rejected");
                return Ok(());
            }
        };

        if let Some(ready) = outcome.ready {
            info!(
                room = %ready.room,
                host_id = %ready.host_id,
                "Room ready after profile update"
            );
            MessageBroadcaster::announce_room_ready(&self.connection_manager, &ready).await?;
        }

        Ok(())
    }
}
