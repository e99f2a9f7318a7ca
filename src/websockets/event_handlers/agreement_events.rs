use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    event::RoomEventError,
    room::{AgreementState, EpisodeKind, RoomService},
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};

use super::shared::MessageBroadcaster;

/// Handlers for the two-party finish and rematch agreements
pub struct AgreementEventHandlers {
    room_service: Arc<RoomService>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl AgreementEventHandlers {
    pub fn new(room_service: Arc<RoomService>, connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self {
            room_service,
            connection_manager,
        }
    }

    /// First opt-in notifies the other member. The second one completes
    /// the episode: finish sends RESULT_READY to both, rematch announces
    /// the room as ready again.
    pub async fn handle_agreement_requested(
        &self,
        room_name: &str,
        participant_id: &str,
        kind: EpisodeKind,
    ) -> Result<(), RoomEventError> {
        let outcome = match self
            .room_service
            .record_agreement(kind, participant_id, room_name)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(
                    room = %room_name,
                    kind = %kind,
                    error = %e,
                    "Agreement request rejected"
                );
                return Ok(());
            }
        };

        match (outcome.state, kind) {
            (AgreementState::Waiting, _) => {
                MessageBroadcaster::broadcast_to_others(
                    &self.connection_manager,
                    &outcome.members,
                    participant_id,
                    &WebSocketMessage::agreement_notice(kind),
                )
                .await?;
            }
            (AgreementState::BothAgreed, EpisodeKind::Finish) => {
                info!(room = %room_name, "Both members finished, results ready");
                MessageBroadcaster::broadcast_to_players(
                    &self.connection_manager,
                    &outcome.members,
                    &WebSocketMessage::result_ready(),
                )
                .await?;
            }
            (AgreementState::BothAgreed, EpisodeKind::Rematch) => {
                info!(room = %room_name, "Both members agreed to a rematch");
                if let Some(ready) = outcome.ready {
                    MessageBroadcaster::announce_room_ready(&self.connection_manager, &ready)
                        .await?;
                }
            }
        }

        Ok(())
    }
}
