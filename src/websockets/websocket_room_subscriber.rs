use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::{
    event::{RoomEvent, RoomEventError, RoomEventHandler},
    room::RoomService,
    websockets::connection_manager::ConnectionManager,
};

use super::event_handlers::{AgreementEventHandlers, RelayEventHandlers, RoomEventHandlers};

/// WebSocket-specific room event handler
///
/// Handles room events by delegating to specialized event handlers:
/// - RoomEventHandlers: ProfileSubmitted
/// - RelayEventHandlers: TopicSubmitted, DrawReceived, ResultReceived
/// - AgreementEventHandlers: AgreementRequested (finish and rematch)
pub struct WebSocketRoomSubscriber {
    room_handlers: RoomEventHandlers,
    relay_handlers: RelayEventHandlers,
    agreement_handlers: AgreementEventHandlers,
}

#[async_trait]
impl RoomEventHandler for WebSocketRoomSubscriber {
    async fn handle_room_event(
        &self,
        room_name: &str,
        event: RoomEvent,
    ) -> Result<(), RoomEventError> {
        debug!(
            room = %room_name,
            event_type = event.event_type(),
            sender = %event.sender(),
            "Handling room event for WebSocket connections"
        );

        match event {
            RoomEvent::ProfileSubmitted {
                participant,
                name,
                icon,
            } => {
                self.room_handlers
                    .handle_profile_submitted(room_name, &participant, name, icon)
                    .await
            }
            RoomEvent::TopicSubmitted { sender, topic } => {
                self.relay_handlers
                    .handle_topic(room_name, &sender, &topic)
                    .await
            }
            RoomEvent::DrawReceived { sender, payload } => {
                self.relay_handlers
                    .handle_draw(room_name, &sender, payload)
                    .await
            }
            RoomEvent::ResultReceived { sender, payload } => {
                self.relay_handlers
                    .handle_result(room_name, &sender, payload)
                    .await
            }
            RoomEvent::AgreementRequested { participant, kind } => {
                self.agreement_handlers
                    .handle_agreement_requested(room_name, &participant, kind)
                    .await
            }
        }
    }

    fn handler_name(&self) -> &'static str {
        "WebSocketRoomSubscriber"
    }
}

impl WebSocketRoomSubscriber {
    pub fn new(room_service: Arc<RoomService>, connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self {
            room_handlers: RoomEventHandlers::new(
                Arc::clone(&room_service),
                Arc::clone(&connection_manager),
            ),
            relay_handlers: RelayEventHandlers::new(
                Arc::clone(&room_service),
                Arc::clone(&connection_manager),
            ),
            agreement_handlers: AgreementEventHandlers::new(room_service, connection_manager),
        }
    }
}
