use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::event::{EventBus, RoomEvent};
use crate::room::EpisodeKind;
use crate::shared::AppState;
use crate::websockets::messages::{
    JoinRoomPayload, MessageType, ProfilePayload, TopicPayload, WebSocketMessage,
};

use super::event_handlers::ConnectionEventHandlers;
use super::socket::{Connection, MessageHandler, SocketWrapper};

/// Message handler for receiving WebSocket messages from the client
///
/// Membership requests are handled inline on the connection's task. Every
/// other request names a room and is queued on that room's event channel.
pub struct WebsocketReceiveHandler {
    event_bus: EventBus,
    connection_handlers: Arc<ConnectionEventHandlers>,
}

impl WebsocketReceiveHandler {
    pub fn new(event_bus: EventBus, connection_handlers: Arc<ConnectionEventHandlers>) -> Self {
        Self {
            event_bus,
            connection_handlers,
        }
    }

    async fn emit(&self, connection_id: &str, room: &str, event: RoomEvent) {
        if !self.event_bus.emit_to_room(room, event).await {
            debug!(
                connection_id = %connection_id,
                room = %room,
                "Dropped room event"
            );
        }
    }

    fn missing_room(connection_id: &str, message_type: MessageType) {
        debug!(
            connection_id = %connection_id,
            message_type = ?message_type,
            "Dropped message without room"
        );
    }
}

#[async_trait]
impl MessageHandler for WebsocketReceiveHandler {
    async fn handle_message(&self, connection_id: &str, message: String) {
        debug!(
            connection_id = %connection_id,
            message = %message,
            "Received message"
        );

        let ws_message = match serde_json::from_str::<WebSocketMessage>(&message) {
            Ok(ws_message) => ws_message,
            Err(e) => {
                warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to parse WebSocket message"
                );
                return;
            }
        };

        let message_type = ws_message.message_type;
        let result = match message_type {
            MessageType::GetRooms => self.connection_handlers.handle_get_rooms(connection_id).await,
            MessageType::JoinRoom => {
                let payload: JoinRoomPayload = ws_message.payload_as();
                self.connection_handlers
                    .handle_join_request(connection_id, payload)
                    .await
            }
            MessageType::LeaveRoom => {
                self.connection_handlers
                    .handle_leave_request(connection_id)
                    .await
            }
            MessageType::SetProfile => {
                let payload: ProfilePayload = ws_message.payload_as();
                match payload.room.filter(|r| !r.is_empty()) {
                    Some(room) => self.emit(
                        connection_id,
                        &room,
                        RoomEvent::ProfileSubmitted {
                            participant: connection_id.to_string(),
                            name: payload.name,
                            icon: payload.icon,
                        },
                    )
                    .await,
                    None => Self::missing_room(connection_id, message_type),
                }
                Ok(())
            }
            MessageType::SendTopic => {
                let payload: TopicPayload = ws_message.payload_as();
                match (
                    payload.room.filter(|r| !r.is_empty()),
                    payload.topic.filter(|t| !t.is_empty()),
                ) {
                    (Some(room), Some(topic)) => self.emit(
                        connection_id,
                        &room,
                        RoomEvent::TopicSubmitted {
                            sender: connection_id.to_string(),
                            topic,
                        },
                    )
                    .await,
                    _ => Self::missing_room(connection_id, message_type),
                }
                Ok(())
            }
            MessageType::Draw | MessageType::Result => {
                match ws_message.room_name() {
                    Some(room) => {
                        let sender = connection_id.to_string();
                        let payload = ws_message.payload;
                        let event = if message_type == MessageType::Draw {
                            RoomEvent::DrawReceived { sender, payload }
                        } else {
                            RoomEvent::ResultReceived { sender, payload }
                        };
                        self.emit(connection_id, &room, event).await;
                    }
                    None => Self::missing_room(connection_id, message_type),
                }
                Ok(())
            }
            MessageType::FinishRequest | MessageType::RematchRequest => {
                let kind = if message_type == MessageType::FinishRequest {
                    EpisodeKind::Finish
                } else {
                    EpisodeKind::Rematch
                };
                match ws_message.room_name() {
                    Some(room) => self.emit(
                        connection_id,
                        &room,
                        RoomEvent::AgreementRequested {
                            participant: connection_id.to_string(),
                            kind,
                        },
                    )
                    .await,
                    None => Self::missing_room(connection_id, message_type),
                }
                Ok(())
            }
            _ => {
                debug!(
                    message_type = ?message_type,
                    "Unhandled message type"
                );
                Ok(())
            }
        };

        if let Err(e) = result {
            warn!(
                connection_id = %connection_id,
                message_type = ?message_type,
                error = %e,
                "Failed to handle message"
            );
        }
    }
}

/// WebSocket endpoint
/// GET /ws
pub async fn websocket_handler(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    info!("WebSocket connection requested");
    ws.on_upgrade(move |socket| handle_websocket_connection(Box::new(socket), app_state))
}

/// Drives one client connection from greeting to cleanup
pub async fn handle_websocket_connection(socket: Box<dyn SocketWrapper>, app_state: AppState) {
    let connection_id = Uuid::new_v4().to_string();

    info!(connection_id = %connection_id, "WebSocket connection established");

    // Create the outbound channel (app -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();

    app_state
        .connection_manager
        .add_connection(connection_id.clone(), outbound_sender.clone())
        .await;

    // Tell the client which id the server knows it by
    match serde_json::to_string(&WebSocketMessage::connected(connection_id.clone())) {
        Ok(greeting) => {
            let _ = outbound_sender.send(greeting);
        }
        Err(e) => warn!(connection_id = %connection_id, error = %e, "Failed to encode greeting"),
    }
    // Only the connection manager keeps a sender from here on
    drop(outbound_sender);

    let connection_handlers = Arc::new(ConnectionEventHandlers::new(
        Arc::clone(&app_state.room_service),
        Arc::clone(&app_state.connection_manager),
    ));
    let message_handler = Arc::new(WebsocketReceiveHandler::new(
        app_state.event_bus.clone(),
        Arc::clone(&connection_handlers),
    ));

    let connection = Connection::new(
        connection_id.clone(),
        socket,
        outbound_receiver,
        message_handler,
    );

    // Run the connection until disconnect
    match connection.run().await {
        Ok(()) => {
            info!(connection_id = %connection_id, "WebSocket connection closed cleanly");
        }
        Err(e) => {
            warn!(
                connection_id = %connection_id,
                error = ?e,
                "WebSocket connection error"
            );
        }
    }

    // Cleanup: the connection must be gone before its room is told
    app_state
        .connection_manager
        .remove_connection(&connection_id)
        .await;

    if let Err(e) = connection_handlers.handle_disconnect(&connection_id).await {
        warn!(
            connection_id = %connection_id,
            error = %e,
            "Failed to clean up after disconnect"
        );
    }

    info!(connection_id = %connection_id, "WebSocket disconnect handled");
}
