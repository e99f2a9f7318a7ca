#![allow(dead_code)]

use serde_json::{json, Value};
use tokio::time::{sleep, Duration};

use drawduel::websockets::{ConnectionManager, MessageHandler, MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Send a WebSocket message and wait for processing
    pub async fn send_message(&self, connection_id: &str, message: WebSocketMessage) {
        let message_json = serde_json::to_string(&message).unwrap();
        self.send_raw(connection_id, message_json).await;
    }

    /// Send an arbitrary text frame and wait for processing
    pub async fn send_raw(&self, connection_id: &str, frame: String) {
        self.input_handler.handle_message(connection_id, frame).await;
        sleep(Duration::from_millis(10)).await;
    }

    /// Send frames back to back without yielding in between, then wait once
    pub async fn send_burst(&self, connection_id: &str, frames: Vec<String>) {
        for frame in frames {
            self.input_handler.handle_message(connection_id, frame).await;
        }
        sleep(Duration::from_millis(50)).await;
    }

    /// Clear all recorded messages
    pub async fn clear_messages(&self) {
        self.mock_conn_manager.clear_messages().await;
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn get_rooms(&self, player: &str) {
        self.send_message(player, WebSocketMessage::new(MessageType::GetRooms, Value::Null))
            .await;
    }

    /// Join with a complete profile
    pub async fn join(&self, player: &str, room: &str, name: &str, icon: &str) {
        self.send_message(
            player,
            WebSocketMessage::new(
                MessageType::JoinRoom,
                json!({ "roomName": room, "name": name, "icon": icon }),
            ),
        )
        .await;
    }

    /// Join without name or icon
    pub async fn join_without_profile(&self, player: &str, room: &str) {
        self.send_message(
            player,
            WebSocketMessage::new(MessageType::JoinRoom, json!({ "roomName": room })),
        )
        .await;
    }

    pub async fn set_profile(&self, player: &str, room: &str, name: &str, icon: &str) {
        self.send_message(
            player,
            WebSocketMessage::new(
                MessageType::SetProfile,
                json!({ "room": room, "name": name, "icon": icon }),
            ),
        )
        .await;
    }

    pub async fn leave(&self, player: &str) {
        self.send_message(player, WebSocketMessage::new(MessageType::LeaveRoom, json!({})))
            .await;
    }

    pub async fn send_topic(&self, player: &str, room: &str, topic: &str) {
        self.send_message(
            player,
            WebSocketMessage::new(MessageType::SendTopic, json!({ "room": room, "topic": topic })),
        )
        .await;
    }

    /// Draw payloads are opaque apart from the room field
    pub async fn draw(&self, player: &str, payload: Value) {
        self.send_message(player, WebSocketMessage::new(MessageType::Draw, payload))
            .await;
    }

    pub async fn send_result(&self, player: &str, payload: Value) {
        self.send_message(player, WebSocketMessage::new(MessageType::Result, payload))
            .await;
    }

    pub async fn finish(&self, player: &str, room: &str) {
        self.send_message(player, WebSocketMessage::new(MessageType::FinishRequest, json!(room)))
            .await;
    }

    pub async fn rematch(&self, player: &str, room: &str) {
        self.send_message(player, WebSocketMessage::new(MessageType::RematchRequest, json!(room)))
            .await;
    }

    /// Mirrors transport close: the connection goes first, then its room
    pub async fn disconnect(&self, player: &str) {
        self.mock_conn_manager.remove_connection(player).await;
        self.connection_handlers.handle_disconnect(player).await.unwrap();
        sleep(Duration::from_millis(10)).await;
    }

    /// Registers a new live connection
    pub async fn connect(&self, player: &str) {
        self.mock_conn_manager.add_connected_player(player).await;
    }
}
