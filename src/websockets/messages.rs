use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::room::{EpisodeKind, RoomReady, RoomStatus};

/// Message types for WebSocket communication
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    // Client -> Server
    GetRooms,
    JoinRoom,
    SetProfile,
    LeaveRoom,
    SendTopic,
    FinishRequest,
    RematchRequest,

    // Both directions (relayed to the other member)
    Draw,
    Result,

    // Server -> Client
    Connected,
    RoomStatus,
    RoomReady,
    ReceiveTopic,
    FinishNotice,
    RematchNotice,
    ResultReady,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
    /// Connection that originated a relayed message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub meta: Option<WebSocketMessageMeta>,
}

/// Reads a string field, treating any other JSON type as absent so one bad
/// field does not discard its siblings
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Client-to-Server message payloads
///
/// Every field is optional and decoded on its own: a missing or mistyped
/// field reads as absent, and a request lacking what it needs is dropped,
/// never answered with an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub room_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub room: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub room: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub topic: Option<String>,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectedPayload {
    pub id: String,
}

impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
                sender_id: None,
            }),
        }
    }

    /// Tags the message with the connection it is relayed from
    pub fn from_sender(mut self, sender_id: &str) -> Self {
        let meta = self.meta.get_or_insert_with(|| WebSocketMessageMeta {
            timestamp: Utc::now(),
            sender_id: None,
        });
        meta.sender_id = Some(sender_id.to_string());
        self
    }

    /// Decodes the payload into a typed struct; a payload that is not an
    /// object reads as all fields absent.
    pub fn payload_as<T>(&self) -> T
    where
        T: serde::de::DeserializeOwned + Default,
    {
        serde_json::from_value(self.payload.clone()).unwrap_or_default()
    }

    /// Room named by the payload: either the payload itself is the room
    /// name, or it is an object with a `room` (or `roomName`) field.
    pub fn room_name(&self) -> Option<String> {
        match &self.payload {
            Value::String(room) => Some(room.clone()),
            Value::Object(map) => map
                .get("room")
                .or_else(|| map.get("roomName"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        }
        .filter(|room| !room.is_empty())
    }

    /// Create a CONNECTED message
    pub fn connected(id: String) -> Self {
        let payload = ConnectedPayload { id };
        Self::new(
            MessageType::Connected,
            serde_json::to_value(payload).unwrap_or_default(),
        )
    }

    /// Create a ROOM_STATUS message
    pub fn room_status(status: &RoomStatus) -> Self {
        Self::new(
            MessageType::RoomStatus,
            serde_json::to_value(status).unwrap_or_default(),
        )
    }

    /// Create a ROOM_READY message
    pub fn room_ready(ready: &RoomReady) -> Self {
        Self::new(
            MessageType::RoomReady,
            serde_json::to_value(ready).unwrap_or_default(),
        )
    }

    /// Create a RECEIVE_TOPIC message; the payload is the bare topic string
    pub fn receive_topic(topic: String) -> Self {
        Self::new(MessageType::ReceiveTopic, Value::String(topic))
    }

    /// Create a DRAW message carrying the sender's payload unchanged
    pub fn draw(payload: Value) -> Self {
        Self::new(MessageType::Draw, payload)
    }

    /// Create a RESULT message carrying the sender's payload unchanged
    pub fn result(payload: Value) -> Self {
        Self::new(MessageType::Result, payload)
    }

    /// Notice telling the other member that one side opted in
    pub fn agreement_notice(kind: EpisodeKind) -> Self {
        let message_type = match kind {
            EpisodeKind::Finish => MessageType::FinishNotice,
            EpisodeKind::Rematch => MessageType::RematchNotice,
        };
        Self::new(message_type, json!({}))
    }

    /// Create a RESULT_READY message
    pub fn result_ready() -> Self {
        Self::new(MessageType::ResultReady, json!({}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_message_types_use_snake_case_names() {
        let m = WebSocketMessage::agreement_notice(EpisodeKind::Finish);
        let s = serde_json::to_value(&m).unwrap();
        assert_eq!(s["type"], "finish_notice");

        let m = WebSocketMessage::agreement_notice(EpisodeKind::Rematch);
        assert_eq!(m.message_type, MessageType::RematchNotice);

        let back: WebSocketMessage =
            serde_json::from_str(r#"{"type":"get_rooms"}"#).unwrap();
        assert_eq!(back.message_type, MessageType::GetRooms);
        assert!(back.payload.is_null());
        assert!(back.meta.is_none());
    }

    #[test]
    fn test_room_ready_payload_shape() {
        let ready = RoomReady {
            room: "room1".to_string(),
            host_id: "p1".to_string(),
            names: HashMap::from([("p1".to_string(), "Al".to_string())]),
            icons: HashMap::from([("p1".to_string(), "🐱".to_string())]),
        };

        let m = WebSocketMessage::room_ready(&ready);

        assert_eq!(m.payload["room"], "room1");
        assert_eq!(m.payload["hostId"], "p1");
        assert_eq!(m.payload["names"]["p1"], "Al");
        assert_eq!(m.payload["icons"]["p1"], "🐱");
    }

    #[test]
    fn test_room_status_payload_is_plain_mapping() {
        let status = RoomStatus::from([("room1".to_string(), 2), ("room2".to_string(), 0)]);

        let m = WebSocketMessage::room_status(&status);

        assert_eq!(m.payload, json!({ "room1": 2, "room2": 0 }));
    }

    #[test]
    fn test_room_name_accepts_string_or_object() {
        let bare = WebSocketMessage::new(MessageType::FinishRequest, json!("room1"));
        let object = WebSocketMessage::new(MessageType::Draw, json!({ "room": "room2" }));
        let join = WebSocketMessage::new(MessageType::JoinRoom, json!({ "roomName": "room3" }));
        let missing = WebSocketMessage::new(MessageType::Draw, json!({ "type": "clear" }));
        let wrong_type = WebSocketMessage::new(MessageType::Draw, json!({ "room": 7 }));
        let empty = WebSocketMessage::new(MessageType::FinishRequest, json!(""));

        assert_eq!(bare.room_name().as_deref(), Some("room1"));
        assert_eq!(object.room_name().as_deref(), Some("room2"));
        assert_eq!(join.room_name().as_deref(), Some("room3"));
        assert_eq!(missing.room_name(), None);
        assert_eq!(wrong_type.room_name(), None);
        assert_eq!(empty.room_name(), None);
    }

    #[test]
    fn test_malformed_payload_reads_as_absent_fields() {
        let m = WebSocketMessage::new(MessageType::SendTopic, json!({ "room": 1, "topic": true }));
        let payload: TopicPayload = m.payload_as();
        assert!(payload.room.is_none());
        assert!(payload.topic.is_none());

        let m = WebSocketMessage::new(
            MessageType::JoinRoom,
            json!({ "roomName": "room1", "name": "Al" }),
        );
        let payload: JoinRoomPayload = m.payload_as();
        assert_eq!(payload.room_name.as_deref(), Some("room1"));
        assert_eq!(payload.name.as_deref(), Some("Al"));
        assert!(payload.icon.is_none());
    }

    #[test]
    fn test_mistyped_field_keeps_its_siblings() {
        let m = WebSocketMessage::new(
            MessageType::JoinRoom,
            json!({ "roomName": "room1", "name": 5, "icon": "🐱" }),
        );
        let payload: JoinRoomPayload = m.payload_as();
        assert_eq!(payload.room_name.as_deref(), Some("room1"));
        assert!(payload.name.is_none());
        assert_eq!(payload.icon.as_deref(), Some("🐱"));

        let m = WebSocketMessage::new(
            MessageType::SetProfile,
            json!({ "room": "room2", "name": "Bo", "icon": null }),
        );
        let payload: ProfilePayload = m.payload_as();
        assert_eq!(payload.room.as_deref(), Some("room2"));
        assert_eq!(payload.name.as_deref(), Some("Bo"));
        assert!(payload.icon.is_none());

        let m = WebSocketMessage::new(
            MessageType::SendTopic,
            json!({ "room": "room1", "topic": ["cat"] }),
        );
        let payload: TopicPayload = m.payload_as();
        assert_eq!(payload.room.as_deref(), Some("room1"));
        assert!(payload.topic.is_none());
    }

    #[test]
    fn test_relayed_messages_carry_sender() {
        let m = WebSocketMessage::draw(json!({ "room": "room1", "type": "clear" }))
            .from_sender("p1");

        assert_eq!(m.payload["type"], "clear");
        assert_eq!(m.meta.unwrap().sender_id.as_deref(), Some("p1"));
    }
}
