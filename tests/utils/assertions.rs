//! Test assertion helpers - fluent API for verifying test expectations
#![allow(dead_code)] // Test utilities may not all be used in every test

use serde_json::Value;

use drawduel::websockets::{MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct MessageAssertion<'a> {
    setup: &'a TestSetup,
    players: Vec<&'a str>,
}

impl<'a> MessageAssertion<'a> {
    /// Create an assertion for all players in the setup
    pub fn for_all_players(setup: &'a TestSetup) -> Self {
        let players = setup.players.iter().map(|s| s.as_str()).collect();
        Self { setup, players }
    }

    /// Create an assertion for specific players
    pub fn for_players(setup: &'a TestSetup, players: Vec<&'a str>) -> Self {
        Self { setup, players }
    }

    /// Assert that players received a specific message type (consumes the message from queue)
    pub async fn received_message_type(self, expected_type: MessageType) -> MessageContent {
        let mut messages = vec![];

        for player in &self.players {
            let message = self
                .setup
                .mock_conn_manager
                .consume_message_for(player)
                .await;
            assert!(
                message.is_some(),
                "{} should have received {:?}",
                player,
                expected_type
            );

            let msg: WebSocketMessage = serde_json::from_str(&message.unwrap()).unwrap();
            assert_eq!(
                msg.message_type, expected_type,
                "{} received wrong message type",
                player
            );
            messages.push(msg);
        }

        // Everyone addressed by one event sees the same payload
        for (i, msg) in messages.iter().enumerate().skip(1) {
            assert_eq!(
                msg.payload, messages[0].payload,
                "{} payload differs from {}",
                self.players[i], self.players[0]
            );
        }

        let first = messages.remove(0);
        MessageContent {
            payload: first.payload,
            sender_id: first.meta.and_then(|m| m.sender_id),
        }
    }

    /// Assert that players have no pending messages
    pub async fn received_no_messages(self) {
        for player in &self.players {
            let messages = self.setup.mock_conn_manager.get_messages_for(player).await;
            assert!(
                messages.is_empty(),
                "{} should not have received any messages, got {:?}",
                player,
                messages
            );
        }
    }

    /// Count how many messages of a specific type a player has pending (non-consuming)
    pub async fn count_message_type(&self, player: &str, msg_type: MessageType) -> usize {
        let messages = self.setup.mock_conn_manager.get_messages_for(player).await;
        messages
            .iter()
            .filter_map(|msg_str| serde_json::from_str::<WebSocketMessage>(msg_str).ok())
            .filter(|msg| msg.message_type == msg_type)
            .count()
    }
}

// ============================================================================
// Message Content Assertions
// ============================================================================

pub struct MessageContent {
    pub payload: Value,
    pub sender_id: Option<String>,
}

impl MessageContent {
    /// Assert a room_status payload reports the given occupancy
    pub fn with_room_count(self, room: &str, expected: u64) -> Self {
        assert_eq!(self.payload[room], expected, "occupancy of {}", room);
        self
    }

    pub fn with_room(self, expected_room: &str) -> Self {
        assert_eq!(self.payload["room"], expected_room);
        self
    }

    pub fn with_host(self, expected_host: &str) -> Self {
        assert_eq!(self.payload["hostId"], expected_host);
        self
    }

    pub fn with_profile(self, player: &str, name: &str, icon: &str) -> Self {
        assert_eq!(self.payload["names"][player], name);
        assert_eq!(self.payload["icons"][player], icon);
        self
    }

    /// Assert the message was relayed from a specific connection
    pub fn with_sender(self, expected_sender: &str) -> Self {
        assert_eq!(self.sender_id.as_deref(), Some(expected_sender));
        self
    }

    pub fn with_payload(self, expected: Value) -> Self {
        assert_eq!(self.payload, expected);
        self
    }
}
