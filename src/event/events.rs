use serde::{Deserialize, Serialize};

use crate::room::EpisodeKind;

/// Events addressed to a single room
///
/// Each one is a request from a connection that still has to be checked
/// against the room's current membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RoomEvent {
    /// A member sent its display name and/or icon
    ProfileSubmitted {
        participant: String,
        name: Option<String>,
        icon: Option<String>,
    },

    /// The host picked a topic for the round
    TopicSubmitted { sender: String, topic: String },

    /// Opaque drawing event (line segment, clear marker, ...)
    DrawReceived {
        sender: String,
        payload: serde_json::Value,
    },

    /// Opaque judgement result from a client's classifier
    ResultReceived {
        sender: String,
        payload: serde_json::Value,
    },

    /// A member opted into finishing or replaying the round
    AgreementRequested {
        participant: String,
        kind: EpisodeKind,
    },
}

impl RoomEvent {
    /// Get a human-readable description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            RoomEvent::ProfileSubmitted { .. } => "profile_submitted",
            RoomEvent::TopicSubmitted { .. } => "topic_submitted",
            RoomEvent::DrawReceived { .. } => "draw_received",
            RoomEvent::ResultReceived { .. } => "result_received",
            RoomEvent::AgreementRequested { .. } => "agreement_requested",
        }
    }

    /// Connection that caused the event
    pub fn sender(&self) -> &str {
        match self {
            RoomEvent::ProfileSubmitted { participant, .. } => participant,
            RoomEvent::TopicSubmitted { sender, .. } => sender,
            RoomEvent::DrawReceived { sender, .. } => sender,
            RoomEvent::ResultReceived { sender, .. } => sender,
            RoomEvent::AgreementRequested { participant, .. } => participant,
        }
    }
}
