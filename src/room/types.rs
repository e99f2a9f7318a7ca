use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::agreement::{AgreementState, EpisodeKind};
use super::readiness::RoomReady;

/// Room name -> number of current members
pub type RoomStatus = BTreeMap<String, usize>;

/// Rejections raised by room operations. The protocol never reports these
/// to clients; callers log them and drop the request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoomError {
    #[error("Unknown room: {0}")]
    UnknownRoom(String),

    #[error("Room is full: {0}")]
    RoomFull(String),

    #[error("Participant {participant} is not a member of {room}")]
    NotAMember { participant: String, room: String },

    #[error("Connection is no longer live: {0}")]
    StaleIdentity(String),
}

/// Result of a successful join request
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcome {
    /// The participant was already in the room; nothing changed
    AlreadyMember,
    Joined {
        room: String,
        /// Members after the join, in arrival order
        members: Vec<String>,
        /// Room the participant was moved out of, if any
        previous_room: Option<String>,
        ready: Option<RoomReady>,
    },
}

/// Result of removing a participant from its room
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveOutcome {
    pub room: String,
    pub remaining: Vec<String>,
}

/// Result of recording a profile for a member
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileOutcome {
    pub changed: bool,
    pub ready: Option<RoomReady>,
}

/// Result of recording an opt-in for a finish or rematch episode
#[derive(Debug, Clone, PartialEq)]
pub struct AgreementOutcome {
    pub kind: EpisodeKind,
    pub state: AgreementState,
    /// Members at the time of recording
    pub members: Vec<String>,
    /// Set when a completed rematch made the room ready again
    pub ready: Option<RoomReady>,
}

/// Response for the single-room HTTP lookup
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RoomOccupancyResponse {
    pub room: String,
    pub count: usize,
}
