use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::models::{RoomModel, ROOM_CAPACITY};

/// Announcement that a room has two members with complete profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomReady {
    pub room: String,
    /// First member by arrival order; picks the topic
    pub host_id: String,
    pub names: HashMap<String, String>,
    pub icons: HashMap<String, String>,
}

/// Decides when a room becomes ready.
///
/// Evaluation is triggered by whatever could change the outcome (a join, a
/// profile write, a completed rematch) and runs under the room's lock, so
/// the announcement is produced at most once per pairing episode.
pub struct ReadinessCoordinator;

impl ReadinessCoordinator {
    /// Membership is at capacity and every member has a name and an icon
    pub fn is_ready(room: &RoomModel) -> bool {
        room.member_count() == ROOM_CAPACITY && room.members().iter().all(|m| m.has_profile())
    }

    /// Returns the announcement if the room just became ready, marking the
    /// current episode as announced.
    pub fn evaluate(room: &mut RoomModel) -> Option<RoomReady> {
        if room.ready_announced() {
            debug!(room = %room.name(), "Room ready already announced for this episode");
            return None;
        }

        if !Self::is_ready(room) {
            debug!(
                room = %room.name(),
                members = room.member_count(),
                "Room not ready yet"
            );
            return None;
        }

        let host_id = room.host_id()?.to_string();
        let mut names = HashMap::new();
        let mut icons = HashMap::new();
        for member in room.members() {
            if let (Some(name), Some(icon)) = (&member.name, &member.icon) {
                names.insert(member.id.clone(), name.clone());
                icons.insert(member.id.clone(), icon.clone());
            }
        }

        room.mark_ready_announced();

        Some(RoomReady {
            room: room.name().to_string(),
            host_id,
            names,
            icons,
        })
    }
}
