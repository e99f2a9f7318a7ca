use serde::{Deserialize, Serialize};

use super::agreement::{AgreementState, AgreementTracker, EpisodeKind};

/// Maximum number of participants in a room
pub const ROOM_CAPACITY: usize = 2;

/// A connected participant occupying a room slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Connection id, the participant's identity token
    pub id: String,
    pub name: Option<String>,
    pub icon: Option<String>,
}

impl Participant {
    /// Creates a participant; blank name or icon count as not yet provided
    pub fn new(id: impl Into<String>, name: Option<String>, icon: Option<String>) -> Self {
        Self {
            id: id.into(),
            name: non_blank(name),
            icon: non_blank(icon),
        }
    }

    /// Whether both display name and icon are present
    pub fn has_profile(&self) -> bool {
        self.name.is_some() && self.icon.is_some()
    }

    /// Overwrites the provided profile fields, ignoring blank values.
    /// Returns true if anything changed.
    pub fn update_profile(&mut self, name: Option<String>, icon: Option<String>) -> bool {
        let mut changed = false;
        if let Some(name) = non_blank(name) {
            changed |= self.name.as_deref() != Some(name.as_str());
            self.name = Some(name);
        }
        if let Some(icon) = non_blank(icon) {
            changed |= self.icon.as_deref() != Some(icon.as_str());
            self.icon = Some(icon);
        }
        changed
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Aggregate for one named room: ordered members, both agreement trackers
/// and the readiness flag of the current pairing episode.
#[derive(Debug, Clone)]
pub struct RoomModel {
    name: String,
    members: Vec<Participant>,
    rematch: AgreementTracker,
    finish: AgreementTracker,
    ready_announced: bool,
}

impl RoomModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::with_capacity(ROOM_CAPACITY),
            rematch: AgreementTracker::new(EpisodeKind::Rematch),
            finish: AgreementTracker::new(EpisodeKind::Finish),
            ready_announced: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in arrival order; the first one is the host
    pub fn members(&self) -> &[Participant] {
        &self.members
    }

    pub fn member_ids(&self) -> Vec<String> {
        self.members.iter().map(|m| m.id.clone()).collect()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= ROOM_CAPACITY
    }

    pub fn has_member(&self, participant_id: &str) -> bool {
        self.members.iter().any(|m| m.id == participant_id)
    }

    pub fn member_mut(&mut self, participant_id: &str) -> Option<&mut Participant> {
        self.members.iter_mut().find(|m| m.id == participant_id)
    }

    pub fn host_id(&self) -> Option<&str> {
        self.members.first().map(|m| m.id.as_str())
    }

    /// Appends a participant. Returns false if it is already a member or the
    /// room is full.
    pub fn add_member(&mut self, participant: Participant) -> bool {
        if self.has_member(&participant.id) || self.is_full() {
            return false;
        }
        self.members.push(participant);
        true
    }

    /// Removes a participant together with its agreement entries.
    /// Any membership change ends the current pairing episode.
    pub fn remove_member(&mut self, participant_id: &str) -> Option<Participant> {
        let index = self.members.iter().position(|m| m.id == participant_id)?;
        let removed = self.members.remove(index);
        self.rematch.remove(participant_id);
        self.finish.remove(participant_id);
        self.ready_announced = false;
        Some(removed)
    }

    /// Removes every listed identity that is a member; returns how many went
    pub fn purge(&mut self, participant_ids: &[String]) -> usize {
        participant_ids
            .iter()
            .filter(|id| self.remove_member(id).is_some())
            .count()
    }

    pub fn tracker(&self, kind: EpisodeKind) -> &AgreementTracker {
        match kind {
            EpisodeKind::Rematch => &self.rematch,
            EpisodeKind::Finish => &self.finish,
        }
    }

    /// Records an opt-in for a member. Returns None for non-members so stale
    /// identities can never count towards an agreement.
    pub fn record_agreement(
        &mut self,
        kind: EpisodeKind,
        participant_id: &str,
    ) -> Option<AgreementState> {
        if !self.has_member(participant_id) {
            return None;
        }
        let tracker = match kind {
            EpisodeKind::Rematch => &mut self.rematch,
            EpisodeKind::Finish => &mut self.finish,
        };
        Some(tracker.record(participant_id))
    }

    pub fn ready_announced(&self) -> bool {
        self.ready_announced
    }

    pub(crate) fn mark_ready_announced(&mut self) {
        self.ready_announced = true;
    }

    /// Starts a new pairing episode so readiness can be announced again
    pub fn start_new_episode(&mut self) {
        self.ready_announced = false;
    }
}
