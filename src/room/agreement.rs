use serde::{Deserialize, Serialize};

/// The two kinds of two-party agreement a room tracks
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EpisodeKind {
    Rematch,
    Finish,
}

/// State of an agreement episode after a participant opted in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgreementState {
    /// One side has opted in; the other side is notified
    Waiting,
    /// Both sides opted in; the tracker has already been cleared
    BothAgreed,
}

/// Accumulates the participants of a room that opted into one episode.
///
/// Holds at most two identities. Reaching two completes the episode and
/// empties the tracker in the same call, so the next round starts fresh.
#[derive(Debug, Clone)]
pub struct AgreementTracker {
    kind: EpisodeKind,
    agreed: Vec<String>,
}

impl AgreementTracker {
    pub fn new(kind: EpisodeKind) -> Self {
        Self {
            kind,
            agreed: Vec::with_capacity(2),
        }
    }

    pub fn kind(&self) -> EpisodeKind {
        self.kind
    }

    /// Records an opt-in. Callers must only pass current room members.
    pub fn record(&mut self, participant_id: &str) -> AgreementState {
        if !self.contains(participant_id) {
            self.agreed.push(participant_id.to_string());
        }

        if self.agreed.len() >= 2 {
            self.agreed.clear();
            AgreementState::BothAgreed
        } else {
            AgreementState::Waiting
        }
    }

    pub fn remove(&mut self, participant_id: &str) {
        self.agreed.retain(|id| id != participant_id);
    }

    pub fn contains(&self, participant_id: &str) -> bool {
        self.agreed.iter().any(|id| id == participant_id)
    }

    pub fn len(&self) -> usize {
        self.agreed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agreed.is_empty()
    }
}
