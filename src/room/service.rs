use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    agreement::{AgreementState, EpisodeKind},
    models::{Participant, RoomModel, ROOM_CAPACITY},
    readiness::ReadinessCoordinator,
    repository::{RoomGuard, RoomRepository},
    types::{AgreementOutcome, JoinOutcome, LeaveOutcome, ProfileOutcome, RoomError, RoomStatus},
};
use crate::websockets::ConnectionManager;

/// Service for room membership, profiles and agreements.
///
/// Every operation that mutates a room does so while holding that room's
/// lock, and evaluates readiness before releasing it.
pub struct RoomService {
    repository: Arc<dyn RoomRepository + Send + Sync>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl RoomService {
    pub fn new(
        repository: Arc<dyn RoomRepository + Send + Sync>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            repository,
            connection_manager,
        }
    }

    pub fn room_names(&self) -> Vec<String> {
        self.repository.room_names()
    }

    pub fn has_room(&self, room_name: &str) -> bool {
        self.repository.has_room(room_name)
    }

    /// Occupancy of every configured room
    pub async fn room_snapshot(&self) -> RoomStatus {
        self.repository.snapshot().await
    }

    pub async fn room_of(&self, participant_id: &str) -> Option<String> {
        self.repository.find_room_of(participant_id).await
    }

    /// Puts a participant into a room, moving it out of its previous room.
    ///
    /// Joining a room the participant already occupies changes nothing.
    #[instrument(skip(self, participant), fields(participant_id = %participant.id))]
    pub async fn join_room(
        &self,
        participant: Participant,
        room_name: &str,
    ) -> Result<JoinOutcome, RoomError> {
        if !self.repository.has_room(room_name) {
            return Err(RoomError::UnknownRoom(room_name.to_string()));
        }

        if !self.connection_manager.is_alive(&participant.id).await {
            return Err(RoomError::StaleIdentity(participant.id));
        }

        let purged = self.purge_stale_members_everywhere().await;
        if purged > 0 {
            debug!(purged = purged, "Swept stale members before join");
        }

        let current_room = self.repository.find_room_of(&participant.id).await;
        if current_room.as_deref() == Some(room_name) {
            debug!(room = %room_name, "Participant already in room");
            return Ok(JoinOutcome::AlreadyMember);
        }

        let (mut target, previous) = match current_room.as_deref() {
            Some(previous_name) => {
                let (target, previous) = self
                    .repository
                    .lock_pair(room_name, previous_name)
                    .await
                    .ok_or_else(|| RoomError::UnknownRoom(room_name.to_string()))?;
                (target, Some(previous))
            }
            None => {
                let target = self
                    .repository
                    .lock_room(room_name)
                    .await
                    .ok_or_else(|| RoomError::UnknownRoom(room_name.to_string()))?;
                (target, None)
            }
        };

        if target.has_member(&participant.id) {
            return Ok(JoinOutcome::AlreadyMember);
        }

        self.purge_stale_members(&mut target).await;
        if target.is_full() {
            debug!(
                room = %room_name,
                members = target.member_count(),
                "Room is full"
            );
            return Err(RoomError::RoomFull(room_name.to_string()));
        }

        let previous_room = previous.and_then(|mut previous| {
            previous
                .remove_member(&participant.id)
                .map(|_| previous.name().to_string())
        });

        let participant_id = participant.id.clone();
        target.add_member(participant);

        let ready = if target.member_count() == ROOM_CAPACITY {
            ReadinessCoordinator::evaluate(&mut target)
        } else {
            None
        };

        info!(
            room = %room_name,
            participant_id = %participant_id,
            previous_room = ?previous_room,
            members = target.member_count(),
            ready = ready.is_some(),
            "Participant joined room"
        );

        Ok(JoinOutcome::Joined {
            room: room_name.to_string(),
            members: target.member_ids(),
            previous_room,
            ready,
        })
    }

    /// Removes a participant from whichever room holds it, together with
    /// its agreement entries.
    #[instrument(skip(self))]
    pub async fn leave_room(&self, participant_id: &str) -> Result<LeaveOutcome, RoomError> {
        let not_a_member = || RoomError::NotAMember {
            participant: participant_id.to_string(),
            room: "any room".to_string(),
        };

        let room_name = self
            .repository
            .find_room_of(participant_id)
            .await
            .ok_or_else(not_a_member)?;

        let mut room = self
            .repository
            .lock_room(&room_name)
            .await
            .ok_or_else(|| RoomError::UnknownRoom(room_name.clone()))?;

        room.remove_member(participant_id).ok_or_else(not_a_member)?;

        info!(
            room = %room_name,
            participant_id = %participant_id,
            remaining = room.member_count(),
            "Participant left room"
        );

        Ok(LeaveOutcome {
            room: room_name,
            remaining: room.member_ids(),
        })
    }

    /// Records name and icon for a member and re-evaluates readiness
    #[instrument(skip(self, name, icon))]
    pub async fn set_profile(
        &self,
        participant_id: &str,
        room_name: &str,
        name: Option<String>,
        icon: Option<String>,
    ) -> Result<ProfileOutcome, RoomError> {
        let mut room = self.lock_existing(room_name).await?;

        let changed = room
            .member_mut(participant_id)
            .ok_or_else(|| RoomError::NotAMember {
                participant: participant_id.to_string(),
                room: room_name.to_string(),
            })?
            .update_profile(name, icon);

        self.purge_stale_members(&mut room).await;
        let ready = ReadinessCoordinator::evaluate(&mut room);

        debug!(
            room = %room_name,
            participant_id = %participant_id,
            changed = changed,
            ready = ready.is_some(),
            "Profile recorded"
        );

        Ok(ProfileOutcome { changed, ready })
    }

    /// Records an opt-in for a finish or rematch episode.
    ///
    /// A completed rematch starts a new pairing episode and re-evaluates
    /// readiness so the room is announced again.
    #[instrument(skip(self))]
    pub async fn record_agreement(
        &self,
        kind: EpisodeKind,
        participant_id: &str,
        room_name: &str,
    ) -> Result<AgreementOutcome, RoomError> {
        let mut room = self.lock_existing(room_name).await?;

        let state = room
            .record_agreement(kind, participant_id)
            .ok_or_else(|| RoomError::NotAMember {
                participant: participant_id.to_string(),
                room: room_name.to_string(),
            })?;

        let ready = if kind == EpisodeKind::Rematch && state == AgreementState::BothAgreed {
            self.purge_stale_members(&mut room).await;
            room.start_new_episode();
            ReadinessCoordinator::evaluate(&mut room)
        } else {
            None
        };

        info!(
            room = %room_name,
            participant_id = %participant_id,
            kind = %kind,
            state = ?state,
            "Agreement recorded"
        );

        Ok(AgreementOutcome {
            kind,
            state,
            members: room.member_ids(),
            ready,
        })
    }

    /// Current members of a room, provided the sender is one of them
    pub async fn members_for_sender(
        &self,
        sender_id: &str,
        room_name: &str,
    ) -> Result<Vec<String>, RoomError> {
        let room = self.lock_existing(room_name).await?;
        if !room.has_member(sender_id) {
            return Err(RoomError::NotAMember {
                participant: sender_id.to_string(),
                room: room_name.to_string(),
            });
        }
        Ok(room.member_ids())
    }

    async fn lock_existing(
        &self,
        room_name: &str,
    ) -> Result<RoomGuard, RoomError> {
        self.repository
            .lock_room(room_name)
            .await
            .ok_or_else(|| RoomError::UnknownRoom(room_name.to_string()))
    }

    /// Sweeps every room for dead members, one room lock at a time
    async fn purge_stale_members_everywhere(&self) -> usize {
        let mut purged = 0;
        for room_name in self.repository.room_names() {
            if let Some(mut room) = self.repository.lock_room(&room_name).await {
                purged += self.purge_stale_members(&mut room).await;
            }
        }
        purged
    }

    /// Drops members whose connection is gone
    async fn purge_stale_members(&self, room: &mut RoomModel) -> usize {
        let mut stale = Vec::new();
        for id in room.member_ids() {
            if !self.connection_manager.is_alive(&id).await {
                stale.push(id);
            }
        }

        if stale.is_empty() {
            return 0;
        }

        debug!(room = %room.name(), stale = ?stale, "Purging stale members");
        room.purge(&stale)
    }
}
