use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, instrument};

use super::models::RoomModel;
use super::types::RoomStatus;

/// Exclusive access to one room's aggregate
pub type RoomGuard = OwnedMutexGuard<RoomModel>;

/// Trait for room storage.
///
/// Every room has its own lock so independent rooms never contend. The set
/// of rooms is fixed when the repository is created.
#[async_trait]
pub trait RoomRepository {
    /// Configured room names, in reporting order
    fn room_names(&self) -> Vec<String>;

    fn has_room(&self, room_name: &str) -> bool;

    async fn lock_room(&self, room_name: &str) -> Option<RoomGuard>;

    /// Locks two distinct rooms, always acquiring them in configured order.
    /// Guards are returned in argument order.
    async fn lock_pair(&self, first: &str, second: &str) -> Option<(RoomGuard, RoomGuard)>;

    /// Occupancy of every configured room
    async fn snapshot(&self) -> RoomStatus {
        let mut status = RoomStatus::new();
        for name in self.room_names() {
            if let Some(room) = self.lock_room(&name).await {
                status.insert(name, room.member_count());
            }
        }
        status
    }

    /// Name of the room currently listing the participant
    async fn find_room_of(&self, participant_id: &str) -> Option<String> {
        for name in self.room_names() {
            if let Some(room) = self.lock_room(&name).await {
                if room.has_member(participant_id) {
                    return Some(name);
                }
            }
        }
        None
    }
}

/// In-memory implementation of RoomRepository; state lives for the process
pub struct InMemoryRoomRepository {
    names: Vec<String>,
    rooms: HashMap<String, Arc<Mutex<RoomModel>>>,
}

impl InMemoryRoomRepository {
    /// Creates one empty room per name. Duplicate names collapse into one room.
    pub fn new<I, S>(room_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names = Vec::new();
        let mut rooms = HashMap::new();
        for name in room_names {
            let name = name.into();
            if rooms.contains_key(&name) {
                continue;
            }
            rooms.insert(name.clone(), Arc::new(Mutex::new(RoomModel::new(name.clone()))));
            names.push(name);
        }

        debug!(room_count = names.len(), "Created in-memory room repository");
        Self { names, rooms }
    }

    fn position(&self, room_name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == room_name)
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    fn room_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn has_room(&self, room_name: &str) -> bool {
        self.rooms.contains_key(room_name)
    }

    async fn lock_room(&self, room_name: &str) -> Option<RoomGuard> {
        let room = self.rooms.get(room_name)?;
        Some(Arc::clone(room).lock_owned().await)
    }

    #[instrument(skip(self))]
    async fn lock_pair(&self, first: &str, second: &str) -> Option<(RoomGuard, RoomGuard)> {
        if first == second {
            debug!("Refusing to lock the same room twice");
            return None;
        }

        let first_pos = self.position(first)?;
        let second_pos = self.position(second)?;

        if first_pos < second_pos {
            let a = self.lock_room(first).await?;
            let b = self.lock_room(second).await?;
            Some((a, b))
        } else {
            let b = self.lock_room(second).await?;
            let a = self.lock_room(first).await?;
            Some((a, b))
        }
    }
}
