use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::events::RoomEvent;

/// Event bus queueing room events for each room's worker
///
/// Every configured room gets one bounded queue. Senders wait for space
/// when a queue is full, so no event is ever dropped while the room's
/// worker is running. Events addressed to any other room are dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    /// Room name -> queue sender
    senders: Arc<HashMap<String, mpsc::Sender<RoomEvent>>>,
    /// Receivers not yet claimed by a worker
    receivers: Arc<Mutex<HashMap<String, mpsc::Receiver<RoomEvent>>>>,
}

impl EventBus {
    /// Creates one queue per room, each holding up to `capacity` events
    pub fn new<I, S>(room_names: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut senders = HashMap::new();
        let mut receivers = HashMap::new();
        for name in room_names {
            let name = name.into();
            let (sender, receiver) = mpsc::channel(capacity.max(1));
            senders.insert(name.clone(), sender);
            receivers.insert(name, receiver);
        }

        Self {
            senders: Arc::new(senders),
            receivers: Arc::new(Mutex::new(receivers)),
        }
    }

    pub fn has_room(&self, room: &str) -> bool {
        self.senders.contains_key(room)
    }

    /// Queues an event for the room's worker, waiting while the queue is full.
    /// Returns false if the room is unknown or its worker is gone.
    pub async fn emit_to_room(&self, room: &str, event: RoomEvent) -> bool {
        let Some(sender) = self.senders.get(room) else {
            debug!(room = %room, event_type = event.event_type(), "Dropping event for unknown room");
            return false;
        };

        match sender.send(event).await {
            Ok(()) => {
                debug!(room = %room, "Room event queued");
                true
            }
            Err(mpsc::error::SendError(event)) => {
                warn!(
                    room = %room,
                    event_type = event.event_type(),
                    "Room worker stopped, event dropped"
                );
                false
            }
        }
    }

    /// Hands out the room's receiving end. Each room has exactly one
    /// consumer, so only the first call for a room returns it.
    pub fn take_room_receiver(&self, room: &str) -> Option<mpsc::Receiver<RoomEvent>> {
        self.receivers
            .lock()
            .ok()
            .and_then(|mut receivers| receivers.remove(room))
    }
}
