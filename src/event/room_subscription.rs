use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{
    bus::EventBus,
    room_handler::{RoomEventError, RoomEventHandler},
};

/// Manages one room's event subscription and routes events to a handler.
///
/// Events of a room are handled one at a time, in emission order.
pub struct RoomSubscription {
    room: String,
    handler: Arc<dyn RoomEventHandler>,
    event_bus: EventBus,
}

impl RoomSubscription {
    pub fn new(room: String, handler: Arc<dyn RoomEventHandler>, event_bus: EventBus) -> Self {
        Self {
            room,
            handler,
            event_bus,
        }
    }

    /// Start the subscription - spawns a background task that listens to room events
    /// and routes them to the handler
    pub fn start(self) -> Result<JoinHandle<()>, RoomEventError> {
        let room = self.room.clone();
        let handler_name = self.handler.handler_name();

        if !self.event_bus.has_room(&room) {
            return Err(RoomEventError::RoomNotFound(room));
        }
        let mut receiver = self
            .event_bus
            .take_room_receiver(&room)
            .ok_or_else(|| RoomEventError::AlreadySubscribed(room.clone()))?;

        info!(
            room = %room,
            handler = handler_name,
            "Starting room subscription"
        );

        Ok(tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                debug!(
                    room = %room,
                    handler = handler_name,
                    event_type = event.event_type(),
                    "Received room event"
                );

                if let Err(e) = self.handler.handle_room_event(&room, event).await {
                    warn!(
                        room = %room,
                        handler = handler_name,
                        error = %e,
                        "Room event handler failed"
                    );
                }
            }

            warn!(
                room = %room,
                handler = handler_name,
                "Room subscription ended - no more events"
            );
        }))
    }
}

/// Starts one subscription per room, all routed to the same handler
pub fn start_room_subscriptions(
    room_names: &[String],
    handler: Arc<dyn RoomEventHandler>,
    event_bus: &EventBus,
) -> Result<Vec<JoinHandle<()>>, RoomEventError> {
    room_names
        .iter()
        .map(|room| {
            RoomSubscription::new(room.clone(), Arc::clone(&handler), event_bus.clone()).start()
        })
        .collect()
}
