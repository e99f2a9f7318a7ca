// Event-driven architecture components
//
// Room-scoped requests are turned into events and delivered to one
// subscription task per room, which handles them one at a time.

// Public API - what other modules can use
pub use bus::EventBus;
pub use events::RoomEvent;
pub use room_handler::{RoomEventError, RoomEventHandler};
pub use room_subscription::{start_room_subscriptions, RoomSubscription};

// Internal modules
mod bus;
mod events;
mod room_handler;
mod room_subscription;
