// Library crate for the draw duel relay server
// This file exposes the public API for integration tests

pub mod config;
pub mod event;
pub mod room;
pub mod server;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use config::ServerConfig;
pub use event::{EventBus, RoomEvent, RoomSubscription};
pub use room::{models::RoomModel, repository::RoomRepository, RoomService};
pub use shared::{AppError, AppState};
pub use websockets::{
    ConnectionManager, MessageHandler, MessageType, WebSocketMessage, WebSocketRoomSubscriber,
    WebsocketReceiveHandler,
};
