// Public API
pub use connection_manager::{ConnectionManager, InMemoryConnectionManager};
pub use handler::{handle_websocket_connection, websocket_handler, WebsocketReceiveHandler};
pub use messages::{MessageType, WebSocketMessage};
pub use socket::{Connection, MessageHandler, SocketError, SocketWrapper};
pub use websocket_room_subscriber::WebSocketRoomSubscriber;

// Internal modules
mod connection_manager;
pub mod event_handlers;
mod handler;
pub mod messages;
mod socket;
mod websocket_room_subscriber;
