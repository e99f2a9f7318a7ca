pub mod agreement_events;
pub mod connection_events;
pub mod relay_events;
pub mod room_events;
pub mod shared;

pub use agreement_events::AgreementEventHandlers;
pub use connection_events::ConnectionEventHandlers;
pub use relay_events::RelayEventHandlers;
pub use room_events::RoomEventHandlers;
