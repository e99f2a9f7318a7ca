// Public API - what other modules can use
pub use agreement::{AgreementState, AgreementTracker, EpisodeKind};
pub use handlers::{get_room, list_rooms};
pub use models::{Participant, RoomModel, ROOM_CAPACITY};
pub use readiness::{ReadinessCoordinator, RoomReady};
pub use service::RoomService;
pub use types::{JoinOutcome, RoomError, RoomStatus};

// Internal modules
pub mod agreement;
mod handlers;
pub mod models;
pub mod readiness;
pub mod repository;
pub mod service;
pub mod types;
