#![allow(dead_code)]

use std::sync::Arc;
use tokio::task::JoinHandle;

use drawduel::{
    config::ServerConfig,
    event::{start_room_subscriptions, EventBus},
    room::repository::InMemoryRoomRepository,
    shared::AppState,
    websockets::{
        event_handlers::ConnectionEventHandlers, WebSocketRoomSubscriber, WebsocketReceiveHandler,
    },
};

use super::mocks::MockConnectionManager;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub state: AppState,
    pub mock_conn_manager: Arc<MockConnectionManager>,
    pub input_handler: WebsocketReceiveHandler,
    pub connection_handlers: Arc<ConnectionEventHandlers>,
    pub players: Vec<String>,
    pub _subscription_handles: Vec<JoinHandle<()>>,
}

pub struct TestSetupBuilder {
    players: Vec<String>,
    room_names: Vec<String>,
    event_channel_capacity: Option<usize>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            room_names: ServerConfig::default().room_names,
            event_channel_capacity: None,
        }
    }

    pub fn with_players(mut self, players: Vec<&str>) -> Self {
        self.players = players.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_players(self) -> Self {
        self.with_players(vec!["p1", "p2"])
    }

    pub fn with_three_players(self) -> Self {
        self.with_players(vec!["p1", "p2", "p3"])
    }

    pub fn with_room_names(mut self, names: Vec<&str>) -> Self {
        self.room_names = names.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = Some(capacity);
        self
    }

    pub async fn build(self) -> TestSetup {
        let mut config = ServerConfig::default()
            .with_room_names(self.room_names)
            .unwrap();
        if let Some(capacity) = self.event_channel_capacity {
            config.event_channel_capacity = capacity;
        }
        let repo = Arc::new(InMemoryRoomRepository::new(config.room_names.clone()));
        let event_bus = EventBus::new(config.room_names.clone(), config.event_channel_capacity);
        let mock_conn_manager = Arc::new(MockConnectionManager::new());

        // Connect players
        for player in &self.players {
            mock_conn_manager.add_connected_player(player).await;
        }

        let state = AppState::new(
            Arc::new(config),
            mock_conn_manager.clone(),
            repo,
            event_bus.clone(),
        );

        let connection_handlers = Arc::new(ConnectionEventHandlers::new(
            state.room_service.clone(),
            state.connection_manager.clone(),
        ));
        let input_handler = WebsocketReceiveHandler::new(event_bus.clone(), connection_handlers.clone());

        let output_subscriber = Arc::new(WebSocketRoomSubscriber::new(
            state.room_service.clone(),
            state.connection_manager.clone(),
        ));
        let subscription_handles =
            start_room_subscriptions(&state.config.room_names, output_subscriber, &event_bus)
                .unwrap();

        TestSetup {
            state,
            mock_conn_manager,
            input_handler,
            connection_handlers,
            players: self.players,
            _subscription_handles: subscription_handles,
        }
    }
}
