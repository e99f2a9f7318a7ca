use drawduel::{
    config::ServerConfig,
    server::{build_state, serve},
    shared::AppError,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drawduel=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting draw duel relay server");

    let config = ServerConfig::load()?;
    info!(rooms = ?config.room_names, "Configured rooms");

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Server running on http://{}", config.bind_address());

    serve(listener, build_state(config)).await
}
