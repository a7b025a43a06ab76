//! Chain Alarm - A state-managed HTTP server that watches a game chain timer
//!
//! This is the main entry point for the chain-alarm application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use chain_alarm::{
    api::create_router,
    chain::ChainState,
    config::Config,
    services::{BellAlarm, HttpStatusProvider},
    state::AppState,
    tasks::Session,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("chain_alarm={},tower_http=info", config.log_level()))
        .init();

    info!("Starting chain-alarm server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, mode={:?}, threshold={}s, volume={}%",
          config.host, config.port, config.mode, config.threshold, config.volume);

    if config.api_key.is_empty() {
        info!("No API key configured, synced mode will report errors until one is set");
    }

    let provider = Arc::new(HttpStatusProvider::new(config.api_url.clone())?);
    let alarm = Arc::new(BellAlarm::new());

    // Spawn the session that owns all chain state, then its driver
    let initial = ChainState::new(config.mode, config.threshold, config.volume);
    let session = Arc::new(Session::spawn(initial, config.api_key.clone(), provider, alarm));
    session.start().await;

    let state = Arc::new(AppState::new(Arc::clone(&session), config.port, config.host.clone()));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/start - Start the manual countdown");
    info!("  POST /timer/reset - Reload the full chain duration");
    info!("  POST /timer/stop  - Stop the manual countdown");
    info!("  PUT  /settings    - Change threshold, volume, mode or API key");
    info!("  GET  /status      - Check chain status and countdown");
    info!("  GET  /health      - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    session.stop().await;
    info!("Server shutdown complete");
    Ok(())
}
