//! Pomodoro Server - A state-managed HTTP server running an interval timer
//!
//! This is the main entry point for the pomodoro-server application.

use std::sync::Arc;
use tokio::{net::TcpListener, runtime::Handle};
use tracing::info;

use pomodoro_server::{
    config::Config,
    state::AppState,
    api::create_router,
    services::Notifier,
    storage::JsonFileStore,
    tasks::{completion_notifier_task, tick_driver_task},
    timer::{tick_channel, TokioClock},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_server={},tower_http=info", config.log_level()))
        .init();

    let settings_path = config.settings_path();
    info!("Starting pomodoro-server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, settings={}, notify={}",
          config.host, config.port, settings_path.display(), config.notify);

    // Ticks flow from the clock's schedules to the tick driver
    let (tick_tx, tick_rx) = tick_channel();
    let clock = TokioClock::new(Handle::current());
    let store = JsonFileStore::new(settings_path);

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        Box::new(clock),
        tick_tx,
        Box::new(store),
    ));

    let tick_state = Arc::clone(&state);
    tokio::spawn(async move {
        tick_driver_task(tick_state, tick_rx).await;
    });

    let notifier = config.notify.then(|| Notifier::new("Pomodoro"));
    let completion_state = Arc::clone(&state);
    tokio::spawn(async move {
        completion_notifier_task(completion_state, notifier).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start           - Start or resume the countdown");
    info!("  POST /pause           - Pause the countdown");
    info!("  POST /reset           - Refill the current mode");
    info!("  POST /mode/:mode      - Switch to focus, break or long");
    info!("  GET  /settings        - Current settings");
    info!("  POST /settings/:field - Change focus, break, long or cycles");
    info!("  GET  /status          - Timer and server status");
    info!("  GET  /health          - Health check");

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

    info!("Server shutdown complete");
    Ok(())
}
