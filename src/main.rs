//! Focus Clock - A Pomodoro focus timer with session history
//!
//! This is the main entry point for the focus-clock application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use focus_clock::{
    api::create_router,
    config::Config,
    services::ToneChime,
    state::AppState,
    timer::FocusTimer,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting focus-clock v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, preset={}, sound={}, auto_continue={}",
        config.host,
        config.port,
        config.preset.label(),
        !config.no_sound,
        config.auto_continue
    );

    // Create application state
    let timer = FocusTimer::new(config.focus_options(), Arc::new(ToneChime::new()));
    let state = Arc::new(AppState::new(config.port, config.host.clone(), timer));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start      - Start the countdown");
    info!("  POST /pause      - Pause the countdown");
    info!("  POST /resume     - Resume a paused countdown");
    info!("  POST /reset      - Rewind the current phase");
    info!("  POST /task       - Set the current task label");
    info!("  POST /preset     - Switch duration preset");
    info!("  POST /sound      - Toggle the completion chime");
    info!("  GET  /status     - Clock display and settings");
    info!("  GET  /history    - Completed sessions, newest first");
    info!("  GET  /stats      - Today's focus figures");
    info!("  GET  /presets    - Available presets");
    info!("  GET  /events     - Display updates as server-sent events");
    info!("  GET  /health     - Health check");

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

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
