//! Countdown Timer - A state-managed countdown with an HTTP control surface
//! 
//! This is the main entry point for the countdown-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::state_observer_task,
    ticker::TokioTickSource,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_timer={},tower_http=info", config.log_level()))
        .init();

    let initial = config.initial_duration();
    info!("Starting countdown-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, duration={}, tick={}ms",
          config.host, config.port, initial.formatted_time, config.tick_interval_ms);

    // Create the timer session on the tokio tick source
    let state = Arc::new(AppState::with_source(
        Arc::new(TokioTickSource::new()),
        initial,
        config.tick_interval_ms,
        config.port,
        config.host.clone(),
    ));

    // Start the observer background task
    let observer_state = Arc::clone(&state);
    let observer = tokio::spawn(async move {
        state_observer_task(observer_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /state   - Current timer state");
    info!("  GET  /events  - Server-sent state updates");
    info!("  POST /adjust  - Step hours, minutes or seconds");
    info!("  POST /start   - Start the countdown");
    info!("  POST /cancel  - Pause the countdown");
    info!("  POST /toggle  - Start or pause");
    info!("  GET  /health  - Health check");

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
    observer.abort();

    info!("Server shutdown complete");
    Ok(())
}
