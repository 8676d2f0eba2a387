//! Theater Time - show timer server
//!
//! This is the main entry point for the theater-time application.

use std::sync::Arc;
use tokio::net::{TcpListener, UdpSocket};
use tracing::info;

use theater_time::{
    api::create_router,
    config::Config,
    services::{load_show, OscSender},
    state::AppState,
    tasks::{osc_listener_task, osc_status_task, state_writer_task, telemetry_task},
    utils::shutdown_signal,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("theater_time={},tower_http=info", config.log_level()))
        .init();

    info!("Starting theater-time server v{}", env!("CARGO_PKG_VERSION"));

    // Configuration problems are fatal before anything starts serving
    let source = config.source()?;
    let show = load_show(&source).await?;
    let http_port = show.http_config().port;

    let state = Arc::new(AppState::new(show, config.state_file.clone()));
    let osc = state.osc.clone();
    info!(
        "OSC: in={}, out={}:{}, switch={}, toggle={}, timers={}, active={}, blink={}",
        osc.in_port,
        osc.address,
        osc.out_port,
        osc.send_switch,
        osc.send_toggle,
        osc.send_timer_status,
        osc.send_active_timer,
        osc.blink_expired
    );

    // Inbound control bus
    let osc_socket = UdpSocket::bind(("0.0.0.0", osc.in_port)).await?;
    tokio::spawn(osc_listener_task(Arc::clone(&state), osc_socket));

    // Outbound status and telemetry
    let sender = Arc::new(OscSender::bind(&osc).await.map_err(anyhow::Error::msg)?);
    tokio::spawn(osc_status_task(Arc::clone(&state), Arc::clone(&sender)));
    if osc.send_active_timer {
        tokio::spawn(telemetry_task(Arc::clone(&state), Arc::clone(&sender)));
    }

    // Persistence
    tokio::spawn(state_writer_task(Arc::clone(&state)));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state), &config.static_dir);
    let listener = TcpListener::bind(("0.0.0.0", http_port)).await?;

    info!("Server running on http://0.0.0.0:{}", http_port);
    info!("Endpoints:");
    info!("  GET /api/read/remote - Running timer and switches");
    info!("  GET /api/read/admin  - Every timer and switch");
    info!("  GET /*               - Display pages from {}", config.static_dir.display());

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

    info!("Server shutdown complete after {}", state.get_uptime());
    Ok(())
}
