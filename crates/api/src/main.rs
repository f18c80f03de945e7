use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use courier_api::config::ServerConfig;
use courier_api::engine::pipeline::RelayPipeline;
use courier_api::router::build_app_router;
use courier_api::state::AppState;
use courier_core::outcome::millis;
use courier_db::{MemoryStore, PgStore, Store};
use courier_history::HistoryRecorder;
use courier_relay::HttpDispatcher;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "courier_api=debug,courier_relay=debug,courier_history=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        relay_timeout_ms = millis(config.relay.timeout),
        "Loaded server configuration"
    );

    // --- Store ---
    let store: Arc<dyn Store> = match config.database_url.as_deref() {
        Some(url) => Arc::new(
            PgStore::connect(url)
                .await
                .expect("Failed to initialise PostgreSQL store"),
        ),
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    // --- History writer ---
    let (recorder, writer_handle) =
        HistoryRecorder::spawn(Arc::clone(&store), config.history_queue_capacity);
    tracing::info!(capacity = config.history_queue_capacity, "History queue ready");

    // --- Relay ---
    let dispatcher =
        HttpDispatcher::new(&config.relay).expect("Failed to build outbound HTTP client");
    let pipeline = Arc::new(RelayPipeline::new(Arc::new(dispatcher), recorder));

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        pipeline,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    // The router (and with it the last recorder) is gone once serve
    // returns, so the writer drains the queue and exits.
    tracing::info!("Server stopped accepting connections, flushing history");
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    match tokio::time::timeout(drain, writer_handle).await {
        Ok(Ok(())) => tracing::info!("History writer stopped"),
        Ok(Err(e)) => tracing::error!(error = %e, "History writer task failed"),
        Err(_) => tracing::warn!(
            timeout_secs = config.shutdown_timeout_secs,
            "History writer did not drain in time, abandoning queued records"
        ),
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
