use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediashift_api::config::ServerConfig;
use mediashift_api::router::build_app_router;
use mediashift_api::{progress, state};
use mediashift_events::EventBus;
use mediashift_world::{HttpAssetProbe, HttpWorldStore};

use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediashift_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        world = %config.world_api_url,
        "Loaded server configuration"
    );

    // --- World clients ---
    let store = Arc::new(HttpWorldStore::with_timeout(
        config.world_api_url.clone(),
        config.store_timeout(),
    ));
    let probe = Arc::new(HttpAssetProbe::with_timeout(
        config.asset_base_url.clone(),
        config.probe_timeout(),
    ));
    tracing::info!("World store and asset probe clients created");

    // --- Event bus ---
    let bus = Arc::new(EventBus::default());
    tracing::info!("Event bus created");

    // Spawn the progress logger (writes all migration progress to the log).
    let progress_handle = progress::spawn_progress_logger(&bus);

    // --- Shutdown token ---
    // Cancelled on SIGINT/SIGTERM; an in-flight migration run stops at the
    // next entity boundary instead of being cut mid-document.
    let shutdown = CancellationToken::new();

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        probe,
        bus: Arc::clone(&bus),
        run_guard: Arc::new(tokio::sync::Mutex::new(())),
        shutdown: shutdown.clone(),
    };

    // --- Router ---
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
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Drop the event bus sender to close the broadcast channel.
    // This signals the progress logger to shut down.
    drop(bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), progress_handle).await;
    tracing::info!("Progress logger stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager
/// (e.g. systemd, Docker, Kubernetes). Cancels `shutdown` first so an
/// in-flight migration run stops at its next entity boundary.
async fn shutdown_signal(shutdown: CancellationToken) {
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

    shutdown.cancel();
}
