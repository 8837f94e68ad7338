use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sitedesk_api::auth::session::SessionStore;
use sitedesk_api::config::ServerConfig;
use sitedesk_api::router::build_app_router;
use sitedesk_api::state::AppState;
use sitedesk_api::ws;
use sitedesk_core::store::{DprStore, IndentStore};
use sitedesk_db::memory::{InMemoryDprStore, InMemoryIndentStore};
use sitedesk_db::repositories::{PgDprStore, PgIndentStore};
use sitedesk_events::{DriveSyncWorker, EventBus};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sitedesk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Stores ---
    // With DATABASE_URL set the workflow runs on Postgres; without it the
    // server falls back to in-memory stores for local development.
    let (indents, dprs): (Arc<dyn IndentStore>, Arc<dyn DprStore>) =
        match std::env::var("DATABASE_URL") {
            Ok(database_url) => {
                let pool = sitedesk_db::create_pool(&database_url)
                    .await
                    .expect("Failed to connect to database");
                tracing::info!("Database connection pool created");

                sitedesk_db::health_check(&pool)
                    .await
                    .expect("Database health check failed");
                tracing::info!("Database health check passed");

                sitedesk_db::run_migrations(&pool)
                    .await
                    .expect("Failed to run database migrations");
                tracing::info!("Database migrations applied");

                (
                    Arc::new(PgIndentStore::new(pool.clone())),
                    Arc::new(PgDprStore::new(pool)),
                )
            }
            Err(_) => {
                tracing::warn!("DATABASE_URL not set; using in-memory stores (data is not persisted)");
                (
                    Arc::new(InMemoryIndentStore::new()),
                    Arc::new(InMemoryDprStore::new()),
                )
            }
        };

    // --- WebSocket manager + heartbeat ---
    let ws_manager = Arc::new(ws::WsManager::new());
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&ws_manager));

    // --- Event bus + dashboard bridge ---
    let event_bus = Arc::new(EventBus::default());
    let bridge_handle = ws::start_event_bridge(Arc::clone(&event_bus), Arc::clone(&ws_manager));
    tracing::info!("Event bus and WebSocket bridge started");

    // --- Drive-sync worker ---
    let sync_cancel = tokio_util::sync::CancellationToken::new();
    let (sync_worker, sync_queue) = DriveSyncWorker::new(config.archiver_url.clone());
    let sync_handle = tokio::spawn(sync_worker.run(sync_cancel.clone()));
    tracing::info!(
        archiver_configured = config.archiver_url.is_some(),
        "Drive-sync worker started"
    );

    // --- App state ---
    let state = AppState {
        indents,
        dprs,
        config: Arc::new(config.clone()),
        sessions: Arc::new(SessionStore::new()),
        ws_manager: Arc::clone(&ws_manager),
        event_bus: Arc::clone(&event_bus),
        sync_queue,
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
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Stop the drive-sync worker; any queued manifests are dropped.
    sync_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sync_handle).await;
    tracing::info!("Drive-sync worker stopped");

    // Drop the event bus sender to close the broadcast channel, which
    // signals the WebSocket bridge to shut down.
    drop(event_bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), bridge_handle).await;
    tracing::info!("Event bridge shut down");

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    heartbeat_handle.abort();
    tracing::info!("Heartbeat task stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
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
