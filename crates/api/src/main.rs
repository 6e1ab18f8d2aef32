use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use syncbridge_core::secrets::{
    SecretStore, CLICKUP_ACCESS_TOKEN, CLICKUP_LIST_ID, HUBSPOT_ACCESS_TOKEN,
};
use syncbridge_core::urls::UrlResolver;
use syncbridge_platforms::{ClickUpClient, HubSpotClient};
use syncbridge_sync::SyncRunner;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use syncbridge_api::config::ServerConfig;
use syncbridge_api::router::build_app_router;
use syncbridge_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "syncbridge_api=debug,syncbridge_sync=debug,syncbridge_platforms=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let secrets = SecretStore::from_file(&config.secrets_path).expect("Failed to load secrets");
    tracing::info!(path = %config.secrets_path, "Secrets loaded");

    // --- Database ---
    let database_url = secrets
        .database()
        .expect("DATABASE_DEFAULT secret is incomplete")
        .url();

    let pool = syncbridge_db::create_pool(&database_url, config.db_max_connections)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    syncbridge_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    syncbridge_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Platform clients ---
    let request_log = syncbridge_db::request_log::build_request_log(&pool, config.request_log_mode);
    tracing::info!(mode = ?config.request_log_mode, "Request history logging configured");

    let urls = Arc::new(UrlResolver::new(
        &config.hubspot_api_base,
        &config.clickup_api_base,
        secrets
            .get_text(CLICKUP_LIST_ID)
            .expect("CLICKUP_LIST_ID secret is required"),
    ));

    let crm = Arc::new(HubSpotClient::new(
        secrets
            .get_str(HUBSPOT_ACCESS_TOKEN)
            .expect("HUBSPOT_ACCESS_TOKEN secret is required"),
        Arc::clone(&urls),
        Arc::clone(&request_log),
    ));
    let task_board = Arc::new(
        ClickUpClient::new(
            secrets
                .get_str(CLICKUP_ACCESS_TOKEN)
                .expect("CLICKUP_ACCESS_TOKEN secret is required"),
            urls,
            request_log,
        )
        .with_success_statuses(config.clickup_success_statuses.clone()),
    );

    // --- Sync runner ---
    let sync_runner = Arc::new(SyncRunner::new(crm.clone(), task_board.clone()));

    // --- App state ---
    let state = AppState {
        pool,
        crm,
        task_board,
        sync_runner: Arc::clone(&sync_runner),
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
    tracing::info!("Server stopped accepting connections, cleaning up");

    if tokio::time::timeout(Duration::from_secs(10), sync_runner.shutdown())
        .await
        .is_err()
    {
        tracing::warn!("Sync runs did not stop within 10s");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM to initiate graceful shutdown.
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
