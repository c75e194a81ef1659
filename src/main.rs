use ama::{
    build_router,
    config::AppConfig,
    message::repository::{InMemoryMessageRepository, PostgresMessageRepository},
    room::repository::{InMemoryRoomRepository, PostgresRoomRepository},
    AppState,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ama=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    info!("Starting AMA server");

    let app_state = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(database_url)
                .await
                .expect("Failed to connect to database");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("Failed to run database migrations");
            info!("Using PostgreSQL store");

            AppState::new(
                Arc::new(PostgresRoomRepository::new(pool.clone())),
                Arc::new(PostgresMessageRepository::new(pool)),
            )
        }
        None => {
            info!("DATABASE_URL not set, using in-memory store");
            AppState::new(
                Arc::new(InMemoryRoomRepository::new()),
                Arc::new(InMemoryMessageRepository::new()),
            )
        }
    };

    let shutdown = app_state.shutdown.clone();
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");
    info!(addr = %config.bind_addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .expect("Server error");

    info!("Server stopped");
}

/// Resolves on Ctrl-C, after cancelling every live subscriber connection
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown requested, closing subscriber connections");
    shutdown.cancel();
}
