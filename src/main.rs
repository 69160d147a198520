//! SmarApp chat server.

use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use smarapp::adapters::auth::JwtSessionValidator;
use smarapp::adapters::http::{app_router, ApiDependencies};
use smarapp::adapters::postgres::{run_migrations, PostgresChatMessageRepository};
use smarapp::adapters::storage::InMemoryChatMessageRepository;
use smarapp::adapters::websocket::{Hub, HubSettings};
use smarapp::config::{AppConfig, DatabaseConfig};
use smarapp::ports::ChatMessageRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config)?;
    config.validate()?;

    let repository = connect_repository(&config.database).await?;
    let validator = Arc::new(JwtSessionValidator::new(config.auth.jwt_secret.expose_secret()));

    let hub = Hub::spawn(
        repository.clone(),
        HubSettings {
            join_history_limit: config.chat.join_history_limit,
            channel_capacity: config.chat.hub_channel_capacity,
        },
    );

    let deps = ApiDependencies {
        hub,
        repository,
        validator,
    };
    let app = app_router(deps, &config.chat, &config.server.cors_origins_list());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }
    Ok(())
}

async fn connect_repository(
    database: &DatabaseConfig,
) -> Result<Arc<dyn ChatMessageRepository>, Box<dyn std::error::Error>> {
    if !database.is_configured() {
        tracing::warn!("No database configured, chat messages are kept in memory only");
        return Ok(Arc::new(InMemoryChatMessageRepository::new()));
    }

    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .idle_timeout(database.idle_timeout())
        .max_lifetime(database.max_lifetime())
        .connect(&database.url)
        .await?;
    tracing::info!("Connected to database");

    if database.run_migrations {
        run_migrations(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(Arc::new(PostgresChatMessageRepository::new(pool)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
