//! Krishi Sakhi - farmer advisory server

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use krishi_server::{
    create_app,
    services::{FarmerStore, InMemoryFarmerStore, PgFarmerStore},
    AppState, Clients, Config,
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "krishi_server=debug,tower_http=debug,sqlx=warn".into());

    let json = std::env::var("KRISHI_LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    init_tracing();
    let config = Config::load()?;

    tracing::info!("Starting Krishi Sakhi server");
    tracing::info!("Environment: {}", config.environment);

    let store: Arc<dyn FarmerStore> = match config.database.url.as_deref() {
        Some(url) => {
            tracing::info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .acquire_timeout(Duration::from_secs(30))
                .connect(url)
                .await?;
            tracing::info!("Database connection established");

            // Run migrations in development
            if config.environment == "development" {
                tracing::info!("Running database migrations...");
                sqlx::migrate!("./migrations").run(&db_pool).await?;
                tracing::info!("Migrations completed");
            }

            Arc::new(PgFarmerStore::new(db_pool))
        }
        None => {
            tracing::warn!("No database configured, using in-memory storage");
            Arc::new(InMemoryFarmerStore::new())
        }
    };

    let clients = Clients::from_config(&config)?;
    let addr = config
        .server
        .socket_addr()
        .with_context(|| format!("invalid server.host '{}'", config.server.host))?;
    let state = AppState::new(config, store, clients);

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
