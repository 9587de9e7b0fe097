//! Bursar API server.
//!
//! Loads configuration, connects to Postgres and serves the enrollment
//! ledger routes under `/api/v1`.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bursar_api::{AppState, create_router};
use bursar_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bursar=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = bursar_db::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        statement_timeout_secs = config.database.statement_timeout_secs,
        "Connected to database"
    );

    let state = AppState::new(db, &config.database);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
