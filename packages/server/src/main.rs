use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fest_server::config::AppConfig;
use fest_server::state::AppState;
use fest_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = database::init_db(&config.database)
        .await
        .context("Invalid database configuration")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    // Keep serving even if this fails; requests surface the database error.
    match seed::bootstrap_schema(&db).await {
        Ok(()) => info!(
            host = %config.database.host,
            database = %config.database.name,
            "Connected to database"
        ),
        Err(e) => error!(error = %e, "Database schema setup failed"),
    }

    info!("Server running at http://{}", listener.local_addr()?);

    let app = build_router(AppState { db, config });
    axum::serve(listener, app).await?;

    Ok(())
}
