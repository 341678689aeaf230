// src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use price_lookup::config::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let (app_state, db_pool) = AppState::new(&config).await?;

    sqlx::migrate!().run(&db_pool).await?;
    tracing::info!("Database migrations applied");

    let app = price_lookup::router(app_state);

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
