use std::sync::Arc;

use anyhow::Result;
use dashboard_service::{config::AppConfig, metrics_server, observability, routes, AppState};
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr);
    }

    // One shared pool for every report handler.
    let pool = PgPoolOptions::new()
        .max_connections(cfg.database.max_connections)
        .connect(&cfg.database.uri)
        .await?;

    let bind_addr = cfg.http.bind_addr.clone();
    let state = AppState {
        pool,
        config: Arc::new(cfg),
    };

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "dashboard service listening");
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
