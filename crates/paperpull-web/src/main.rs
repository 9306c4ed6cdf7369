use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

mod handlers;
mod models;
mod state;

use paperpull_core::{Config, MemoryTokenStore};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    if config.unpaywall_email.is_none() {
        tracing::warn!("UNPAYWALL_EMAIL is not set; Unpaywall lookups will be skipped");
    }

    let state = Arc::new(AppState {
        config,
        tokens: Arc::new(MemoryTokenStore::new()),
    });

    let app = axum::Router::new()
        .route("/api/lookup", axum::routing::post(handlers::lookup::lookup))
        .route(
            "/api/download/{token}",
            axum::routing::get(handlers::download::download),
        )
        .route("/health", axum::routing::get(handlers::health::health))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
