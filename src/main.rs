use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use mirasens_chatbot::{config::Config, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let port = config.port;
    let environment = config.environment;

    let state = Arc::new(AppState::new(config)?);
    let app = routes::create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?environment, "MIRASENS chatbot relay listening");

    // ConnectInfo feeds the rate limiter's per-IP key.
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
