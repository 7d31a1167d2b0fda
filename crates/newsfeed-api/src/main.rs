mod routes;

use newsfeed_core::config::ServiceConfig;
use newsfeed_core::store::open_store;
use newsfeed_core::NewsFeed;
use routes::AppState;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServiceConfig::from_env()?;
    let store = open_store(&config.store).await?;
    info!(store = ?config.store, "Entry store ready");

    let app = routes::router(AppState {
        feed: NewsFeed::new(store),
    });

    if std::env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        return lambda_http::run(app).await;
    }

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    info!(port, "Server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
