/**
 * Chat Server Entry Point
 *
 * Loads configuration, builds the application and serves it until Ctrl-C.
 */

use std::net::SocketAddr;

use chatapp::backend::routes::RouteGroups;
use chatapp::backend::server::create_app;
use chatapp::shared::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = ServerConfig::from_env()?;
    let addr = config.listen_addr();

    let app = create_app(config, RouteGroups::default()).await?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server running on port {}", addr.port());

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
