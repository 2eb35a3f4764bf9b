// File: crates/services/werkstatt_backend/src/main.rs
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use werkstatt_backend::{build_router, AppState, WerkstattServiceFactory};
use werkstatt_config::load_config;

#[tokio::main]
async fn main() -> ExitCode {
    werkstatt_common::init();

    let config = match load_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let factory = match WerkstattServiceFactory::new(config.clone()).await {
        Ok(factory) => factory,
        Err(e) => {
            error!("Failed to initialize services: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let app = build_router(&AppState::from_factory(&factory));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Cannot bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };
    info!("Werkstatt backend listening on http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    // ConnectInfo feeds the peer address to the rate limiter
    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
