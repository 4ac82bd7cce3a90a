use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use a11y_control::api::{create_router, AppState};
use a11y_control::automation::{AutomationCore, HostEvent};
use a11y_control::config::Config;
use a11y_control::platform::create_connection;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load environment
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    let core = Arc::new(AutomationCore::new(config.control_gate));

    // Bind the host connection; without one the API stays up and reports NotConnected
    match create_connection(config.backend) {
        Ok(handle) => core.handle_host_event(HostEvent::ServiceConnected(handle)).await,
        Err(e) => tracing::error!("Failed to bind {:?} host connection: {:#}", config.backend, e),
    }

    let state = Arc::new(AppState::new(Arc::clone(&core)));
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("a11y-control sidecar starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    core.handle_host_event(HostEvent::ServiceUnbound).await;
    tracing::info!("a11y-control sidecar stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
