use axum::routing::get;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use bellagio_web::app_state::AppState;
use bellagio_web::config::AppConfig;
use bellagio_web::routes;
use bellagio_web::services::{auth::MemoryTokenStore, gateway::HttpGateway};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing bellagio-web server");

    let prometheus_handle =
        routes::metrics::install_recorder().expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    tracing::info!(backend = %config.backend_url, "Initializing backend API client");
    let gateway = HttpGateway::new(&config.backend_url, config.request_timeout())
        .expect("Failed to initialize backend client");

    let bind_addr = config.bind_addr.clone();
    let sweep_every = config.session_sweep();
    let tokens = Arc::new(MemoryTokenStore::new(config.session_idle()));
    let state = AppState::new(config, Arc::new(gateway), tokens.clone());

    // Periodic idle session cleanup
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_every);
        loop {
            interval.tick().await;
            let now = Instant::now();
            let dropped_sessions = sessions.prune_idle(now);
            let dropped_tokens = tokens.prune_idle(now);
            if dropped_sessions + dropped_tokens > 0 {
                tracing::debug!(dropped_sessions, dropped_tokens, "Pruned idle sessions");
            }
        }
    });

    let app = routes::router(state).route(
        "/metrics",
        get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
    );

    tracing::info!("Starting bellagio-web on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
