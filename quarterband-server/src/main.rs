mod auth;
mod config;
mod error;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Extension, Router, middleware, routing::get};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use quarterband_scanner::{ScanCache, Scanner, ScannerConfig, spawn_refresh_loop};

use auth::BasicAuth;
use config::ServerConfig;
use state::AppState;

#[tokio::main]
async fn main() {
    init_logging();

    // Configuration errors are fatal before anything starts.
    let scanner_config = ScannerConfig::from_env().expect("invalid scanner configuration");
    let server_config = ServerConfig::from_env().expect("invalid server configuration");

    info!(
        exchange = %scanner_config.exchange_url,
        policy = %scanner_config.score_policy,
        refresh_secs = scanner_config.refresh_interval.as_secs(),
        "starting quarterband server"
    );
    if server_config.credentials.is_none() {
        warn!("QB_BASIC_USER/QB_BASIC_PASS unset, serving without authentication");
    }

    let scanner = Arc::new(Scanner::new(scanner_config).expect("failed to build exchange client"));
    let cache = ScanCache::new();

    // Background refresh loop: the only writer to the cache.
    spawn_refresh_loop(Arc::clone(&scanner), cache.clone());

    let app_state = AppState { scanner, cache };

    let protected = Router::new()
        .route("/", get(routes::scoreboard_page))
        .route("/api/top-picks", get(routes::top_picks))
        .route("/api/candles", get(routes::candles))
        .layer(middleware::from_fn(auth::require_basic_auth))
        .layer(Extension(BasicAuth(server_config.credentials.clone())));

    let app = Router::new()
        .merge(protected)
        .route("/api/health", get(routes::health))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", server_config.bind, server_config.port)
        .parse()
        .expect("invalid bind address");

    info!("quarterband server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    info!("shutdown signal received, stopping");
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
