use std::{
    future::Future,
    net::{IpAddr, SocketAddr, ToSocketAddrs},
};

use axum::{extract::Request, ServiceExt};
use configs::AppConfig;
use dotenvy::dotenv;
use service::StorageEngine;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

/// Host/port from the validated config. Hostnames are resolved once here.
pub fn load_bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let host = cfg.server.host.trim();
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, cfg.server.port));
    }
    (host, cfg.server.port)
        .to_socket_addrs()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {host}: {e}")))?
        .next()
        .ok_or_else(|| StartupError::InvalidConfig(format!("bind address {host} resolved to nothing")))
}

/// Serve on an already bound listener until `shutdown` resolves, then shut
/// the storage engine down.
pub async fn serve<F>(listener: TcpListener, engine: StorageEngine, shutdown: F) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = routes::build_app(AppState::new(engine.clone()));
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    engine.shutdown().await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl-c listener failed; shutdown signal unavailable");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Public entry: load config, open storage and run the HTTP server until Ctrl+C.
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();
    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let engine = StorageEngine::from_config(&cfg).await?;

    let addr = load_bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await.map_err(|e| StartupError::Any(e.into()))?;
    info!(%addr, storage = engine.backend_name(), "starting api server");

    serve(listener, engine, shutdown_signal()).await
}
