//! HTTP API layer.
//!
//! A thin stand-in for the home-automation host: handlers expose room entities
//! and forward commands, all logic lives in the services.

use std::net::SocketAddr;

use thiserror::Error;

use crate::bootstrap::BootstrappedServices;

pub mod http;
pub mod response;

pub use http::create_router;

/// Errors that can occur when starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to a TCP port.
    #[error("Failed to bind to port: {0}")]
    Bind(#[from] std::io::Error),
}

/// Shared application state for the API layer.
#[derive(Clone)]
pub struct AppState {
    pub services: BootstrappedServices,
}

impl AppState {
    pub fn new(services: BootstrappedServices) -> Self {
        Self { services }
    }
}

/// Binds `0.0.0.0:<port>` and serves the API until `shutdown` resolves.
pub async fn start_server<F>(state: AppState, port: u16, shutdown: F) -> Result<(), ServerError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("[Server] Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
