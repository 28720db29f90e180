//! HTTP server for the search API.

pub mod transport;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::client::SemanticScholarClient;
use crate::handler::SearchHandler;

/// Search API server.
#[derive(Debug)]
pub struct SearchServer {
    /// Request handler shared by all routes.
    handler: SearchHandler,
}

impl SearchServer {
    /// Create a new server.
    #[must_use]
    pub fn new(client: SemanticScholarClient) -> Self {
        Self { handler: SearchHandler::new(Arc::new(client)) }
    }

    /// Build the router without binding a socket.
    #[must_use]
    pub fn router(&self) -> axum::Router {
        transport::create_router(self.handler.clone())
    }

    /// Serve HTTP until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns error if binding or serving fails.
    pub async fn run_http(self, addr: SocketAddr) -> anyhow::Result<()> {
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("Failed to install CTRL+C handler");
    tracing::info!("Received shutdown signal");
}
