//! Server Implementation
//!
//! HTTP listener and graceful shutdown

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::core::{Result, ServerState};
use crate::routes::build_app;

/// HTTP Server
pub struct Server {
    state: ServerState,
}

impl Server {
    pub fn new(state: ServerState) -> Self {
        Self { state }
    }

    pub async fn run(self) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.http_port));
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Cluster gate listening on {}", addr);

        let app = build_app(&self.state).with_state(self.state);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
