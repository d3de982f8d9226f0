// ABOUTME: HTTP server bootstrap binding the router to a TCP listener
// ABOUTME: Runs until ctrl-c or SIGTERM and then drains in-flight requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use std::future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
#[cfg(unix)]
use tokio::signal::unix::{signal as unix_signal, SignalKind};
use tracing::{info, warn};

use crate::resources::ServerResources;
use crate::routes::build_router;

/// Recipe API server
pub struct TastyTreatsServer {
    resources: Arc<ServerResources>,
}

impl TastyTreatsServer {
    /// Create a server over shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Shared resources
    #[must_use]
    pub const fn resources(&self) -> &Arc<ServerResources> {
        &self.resources
    }

    /// Complete router with middleware, usable without a socket
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.resources))
    }

    /// Bind the configured host and port and serve until shutdown
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the server fails
    pub async fn run(self) -> Result<()> {
        let config = &self.resources.config;
        let address = format!("{}:{}", config.host, config.http_port);
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind {address}"))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let local: SocketAddr = listener.local_addr()?;
        info!("HTTP server listening on http://{local}");
        display_available_endpoints(local);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;

        info!("HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match unix_signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => warn!("Failed to listen for SIGTERM: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received ctrl-c, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}

fn display_available_endpoints(local: SocketAddr) {
    info!("=== Available API Endpoints ===");
    info!("   Health:            GET  http://{local}/health");
    info!("   Register:          POST http://{local}/auth/register");
    info!("   Login:             POST http://{local}/auth/login");
    info!("   Current user:      GET  http://{local}/auth/user");
    info!("   Recipes:           http://{local}/recipes[/{{id}}]");
    info!("   Recipe lines:      http://{local}/recipe-ingredients[/{{id}}]");
    info!("   Ingredient names:  GET  http://{local}/ingredients");
    info!("   Measurements:      GET  http://{local}/measurements");
    info!("   Comments:          http://{local}/comments[/{{id}}]");
    info!("   Likes:             http://{local}/likes[/{{id}}]");
    info!("   Followers:         http://{local}/followers[/{{id}}]");
    info!("   Profiles:          http://{local}/profiles[/{{id}}]");
    info!("=== End of Endpoint List ===");
}
