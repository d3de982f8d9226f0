// ABOUTME: Health check route handler for service monitoring
// ABOUTME: Reports liveness and whether the database answers queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .with_state(resources)
    }

    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Response {
        let timestamp = chrono::Utc::now().to_rfc3339();
        match resources.database.health_check().await {
            Ok(()) => Json(serde_json::json!({
                "status": "healthy",
                "database": "ok",
                "timestamp": timestamp,
            }))
            .into_response(),
            Err(e) => {
                tracing::error!("Health check failed: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(serde_json::json!({
                        "status": "unhealthy",
                        "database": "unavailable",
                        "timestamp": timestamp,
                    })),
                )
                    .into_response()
            }
        }
    }
}
