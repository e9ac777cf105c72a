// ABOUTME: Health check route handler for service monitoring
// ABOUTME: Reports liveness with the engine configuration state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::health))
            .with_state(resources)
    }

    async fn health(State(resources): State<Arc<ServerResources>>) -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "status": "healthy",
            "llm_configured": resources.sessions.engine_configured(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }
}
