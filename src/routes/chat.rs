// ABOUTME: Chat route handlers for submitting a turn and streaming its run over SSE
// ABOUTME: POST /chat/message mints a stream token, GET /chat/stream redeems it and relays unified events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

//! Chat routes
//!
//! Submitting and streaming are two requests, possibly on different
//! connections. The token returned by submit is the only link between them.

use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures_util::stream::Stream;
use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;
use tracing::{error, info};

use startup_mentor_core::constants::network::SSE_KEEPALIVE_SECS;

use crate::{errors::AppError, resources::ServerResources};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body of `POST /chat/message`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Owning user
    pub user_id: i64,
    /// Target conversation
    #[serde(rename = "conversationId", alias = "conversation_id")]
    pub conversation_id: i64,
    /// The founder's message
    pub text: String,
}

/// Response of `POST /chat/message`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Single-use stream token
    pub token: String,
    /// Seconds until the token expires
    pub expires_in: u64,
}

/// Query of `GET /chat/stream`
#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    /// Token returned by submit
    pub token: String,
}

// ============================================================================
// Routes
// ============================================================================

/// Chat routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create all chat routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/chat/message", post(Self::submit_message))
            .route("/chat/stream", get(Self::stream_run))
            .with_state(resources)
    }

    /// Record the user turn and hand back a stream token
    async fn submit_message(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<SubmitRequest>,
    ) -> Result<Json<TokenResponse>, AppError> {
        let pending = resources
            .sessions
            .submit(request.user_id, request.conversation_id, &request.text)
            .await?;

        Ok(Json(TokenResponse {
            token: pending.token,
            expires_in: resources.config.lifetimes.token_ttl_secs,
        }))
    }

    /// Redeem the token and stream the run as SSE
    ///
    /// Unknown, used and expired tokens fail with 404 before any event is sent.
    async fn stream_run(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<StreamQuery>,
    ) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
        let session = resources.sessions.open(&query.token).await?;
        info!(
            conversation = %session.pending().key(),
            history = session.history().len(),
            "Opening run stream"
        );

        let frames = session.into_events().map(|event| {
            let frame = Event::default().json_data(&event).unwrap_or_else(|e| {
                error!("Failed to serialize unified event: {}", e);
                Event::default().comment("unserializable event")
            });
            Ok::<_, Infallible>(frame)
        });

        Ok(Sse::new(frames)
            .keep_alive(KeepAlive::new().interval(Duration::from_secs(SSE_KEEPALIVE_SECS))))
    }
}
