// ABOUTME: Stream Session Driver tying token redemption, the engine run, and the transcript commit together
// ABOUTME: AWAIT_TOKEN -> RESOLVED -> STREAMING -> COMMITTED, with ERROR reachable before and during streaming
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

use std::fmt;
use std::sync::Arc;

use async_stream::stream;
use futures_util::{Stream, StreamExt};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use startup_mentor_core::models::{ConversationMessage, PendingRun};

use crate::agent::{HistoryMessage, ReasoningEngine};
use crate::errors::{AppError, AppResult};
use crate::runs::{normalize_run, NormalizedEvent, UnifiedEvent};
use crate::stores::{Conversation, ConversationStore, TokenStore};

/// Lifecycle of one stream connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the token to be redeemed
    AwaitToken,
    /// Token redeemed, transcript loaded
    Resolved,
    /// Relaying events from the engine
    Streaming,
    /// Final outcome written to the transcript
    Committed,
    /// Terminated without a commit
    Error,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AwaitToken => "AWAIT_TOKEN",
            Self::Resolved => "RESOLVED",
            Self::Streaming => "STREAMING",
            Self::Committed => "COMMITTED",
            Self::Error => "ERROR",
        })
    }
}

/// Submit and stream entry points over the shared stores
#[derive(Clone)]
pub struct SessionDriver {
    conversations: ConversationStore,
    tokens: TokenStore,
    engine: Option<Arc<dyn ReasoningEngine>>,
}

impl SessionDriver {
    /// Create a driver; `engine` is `None` when no credential is configured
    #[must_use]
    pub fn new(
        conversations: ConversationStore,
        tokens: TokenStore,
        engine: Option<Arc<dyn ReasoningEngine>>,
    ) -> Self {
        Self {
            conversations,
            tokens,
            engine,
        }
    }

    /// Whether a reasoning engine is available
    #[must_use]
    pub fn engine_configured(&self) -> bool {
        self.engine.is_some()
    }

    /// Record a user turn and mint its stream token.
    ///
    /// The append and the token issue are two independent steps.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `text` is empty
    pub async fn submit(
        &self,
        user_id: i64,
        conversation_id: i64,
        text: &str,
    ) -> AppResult<PendingRun> {
        if text.trim().is_empty() {
            return Err(AppError::invalid_input("text must not be empty"));
        }
        let conversation = self.conversations.get_or_create(user_id, conversation_id).await;
        conversation.append(ConversationMessage::user(text)).await;
        let pending = self.tokens.issue(user_id, conversation_id, text);
        info!(user_id, conversation_id, "Accepted chat turn");
        Ok(pending)
    }

    /// Redeem `token` and load its transcript.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for unknown, expired, or already used tokens.
    /// Nothing has been streamed at that point.
    pub async fn open(&self, token: &str) -> AppResult<ResolvedSession> {
        let Some(pending) = self.tokens.redeem(token) else {
            debug!(state = %SessionState::Error, "Stream token rejected");
            return Err(AppError::not_found("Stream token"));
        };

        let conversation = self
            .conversations
            .get_or_create(pending.user_id, pending.conversation_id)
            .await;
        let history = conversation
            .messages()
            .await
            .iter()
            .map(HistoryMessage::from)
            .collect();

        debug!(
            conversation = %pending.key(),
            state = %SessionState::Resolved,
            "Stream token redeemed"
        );
        Ok(ResolvedSession {
            pending,
            conversation,
            history,
            engine: self.engine.clone(),
        })
    }
}

/// A redeemed token, ready to stream
pub struct ResolvedSession {
    pending: PendingRun,
    conversation: Arc<Conversation>,
    history: Vec<HistoryMessage>,
    engine: Option<Arc<dyn ReasoningEngine>>,
}

impl ResolvedSession {
    /// The run being streamed
    #[must_use]
    pub const fn pending(&self) -> &PendingRun {
        &self.pending
    }

    /// History handed to the engine (transcript order, role and content only)
    #[must_use]
    pub fn history(&self) -> &[HistoryMessage] {
        &self.history
    }

    /// Drive the run, yielding each unified event as it is produced.
    ///
    /// The commit runs after the last event is pulled. Dropping the stream
    /// early (client disconnect) stops the engine and skips the commit.
    pub fn into_events(self) -> impl Stream<Item = UnifiedEvent> + Send + 'static {
        let Self {
            pending,
            conversation,
            history,
            engine,
        } = self;
        let key = pending.key();
        let run_id = Uuid::new_v4();

        stream! {
            match engine {
                None => {
                    warn!(
                        conversation = %key,
                        %run_id,
                        state = %SessionState::Error,
                        "LLM not configured; sending empty event"
                    );
                    yield UnifiedEvent::empty(key);
                }
                Some(engine) => {
                    debug!(conversation = %key, %run_id, state = %SessionState::Streaming, "Starting run");
                    let events = normalize_run(key, engine.run(history));
                    futures_util::pin_mut!(events);

                    let mut last: Option<UnifiedEvent> = None;
                    let mut failed = false;
                    while let Some(item) = events.next().await {
                        match item {
                            NormalizedEvent::Step(event) => {
                                yield event.clone();
                                last = Some(event);
                            }
                            NormalizedEvent::Failed { event, error } => {
                                error!(
                                    conversation = %key,
                                    %run_id,
                                    state = %SessionState::Error,
                                    error = %error,
                                    "Reasoning engine failed mid-run"
                                );
                                yield event;
                                failed = true;
                            }
                        }
                    }

                    if !failed {
                        commit(&conversation, last.as_ref()).await;
                        info!(conversation = %key, %run_id, state = %SessionState::Committed, "Run committed");
                    }
                }
            }
        }
    }
}

/// Append the final assistant text and, when present, the completed tool output
async fn commit(conversation: &Conversation, last: Option<&UnifiedEvent>) {
    let assistant_text = last
        .and_then(|event| event.assistant_output.clone())
        .unwrap_or_default();
    conversation
        .append(ConversationMessage::assistant(assistant_text))
        .await;

    if let Some(action) = last.and_then(UnifiedEvent::completed_action) {
        let output = action.tool_output.as_text().unwrap_or_default();
        conversation
            .append(ConversationMessage::tool(&action.tool_name, output))
            .await;
    }
}
