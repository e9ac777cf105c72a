// ABOUTME: Conversation transcript message and pending-run record types
// ABOUTME: Immutable DTOs owned by the in-memory conversation and token stores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the founder
    User,
    /// Reply produced by the mentor agent
    Assistant,
    /// Output of a tool invoked during a run
    Tool,
    /// System instruction
    System,
}

impl MessageRole {
    /// Lowercase wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
            Self::System => "system",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a conversation transcript. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Who produced the message
    pub role: MessageRole,
    /// Message text
    pub content: String,
    /// Tool that produced the content (tool-role messages only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    /// When the message was appended
    pub timestamp: DateTime<Utc>,
}

impl ConversationMessage {
    /// Create a message stamped with the current time
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_name: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Create a tool message carrying the tool's name and output
    #[must_use]
    pub fn tool(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: Some(tool_name.into()),
            ..Self::new(MessageRole::Tool, output)
        }
    }
}

/// Key of a conversation transcript: `(user_id, conversation_id)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationKey {
    /// Owning user
    pub user_id: i64,
    /// Conversation within the user's space
    pub conversation_id: i64,
}

impl ConversationKey {
    /// Build a key
    #[must_use]
    pub const fn new(user_id: i64, conversation_id: i64) -> Self {
        Self {
            user_id,
            conversation_id,
        }
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.conversation_id)
    }
}

/// A submitted turn waiting for its stream to be opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRun {
    /// Single-use opaque stream token
    pub token: String,
    /// Owning user
    pub user_id: i64,
    /// Target conversation
    pub conversation_id: i64,
    /// Submitted text
    pub text: String,
    /// When the token was issued
    pub created_at: DateTime<Utc>,
}

impl PendingRun {
    /// Conversation this run belongs to
    #[must_use]
    pub const fn key(&self) -> ConversationKey {
        ConversationKey::new(self.user_id, self.conversation_id)
    }
}
