// ABOUTME: In-memory conversation transcripts keyed by (user_id, conversation_id)
// ABOUTME: Append-only message log with activity tracking and TTL purge on user silence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use startup_mentor_core::models::{ConversationKey, ConversationMessage, MessageRole};

use super::cutoff;

#[derive(Debug)]
struct TranscriptState {
    messages: Vec<ConversationMessage>,
    last_activity: DateTime<Utc>,
    last_user_activity: DateTime<Utc>,
}

/// An append-only transcript for one `(user, conversation)` pair.
///
/// Handed out as `Arc<Conversation>`; every holder sees the same instance.
#[derive(Debug)]
pub struct Conversation {
    key: ConversationKey,
    state: RwLock<TranscriptState>,
}

impl Conversation {
    fn new(key: ConversationKey, now: DateTime<Utc>) -> Self {
        Self {
            key,
            state: RwLock::new(TranscriptState {
                messages: Vec::new(),
                last_activity: now,
                last_user_activity: now,
            }),
        }
    }

    /// Key of this transcript
    #[must_use]
    pub const fn key(&self) -> ConversationKey {
        self.key
    }

    /// Owning user
    #[must_use]
    pub const fn user_id(&self) -> i64 {
        self.key.user_id
    }

    /// Conversation identifier
    #[must_use]
    pub const fn conversation_id(&self) -> i64 {
        self.key.conversation_id
    }

    /// Append a message.
    ///
    /// `last_activity` advances to the message timestamp for every role;
    /// `last_user_activity` only moves for user messages.
    pub async fn append(&self, message: ConversationMessage) {
        let mut state = self.state.write().await;
        let at = message.timestamp;
        state.last_activity = state.last_activity.max(at);
        if message.role == MessageRole::User {
            state.last_user_activity = at;
        }
        state.messages.push(message);
    }

    /// Snapshot of the messages in append order
    pub async fn messages(&self) -> Vec<ConversationMessage> {
        self.state.read().await.messages.clone()
    }

    /// Number of messages
    pub async fn len(&self) -> usize {
        self.state.read().await.messages.len()
    }

    /// Whether nothing has been appended yet
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.messages.is_empty()
    }

    /// Time of the most recent append of any role
    pub async fn last_activity(&self) -> DateTime<Utc> {
        self.state.read().await.last_activity
    }

    /// Time of the most recent user message (creation time if none)
    pub async fn last_user_activity(&self) -> DateTime<Utc> {
        self.state.read().await.last_user_activity
    }
}

/// Concurrent registry of transcripts
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    conversations: Arc<RwLock<HashMap<ConversationKey, Arc<Conversation>>>>,
}

impl ConversationStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the transcript for the key, creating an empty one on first access.
    ///
    /// Creation happens under the store's write lock, so concurrent callers
    /// for the same key all receive the same `Arc`.
    pub async fn get_or_create(&self, user_id: i64, conversation_id: i64) -> Arc<Conversation> {
        let key = ConversationKey::new(user_id, conversation_id);
        let mut conversations = self.conversations.write().await;
        Arc::clone(conversations.entry(key).or_insert_with(|| {
            debug!(conversation = %key, "Creating conversation transcript");
            Arc::new(Conversation::new(key, Utc::now()))
        }))
    }

    /// Look up a transcript without creating it
    pub async fn get(&self, user_id: i64, conversation_id: i64) -> Option<Arc<Conversation>> {
        let key = ConversationKey::new(user_id, conversation_id);
        self.conversations.read().await.get(&key).cloned()
    }

    /// Number of live transcripts
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    /// Whether the store holds no transcripts
    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }

    /// Remove transcripts whose last user message is older than `now - ttl`
    pub async fn purge_expired(&self, ttl: Duration) -> usize {
        self.purge_expired_at(ttl, Utc::now()).await
    }

    /// Purge against an explicit clock reading. Returns the number removed.
    pub async fn purge_expired_at(&self, ttl: Duration, now: DateTime<Utc>) -> usize {
        let Some(cutoff) = cutoff(now, ttl) else {
            return 0;
        };

        // Holding the map write lock while reading each transcript keeps a
        // concurrent get_or_create from handing out an entry about to be dropped.
        let mut conversations = self.conversations.write().await;
        let mut expired = Vec::new();
        for (key, conversation) in conversations.iter() {
            if conversation.last_user_activity().await < cutoff {
                expired.push(*key);
            }
        }
        for key in &expired {
            conversations.remove(key);
        }

        if !expired.is_empty() {
            debug!(removed = expired.len(), "Purged idle conversations");
        }
        expired.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn message_at(role: MessageRole, at: DateTime<Utc>) -> ConversationMessage {
        ConversationMessage {
            timestamp: at,
            ..ConversationMessage::new(role, "text")
        }
    }

    #[tokio::test]
    async fn test_get_or_create_returns_same_instance() {
        let store = ConversationStore::new();
        let first = store.get_or_create(1, 123).await;
        let second = store.get_or_create(1, 123).await;
        let other = store.get_or_create(1, 124).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_append_tracks_activity_by_role() {
        let store = ConversationStore::new();
        let conversation = store.get_or_create(7, 8).await;
        let base = Utc::now();

        conversation
            .append(message_at(MessageRole::User, base + ChronoDuration::seconds(1)))
            .await;
        conversation
            .append(message_at(MessageRole::Assistant, base + ChronoDuration::seconds(5)))
            .await;

        assert_eq!(
            conversation.last_user_activity().await,
            base + ChronoDuration::seconds(1)
        );
        assert_eq!(
            conversation.last_activity().await,
            base + ChronoDuration::seconds(5)
        );
        assert!(conversation.last_user_activity().await <= conversation.last_activity().await);

        let roles: Vec<_> = conversation
            .messages()
            .await
            .into_iter()
            .map(|m| m.role)
            .collect();
        assert_eq!(roles, vec![MessageRole::User, MessageRole::Assistant]);
    }

    #[tokio::test]
    async fn test_purge_keys_on_user_activity_only() {
        let store = ConversationStore::new();
        let now = Utc::now();
        let ttl = Duration::from_secs(60);

        let stale = store.get_or_create(1, 1).await;
        stale
            .append(message_at(MessageRole::User, now - ChronoDuration::seconds(120)))
            .await;
        // Recent assistant output must not keep the transcript alive
        stale.append(message_at(MessageRole::Assistant, now)).await;

        let fresh = store.get_or_create(1, 2).await;
        fresh
            .append(message_at(MessageRole::User, now - ChronoDuration::seconds(30)))
            .await;

        assert_eq!(store.purge_expired_at(ttl, now).await, 1);
        assert!(store.get(1, 1).await.is_none());
        assert!(store.get(1, 2).await.is_some());
    }

    #[tokio::test]
    async fn test_purge_boundary_is_exclusive() {
        let store = ConversationStore::new();
        let now = Utc::now();
        let ttl = Duration::from_secs(60);

        // Idle for exactly the TTL: kept
        let edge = store.get_or_create(2, 1).await;
        edge.append(message_at(MessageRole::User, now - ChronoDuration::seconds(60)))
            .await;

        // One second past the TTL: removed
        let past = store.get_or_create(2, 2).await;
        past.append(message_at(MessageRole::User, now - ChronoDuration::seconds(61)))
            .await;

        assert_eq!(store.purge_expired_at(ttl, now).await, 1);
        assert!(store.get(2, 1).await.is_some());
        assert!(store.get(2, 2).await.is_none());
    }

    #[tokio::test]
    async fn test_purge_recreates_fresh_transcript_afterwards() {
        let store = ConversationStore::new();
        let old = store.get_or_create(3, 3).await;
        old.append(ConversationMessage::user("hello")).await;

        let later = Utc::now() + ChronoDuration::hours(2);
        assert_eq!(store.purge_expired_at(Duration::from_secs(60), later).await, 1);

        let recreated = store.get_or_create(3, 3).await;
        assert!(!Arc::ptr_eq(&old, &recreated));
        assert!(recreated.is_empty().await);
    }
}
