// ABOUTME: Single-use stream tokens bound to pending runs
// ABOUTME: Issues URL-safe random tokens, redeems them destructively, purges them by age
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::RngCore;
use tracing::debug;

use startup_mentor_core::constants::lifetimes::TOKEN_ENTROPY_BYTES;
use startup_mentor_core::models::PendingRun;

use super::cutoff;

/// Concurrent map from opaque token to the run it unlocks
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    pending: Arc<DashMap<String, PendingRun>>,
}

impl TokenStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a token with secure random bytes
    fn generate_token() -> String {
        let mut bytes = [0u8; TOKEN_ENTROPY_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Mint a token for a submitted turn and remember the run
    pub fn issue(&self, user_id: i64, conversation_id: i64, text: impl Into<String>) -> PendingRun {
        let pending = PendingRun {
            token: Self::generate_token(),
            user_id,
            conversation_id,
            text: text.into(),
            created_at: Utc::now(),
        };
        self.pending.insert(pending.token.clone(), pending.clone());
        debug!(user_id, conversation_id, "Issued stream token");
        pending
    }

    /// Remove and return the run bound to `token`.
    ///
    /// Removal is a single map operation, so of any number of concurrent
    /// callers with the same token exactly one receives the run.
    pub fn redeem(&self, token: &str) -> Option<PendingRun> {
        self.pending.remove(token).map(|(_, pending)| pending)
    }

    /// Number of unredeemed tokens
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no tokens are outstanding
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove tokens issued at least `ttl` ago
    pub fn purge_expired(&self, ttl: Duration) -> usize {
        self.purge_expired_at(ttl, Utc::now())
    }

    /// Purge against an explicit clock reading. Returns the number removed.
    pub fn purge_expired_at(&self, ttl: Duration, now: DateTime<Utc>) -> usize {
        let Some(cutoff) = cutoff(now, ttl) else {
            return 0;
        };
        let before = self.pending.len();
        self.pending.retain(|_, pending| pending.created_at > cutoff);
        let removed = before.saturating_sub(self.pending.len());
        if removed > 0 {
            debug!(removed, "Purged expired stream tokens");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use std::collections::HashSet;

    #[test]
    fn test_tokens_are_url_safe_and_unique() {
        let store = TokenStore::new();
        let tokens: HashSet<_> = (0..200).map(|i| store.issue(1, i, "x").token).collect();
        assert_eq!(tokens.len(), 200);
        for token in &tokens {
            // 24 bytes -> 32 base64 characters, no padding
            assert_eq!(token.len(), 32);
            assert!(token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        }
    }

    #[test]
    fn test_redeem_is_single_use() {
        let store = TokenStore::new();
        let pending = store.issue(1, 123, "idea");

        let redeemed = store.redeem(&pending.token).unwrap();
        assert_eq!(redeemed, pending);
        assert!(store.redeem(&pending.token).is_none());
        assert!(store.redeem("never-issued").is_none());
    }

    #[test]
    fn test_purge_boundary_is_inclusive() {
        let store = TokenStore::new();
        let pending = store.issue(1, 1, "a");
        let ttl = Duration::from_secs(300);

        let just_before = pending.created_at + ChronoDuration::seconds(299);
        assert_eq!(store.purge_expired_at(ttl, just_before), 0);
        assert_eq!(store.len(), 1);

        let exactly = pending.created_at + ChronoDuration::seconds(300);
        assert_eq!(store.purge_expired_at(ttl, exactly), 1);
        assert!(store.redeem(&pending.token).is_none());
    }

    #[tokio::test]
    async fn test_concurrent_redeem_has_one_winner() {
        let store = TokenStore::new();
        let token = store.issue(5, 6, "race").token;

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                let token = token.clone();
                tokio::spawn(async move { store.redeem(&token).is_some() })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
