// ABOUTME: Process-scoped in-memory stores shared by submit and stream handlers
// ABOUTME: Conversation transcripts and single-use pending-run tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

/// Conversation transcripts
pub mod conversation;
/// Pending-run tokens
pub mod tokens;

pub use conversation::{Conversation, ConversationStore};
pub use tokens::TokenStore;

use chrono::{DateTime, Utc};
use std::time::Duration;

/// `now - ttl`, or `None` when the TTL is too large to represent (nothing expires)
pub(crate) fn cutoff(now: DateTime<Utc>, ttl: Duration) -> Option<DateTime<Utc>> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_sub_signed(ttl))
}
