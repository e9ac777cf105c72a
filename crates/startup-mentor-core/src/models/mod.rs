// ABOUTME: Core data models shared by the stores, the session driver, and the HTTP layer
// ABOUTME: Re-exports transcript message and pending-run types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

/// Transcript messages and pending-run records
pub mod conversation;

pub use conversation::{ConversationKey, ConversationMessage, MessageRole, PendingRun};
