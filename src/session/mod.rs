// ABOUTME: Stream session handling for submitted chat turns
// ABOUTME: Re-exports the session driver and its state machine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

/// Stream Session Driver
pub mod driver;

pub use driver::{ResolvedSession, SessionDriver, SessionState};
