// ABOUTME: HTTP middleware for the chat server
// ABOUTME: CORS configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

/// CORS layer
pub mod cors;

pub use cors::setup_cors;
