// ABOUTME: Route module organization for the Startup Mentor HTTP endpoints
// ABOUTME: Chat submit/stream routes and the health check
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

/// Chat submit and stream routes
pub mod chat;
/// Health check route
pub mod health;

pub use chat::{ChatRoutes, StreamQuery, SubmitRequest, TokenResponse};
pub use health::HealthRoutes;
