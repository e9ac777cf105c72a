// ABOUTME: Configuration module root
// ABOUTME: Environment-driven server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

/// Environment-based configuration
pub mod environment;

pub use environment::{AnalysisToolConfig, CorsConfig, LifetimeConfig, LlmConfig, ServerConfig};
