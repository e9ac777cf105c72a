// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Defaults for session lifetimes, the reasoning engine, and the analysis tool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

//! Constants grouped by domain. Every default here has a matching environment
//! variable name in [`env_config`].

/// Session and transcript lifetimes
pub mod lifetimes {
    /// How long an issued stream token stays redeemable
    pub const DEFAULT_TOKEN_TTL_SECS: u64 = 300;
    /// How long a conversation survives without user activity
    pub const DEFAULT_CONVERSATION_TTL_SECS: u64 = 60 * 60 * 24;
    /// Background purge interval
    pub const DEFAULT_PURGE_INTERVAL_SECS: u64 = 30;
    /// Random bytes behind each stream token (192 bits)
    pub const TOKEN_ENTROPY_BYTES: usize = 24;
}

/// Reasoning engine defaults
pub mod engine {
    /// Default chat model
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
    /// Default OpenAI-compatible endpoint
    pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
    /// Sampling temperature used by the mentor agent
    pub const DEFAULT_TEMPERATURE: f32 = 0.2;
    /// Upper bound on model/tool round trips in a single run
    pub const DEFAULT_MAX_ITERATIONS: usize = 10;
    /// Tool name reported for a tool result with no open action
    pub const UNKNOWN_TOOL_NAME: &str = "unknown";
}

/// External analysis tool defaults
pub mod analysis {
    /// Registered tool name
    pub const TOOL_NAME: &str = "external_market_product_founder_analysis";
    /// Default analysis endpoint
    pub const DEFAULT_API_URL: &str = "http://82.115.18.200/api/v1/analyze";
    /// Request timeout
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
    /// Default `analysis_mode` argument
    pub const DEFAULT_MODE: &str = "advanced";
}

/// Network defaults
pub mod network {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
    /// Default bind address
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    /// SSE keep-alive interval
    pub const SSE_KEEPALIVE_SECS: u64 = 15;
}

/// Service identification for logs
pub mod service_names {
    /// Service name used in structured logs
    pub const STARTUP_MENTOR: &str = "startup-mentor";
}

/// Environment variable names
pub mod env_config {
    /// HTTP port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Bind address
    pub const HOST: &str = "HOST";
    /// Token TTL in seconds
    pub const TOKEN_TTL_SECONDS: &str = "TOKEN_TTL_SECONDS";
    /// Conversation TTL in seconds
    pub const CONVERSATION_TTL_SECONDS: &str = "CONVERSATION_TTL_SECONDS";
    /// Purge interval in seconds
    pub const PURGE_INTERVAL_SECONDS: &str = "PURGE_INTERVAL_SECONDS";
    /// Reasoning engine credential
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    /// Reasoning engine model identifier
    pub const MODEL_NAME: &str = "MODEL_NAME";
    /// Reasoning engine endpoint
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    /// Sampling temperature
    pub const LLM_TEMPERATURE: &str = "LLM_TEMPERATURE";
    /// Agent loop bound
    pub const MAX_AGENT_ITERATIONS: &str = "MAX_AGENT_ITERATIONS";
    /// Analysis tool endpoint
    pub const ANALYSIS_API_URL: &str = "ANALYSIS_API_URL";
    /// Analysis tool timeout
    pub const ANALYSIS_TIMEOUT_SECONDS: &str = "ANALYSIS_TIMEOUT_SECONDS";
    /// Comma-separated CORS origins
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
}
