// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Loads TTLs, purge interval, reasoning engine and analysis tool settings from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

//! Environment-based configuration. There is no configuration file: every
//! setting has a default and can be overridden by an environment variable.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use startup_mentor_core::constants::{analysis, engine, env_config, lifetimes, network};

/// Session and transcript lifetimes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifetimeConfig {
    /// Token TTL in seconds; also reported to clients as `expires_in`
    pub token_ttl_secs: u64,
    /// Conversation TTL measured from the last user message
    pub conversation_ttl_secs: u64,
    /// Interval between background purges
    pub purge_interval_secs: u64,
}

impl LifetimeConfig {
    /// Token TTL as a `Duration`
    #[must_use]
    pub const fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    /// Conversation TTL as a `Duration`
    #[must_use]
    pub const fn conversation_ttl(&self) -> Duration {
        Duration::from_secs(self.conversation_ttl_secs)
    }

    /// Purge interval as a `Duration`
    #[must_use]
    pub const fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_secs)
    }
}

impl Default for LifetimeConfig {
    fn default() -> Self {
        Self {
            token_ttl_secs: lifetimes::DEFAULT_TOKEN_TTL_SECS,
            conversation_ttl_secs: lifetimes::DEFAULT_CONVERSATION_TTL_SECS,
            purge_interval_secs: lifetimes::DEFAULT_PURGE_INTERVAL_SECS,
        }
    }
}

/// Reasoning engine (LLM) settings
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    /// API credential; `None` means the engine is not configured
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// OpenAI-compatible base URL
    pub base_url: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum model/tool round trips per run
    pub max_iterations: usize,
}

impl LlmConfig {
    /// Whether a credential is present
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: engine::DEFAULT_MODEL.to_owned(),
            base_url: engine::DEFAULT_BASE_URL.to_owned(),
            temperature: engine::DEFAULT_TEMPERATURE,
            max_iterations: engine::DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// External analysis tool settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisToolConfig {
    /// Endpoint receiving the analysis POST
    pub api_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AnalysisToolConfig {
    fn default() -> Self {
        Self {
            api_url: analysis::DEFAULT_API_URL.to_owned(),
            timeout_secs: analysis::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// CORS settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// Comma-separated origins or `*`
    pub allowed_origins: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: "*".to_owned(),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// Token and conversation lifetimes
    pub lifetimes: LifetimeConfig,
    /// Reasoning engine settings
    pub llm: LlmConfig,
    /// Analysis tool settings
    pub analysis: AnalysisToolConfig,
    /// CORS settings
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: network::DEFAULT_HOST.to_owned(),
            http_port: network::DEFAULT_HTTP_PORT,
            lifetimes: LifetimeConfig::default(),
            llm: LlmConfig::default(),
            analysis: AnalysisToolConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Unparseable numeric values fall back to their defaults with a warning,
    /// so this never fails.
    #[must_use]
    pub fn from_env() -> Self {
        info!("Loading configuration from environment variables");

        let config = Self {
            host: env_var_or(env_config::HOST, network::DEFAULT_HOST),
            http_port: parse_env_or(env_config::HTTP_PORT, network::DEFAULT_HTTP_PORT),
            lifetimes: LifetimeConfig {
                token_ttl_secs: parse_env_or(
                    env_config::TOKEN_TTL_SECONDS,
                    lifetimes::DEFAULT_TOKEN_TTL_SECS,
                ),
                conversation_ttl_secs: parse_env_or(
                    env_config::CONVERSATION_TTL_SECONDS,
                    lifetimes::DEFAULT_CONVERSATION_TTL_SECS,
                ),
                purge_interval_secs: parse_env_or(
                    env_config::PURGE_INTERVAL_SECONDS,
                    lifetimes::DEFAULT_PURGE_INTERVAL_SECS,
                )
                .max(1),
            },
            llm: LlmConfig {
                api_key: env::var(env_config::OPENAI_API_KEY)
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
                model: env_var_or(env_config::MODEL_NAME, engine::DEFAULT_MODEL),
                base_url: env_var_or(env_config::OPENAI_BASE_URL, engine::DEFAULT_BASE_URL),
                temperature: parse_env_or(env_config::LLM_TEMPERATURE, engine::DEFAULT_TEMPERATURE),
                max_iterations: parse_env_or(
                    env_config::MAX_AGENT_ITERATIONS,
                    engine::DEFAULT_MAX_ITERATIONS,
                )
                .max(1),
            },
            analysis: AnalysisToolConfig {
                api_url: env_var_or(env_config::ANALYSIS_API_URL, analysis::DEFAULT_API_URL),
                timeout_secs: parse_env_or(
                    env_config::ANALYSIS_TIMEOUT_SECONDS,
                    analysis::DEFAULT_TIMEOUT_SECS,
                ),
            },
            cors: CorsConfig {
                allowed_origins: env_var_or(env_config::CORS_ALLOWED_ORIGINS, "*"),
            },
        };

        if !config.llm.is_configured() {
            warn!(
                "{} is not set; every stream will report the engine as not configured",
                env_config::OPENAI_API_KEY
            );
        }

        config
    }

    /// One-line summary for startup logs (never includes the credential)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Startup Mentor Configuration: bind={}:{}, token_ttl={}s, conversation_ttl={}s, \
             purge_interval={}s, model={}, llm={}, analysis_url={}",
            self.host,
            self.http_port,
            self.lifetimes.token_ttl_secs,
            self.lifetimes.conversation_ttl_secs,
            self.lifetimes.purge_interval_secs,
            self.llm.model,
            if self.llm.is_configured() {
                "Configured"
            } else {
                "Not configured"
            },
            self.analysis.api_url,
        )
    }
}

/// Get an environment variable or a default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset or invalid
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid value {raw:?} for {key}, using default {default}");
            default
        }),
        Err(_) => default,
    }
}
