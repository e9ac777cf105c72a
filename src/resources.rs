// ABOUTME: Process-scoped resource container built once at startup
// ABOUTME: Holds config, both stores, the optional reasoning engine, and the session driver
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

//! # Server Resources
//!
//! Everything shared between handlers and the background sweeper lives here
//! and is passed to routes as axum state. Nothing is global.

use std::sync::Arc;

use tracing::{info, warn};

use crate::agent::{MentorAgent, ReasoningEngine};
use crate::config::ServerConfig;
use crate::errors::AppResult;
use crate::llm::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
use crate::session::SessionDriver;
use crate::stores::{ConversationStore, TokenStore};
use crate::sweeper::{SweepSchedule, Sweeper};
use crate::tools::{ExternalAnalysisTool, ToolRegistry};

/// Shared server state
#[derive(Clone)]
pub struct ServerResources {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Conversation transcripts
    pub conversations: ConversationStore,
    /// Pending-run tokens
    pub tokens: TokenStore,
    /// Submit/stream orchestration
    pub sessions: SessionDriver,
}

impl ServerResources {
    /// Build resources, including the mentor agent when a credential is configured
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client for the provider or tool cannot be created
    pub fn new(config: ServerConfig) -> AppResult<Self> {
        let engine: Option<Arc<dyn ReasoningEngine>> = if config.llm.is_configured() {
            let provider = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::from(&config.llm))?;

            let mut tools = ToolRegistry::new();
            tools.register(Arc::new(ExternalAnalysisTool::new(&config.analysis)?));
            info!("Registered {} agent tool(s)", tools.len());

            Some(Arc::new(MentorAgent::new(
                Arc::new(provider),
                Arc::new(tools),
                &config.llm,
            )))
        } else {
            warn!("Reasoning engine disabled: no API key configured");
            None
        };

        Ok(Self::with_engine(config, engine))
    }

    /// Build resources around an explicit engine (or none)
    #[must_use]
    pub fn with_engine(config: ServerConfig, engine: Option<Arc<dyn ReasoningEngine>>) -> Self {
        let conversations = ConversationStore::new();
        let tokens = TokenStore::new();
        let sessions = SessionDriver::new(conversations.clone(), tokens.clone(), engine);
        Self {
            config: Arc::new(config),
            conversations,
            tokens,
            sessions,
        }
    }

    /// Start the background sweeper over this instance's stores
    #[must_use]
    pub fn spawn_sweeper(&self) -> Sweeper {
        Sweeper::spawn(
            self.conversations.clone(),
            self.tokens.clone(),
            SweepSchedule::from(&self.config.lifetimes),
        )
    }
}
