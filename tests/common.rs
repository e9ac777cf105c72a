// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides a scripted reasoning engine and server resource builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `startup_mentor`

use std::sync::{Arc, Mutex, Once};

use serde_json::Value;
use startup_mentor::{
    agent::{HistoryMessage, ReasoningEngine, StepStream},
    config::ServerConfig,
    errors::AppResult,
    resources::ServerResources,
    runs::{RawToolCall, StageMessage, StepUpdate},
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Reasoning engine that replays a fixed list of step results on every run
/// and records the history it was handed
pub struct ScriptedEngine {
    script: Vec<AppResult<StepUpdate>>,
    histories: Mutex<Vec<Vec<HistoryMessage>>>,
}

impl ScriptedEngine {
    pub fn new(script: Vec<AppResult<StepUpdate>>) -> Arc<Self> {
        Arc::new(Self {
            script,
            histories: Mutex::new(Vec::new()),
        })
    }

    /// Histories received so far, one per run
    pub fn histories(&self) -> Vec<Vec<HistoryMessage>> {
        self.histories.lock().unwrap().clone()
    }
}

impl ReasoningEngine for ScriptedEngine {
    fn run(&self, history: Vec<HistoryMessage>) -> StepStream {
        self.histories.lock().unwrap().push(history);
        let steps: Vec<AppResult<StepUpdate>> = self
            .script
            .iter()
            .map(|step| match step {
                Ok(update) => Ok(update.clone()),
                Err(e) => Err(startup_mentor::errors::AppError::new(e.code, e.message.clone())),
            })
            .collect();
        Box::pin(futures_util::stream::iter(steps))
    }
}

/// Agent step carrying text and one structured tool call
pub fn agent_with_call(text: &str, tool: &str, args: Value) -> StepUpdate {
    StepUpdate::agent(StageMessage::text(text).with_tool_calls(vec![RawToolCall::structured(tool, args)]))
}

/// Agent step carrying only text
pub fn agent_text(text: &str) -> StepUpdate {
    StepUpdate::agent(StageMessage::text(text))
}

/// Tools step carrying a result
pub fn tool_result(tool: &str, result: &str) -> StepUpdate {
    StepUpdate::tools(StageMessage::tool_result(tool, result))
}

/// Config with default lifetimes and no engine credential
pub fn test_config() -> ServerConfig {
    ServerConfig::default()
}

/// Resources without a reasoning engine
pub fn unconfigured_resources() -> Arc<ServerResources> {
    init_test_logging();
    Arc::new(ServerResources::with_engine(test_config(), None))
}

/// Resources around a scripted engine
pub fn scripted_resources(engine: Arc<ScriptedEngine>) -> Arc<ServerResources> {
    init_test_logging();
    Arc::new(ServerResources::with_engine(test_config(), Some(engine as Arc<dyn ReasoningEngine>)))
}
