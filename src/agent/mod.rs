// ABOUTME: Reasoning engine contract and the ReAct-style mentor agent implementing it
// ABOUTME: Alternates model calls and tool executions, emitting one raw step update per stage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

//! # Reasoning Engine
//!
//! Given a `{role, content}` history the engine yields a finite, lazy stream
//! of [`StepUpdate`]s. [`MentorAgent`] runs the loop:
//!
//! 1. call the model with the history and the tool declarations;
//! 2. emit an `agent` step with the assistant text and any tool calls;
//! 3. if a tool was requested, run the first one, emit a `tools` step with
//!    its result, feed the result back, and repeat.

/// Mentor system prompt
pub mod prompts;

pub use prompts::get_mentor_system_prompt;

use std::pin::Pin;
use std::sync::Arc;

use async_stream::stream;
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use startup_mentor_core::models::{ConversationMessage, MessageRole};

use crate::config::LlmConfig;
use crate::errors::AppResult;
use crate::llm::{ChatMessage, ChatProvider, ChatRequest, FunctionCall};
use crate::runs::{RawFunction, RawToolCall, StageMessage, StepUpdate, ToolArguments};
use crate::tools::ToolRegistry;

/// Stream of raw step updates for one run
pub type StepStream = Pin<Box<dyn Stream<Item = AppResult<StepUpdate>> + Send>>;

/// One history entry handed to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    /// Transcript role
    pub role: MessageRole,
    /// Message text
    pub content: String,
}

impl From<&ConversationMessage> for HistoryMessage {
    fn from(message: &ConversationMessage) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// External reasoning engine: history in, lazy step updates out
pub trait ReasoningEngine: Send + Sync {
    /// Start a run over `history`
    fn run(&self, history: Vec<HistoryMessage>) -> StepStream;
}

/// ReAct-style agent over a chat provider and a tool registry
pub struct MentorAgent {
    provider: Arc<dyn ChatProvider>,
    tools: Arc<ToolRegistry>,
    model: String,
    temperature: f32,
    max_iterations: usize,
}

impl MentorAgent {
    /// Build an agent from engine settings
    #[must_use]
    pub fn new(provider: Arc<dyn ChatProvider>, tools: Arc<ToolRegistry>, config: &LlmConfig) -> Self {
        Self {
            provider,
            tools,
            model: config.model.clone(),
            temperature: config.temperature,
            max_iterations: config.max_iterations.max(1),
        }
    }

    /// System prompt followed by the history. System and assistant roles keep
    /// their role; everything else is sent as user input.
    fn build_llm_messages(history: &[HistoryMessage]) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(get_mentor_system_prompt()));
        messages.extend(history.iter().map(|entry| match entry.role {
            MessageRole::System => ChatMessage::system(&entry.content),
            MessageRole::Assistant => ChatMessage::assistant(&entry.content),
            MessageRole::User | MessageRole::Tool => ChatMessage::user(&entry.content),
        }));
        messages
    }

    /// Agent-stage message mirroring the model's reply
    fn agent_message(content: &str, calls: &[FunctionCall]) -> StageMessage {
        StageMessage::text(content).with_tool_calls(
            calls
                .iter()
                .map(|call| RawToolCall::Function {
                    function: RawFunction::new(&call.name, &call.arguments),
                    id: call.id.clone(),
                })
                .collect(),
        )
    }

    /// Run one tool call; failures become an `{"error": ...}` payload
    async fn execute_call(tools: &ToolRegistry, call: &FunctionCall) -> String {
        let arguments = if call.arguments.trim().is_empty() {
            ToolArguments::Parsed(json!({}))
        } else {
            ToolArguments::decode(&Value::String(call.arguments.clone()))
        };

        let outcome = match arguments {
            ToolArguments::Parsed(args) => tools.execute(&call.name, args).await,
            ToolArguments::Raw(raw) => Err(crate::errors::AppError::invalid_input(format!(
                "Tool arguments are not valid JSON: {raw}"
            ))),
        };

        match outcome {
            Ok(Value::String(text)) => text,
            Ok(value) => value.to_string(),
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                json!({ "error": e.message }).to_string()
            }
        }
    }
}

impl ReasoningEngine for MentorAgent {
    fn run(&self, history: Vec<HistoryMessage>) -> StepStream {
        let provider = Arc::clone(&self.provider);
        let tools = Arc::clone(&self.tools);
        let model = self.model.clone();
        let temperature = self.temperature;
        let max_iterations = self.max_iterations;

        Box::pin(stream! {
            info!(provider = provider.name(), model = %model, "Starting mentor run");
            let mut llm_messages = Self::build_llm_messages(&history);
            let declarations = tools.declarations();
            let mut finished = false;

            for iteration in 0..max_iterations {
                let request = ChatRequest::new(llm_messages.clone())
                    .with_model(model.clone())
                    .with_temperature(temperature);
                let response = match provider.complete_with_tools(&request, &declarations).await {
                    Ok(response) => response,
                    Err(e) => {
                        yield Err(e);
                        finished = true;
                        break;
                    }
                };

                let content = response.content.clone().unwrap_or_default();
                let calls = response.calls().to_vec();
                yield Ok(StepUpdate::agent(Self::agent_message(&content, &calls)));

                let Some(call) = calls.first() else {
                    debug!(iteration, "Model answered without tool calls");
                    finished = true;
                    break;
                };
                if calls.len() > 1 {
                    warn!(
                        requested = calls.len(),
                        "Model requested several tools; running only '{}'", call.name
                    );
                }

                info!(iteration, tool = %call.name, "Executing tool");
                let result = Self::execute_call(&tools, call).await;
                yield Ok(StepUpdate::tools(StageMessage::tool_result(&call.name, result.clone())));

                if !content.is_empty() {
                    llm_messages.push(ChatMessage::assistant(content));
                }
                llm_messages.push(ChatMessage::user(format!(
                    "[Tool Result for {}]: {}",
                    call.name, result
                )));
            }

            if !finished {
                warn!(max_iterations, "Agent stopped at the iteration limit");
            }
        })
    }
}
