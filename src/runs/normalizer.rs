// ABOUTME: Run Event Normalizer turning raw engine steps into unified client events
// ABOUTME: Tracks the open tool action across steps and merges tool results into it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

//! One [`UnifiedEvent`] is produced per raw step, in arrival order. State
//! carried between steps:
//!
//! - an agent step replaces the assistant text and opens a new action (or
//!   clears it when no tool was requested);
//! - a tools step fills the open action's output and keeps the assistant text.

use async_stream::stream;
use futures_util::{Stream, StreamExt};
use serde_json::{json, Value};
use tracing::{debug, warn};

use startup_mentor_core::constants::engine::UNKNOWN_TOOL_NAME;
use startup_mentor_core::models::ConversationKey;

use super::event::{ToolAction, ToolOutput, UnifiedEvent};
use super::step::StepUpdate;
use super::tool_call::ToolCallRequest;
use crate::errors::{AppError, AppResult};

/// Item produced by [`normalize_run`]
#[derive(Debug)]
pub enum NormalizedEvent {
    /// Event for one raw step
    Step(UnifiedEvent),
    /// The engine failed; `event` is the degraded terminal event to relay
    Failed {
        /// Last known state with any pending tool output replaced by the error
        event: UnifiedEvent,
        /// What went wrong
        error: AppError,
    },
}

/// Running state of a single run
#[derive(Debug, Clone)]
pub struct RunNormalizer {
    key: ConversationKey,
    assistant_output: String,
    action: Option<ToolAction>,
    steps: usize,
}

impl RunNormalizer {
    /// Fresh state for a run on `key`
    #[must_use]
    pub const fn new(key: ConversationKey) -> Self {
        Self {
            key,
            assistant_output: String::new(),
            action: None,
            steps: 0,
        }
    }

    /// Fold one raw step into the state and return the event for it
    pub fn apply(&mut self, step: StepUpdate) -> UnifiedEvent {
        self.steps += 1;
        match &step {
            StepUpdate::Agent(_) => self.apply_agent(&step),
            StepUpdate::Tools(_) => self.apply_tools(&step),
        }
        self.snapshot()
    }

    fn apply_agent(&mut self, step: &StepUpdate) {
        let Some(message) = step.first_message() else {
            self.assistant_output.clear();
            self.action = None;
            return;
        };

        self.assistant_output.clone_from(&message.content);
        self.action = ToolCallRequest::decode(message)
            .into_parts()
            .map(|(name, input)| {
                debug!(tool = %name, step = self.steps, "Agent step opened tool action");
                ToolAction::pending(name, input)
            });
    }

    fn apply_tools(&mut self, step: &StepUpdate) {
        let result = step
            .first_message()
            .map(|message| message.content.clone())
            .unwrap_or_default();

        if let Some(action) = self.action.as_mut() {
            action.tool_output = ToolOutput::Ready(Value::String(result));
        } else {
            warn!(
                conversation = %self.key,
                step = self.steps,
                "Tool result arrived with no open action; reporting it under an unknown tool"
            );
            self.action = Some(ToolAction {
                tool_name: UNKNOWN_TOOL_NAME.to_owned(),
                tool_input: Value::Null,
                tool_output: ToolOutput::Ready(Value::String(result)),
            });
        }
    }

    /// Event reflecting the current state
    #[must_use]
    pub fn snapshot(&self) -> UnifiedEvent {
        UnifiedEvent {
            user_id: self.key.user_id,
            conversation_id: self.key.conversation_id,
            assistant_output: Some(self.assistant_output.clone()),
            action: self.action.clone(),
        }
    }

    /// Terminal event after an engine failure: a pending tool output becomes an error object
    pub fn degrade(&mut self, error: &AppError) -> UnifiedEvent {
        if let Some(action) = self.action.as_mut() {
            if !action.tool_output.is_ready() {
                action.tool_output = ToolOutput::Ready(json!({ "error": error.message }));
            }
        }
        self.snapshot()
    }

    /// Number of steps applied so far
    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }
}

/// Lazily normalize an engine step stream. Single pass, forward only.
///
/// The output ends when the input ends, or right after a
/// [`NormalizedEvent::Failed`] when the input yields an error.
pub fn normalize_run<S>(key: ConversationKey, steps: S) -> impl Stream<Item = NormalizedEvent> + Send
where
    S: Stream<Item = AppResult<StepUpdate>> + Send + 'static,
{
    stream! {
        let mut normalizer = RunNormalizer::new(key);
        futures_util::pin_mut!(steps);
        while let Some(step) = steps.next().await {
            match step {
                Ok(step) => yield NormalizedEvent::Step(normalizer.apply(step)),
                Err(error) => {
                    let event = normalizer.degrade(&error);
                    yield NormalizedEvent::Failed { event, error };
                    break;
                }
            }
        }
    }
}
