// ABOUTME: Unified event model streamed to clients for every step of a run
// ABOUTME: Internal action/tool-output types plus the camelCase wire representation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

use serde::{Deserialize, Serialize};
use serde_json::Value;

use startup_mentor_core::models::ConversationKey;

/// Output of an identified tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutput {
    /// The tool was requested but its result has not arrived
    Pending,
    /// The tool's result
    Ready(Value),
}

impl ToolOutput {
    /// Whether the result has arrived
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Text form used when committing to the transcript (`None` while pending)
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Pending => None,
            Self::Ready(Value::String(text)) => Some(text.clone()),
            Self::Ready(other) => Some(other.to_string()),
        }
    }
}

/// The tool invocation identified for the current step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolAction {
    /// Tool name
    pub tool_name: String,
    /// Decoded tool arguments
    pub tool_input: Value,
    /// Tool result or the pending marker
    pub tool_output: ToolOutput,
}

impl ToolAction {
    /// A freshly requested tool with no result yet
    #[must_use]
    pub fn pending(tool_name: impl Into<String>, tool_input: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_input,
            tool_output: ToolOutput::Pending,
        }
    }
}

/// One normalized step of a run, as relayed to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "WireEvent")]
pub struct UnifiedEvent {
    /// Owning user
    pub user_id: i64,
    /// Conversation the run belongs to
    pub conversation_id: i64,
    /// Latest assistant text
    pub assistant_output: Option<String>,
    /// Current tool action; `None` means no tool used in this step
    pub action: Option<ToolAction>,
}

impl UnifiedEvent {
    /// Event with empty assistant text and no action
    #[must_use]
    pub fn empty(key: ConversationKey) -> Self {
        Self {
            user_id: key.user_id,
            conversation_id: key.conversation_id,
            assistant_output: Some(String::new()),
            action: None,
        }
    }

    /// Conversation this event belongs to
    #[must_use]
    pub const fn key(&self) -> ConversationKey {
        ConversationKey::new(self.user_id, self.conversation_id)
    }

    /// Action carrying a delivered tool result, if any
    #[must_use]
    pub fn completed_action(&self) -> Option<&ToolAction> {
        self.action
            .as_ref()
            .filter(|action| action.tool_output.is_ready())
    }
}

/// Client-facing JSON shape of a [`UnifiedEvent`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEvent {
    /// Owning user
    pub user_id: i64,
    /// Conversation id, camelCase on the wire
    #[serde(rename = "conversationId", alias = "conversation_id")]
    pub conversation_id: i64,
    /// Assistant text
    pub output: Option<String>,
    /// Tool action; all fields null when no tool was used
    pub action: WireAction,
}

/// Client-facing JSON shape of a tool action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireAction {
    /// Tool name
    pub tool: Option<String>,
    /// Tool arguments
    pub tool_input: Option<Value>,
    /// Tool result; an empty string while the result is pending
    pub tool_output: Option<Value>,
}

impl From<Option<ToolAction>> for WireAction {
    fn from(action: Option<ToolAction>) -> Self {
        action.map_or_else(Self::default, |action| Self {
            tool: Some(action.tool_name),
            tool_input: Some(action.tool_input),
            tool_output: Some(match action.tool_output {
                ToolOutput::Pending => Value::String(String::new()),
                ToolOutput::Ready(value) => value,
            }),
        })
    }
}

impl From<UnifiedEvent> for WireEvent {
    fn from(event: UnifiedEvent) -> Self {
        Self {
            user_id: event.user_id,
            conversation_id: event.conversation_id,
            output: event.assistant_output,
            action: event.action.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_event_wire_shape() {
        let event = UnifiedEvent::empty(ConversationKey::new(1, 123));
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "user_id": 1,
                "conversationId": 123,
                "output": "",
                "action": {"tool": null, "tool_input": null, "tool_output": null}
            })
        );
    }

    #[test]
    fn test_pending_and_ready_outputs() {
        let mut event = UnifiedEvent {
            action: Some(ToolAction::pending("X", json!({"a": 1}))),
            ..UnifiedEvent::empty(ConversationKey::new(2, 3))
        };
        let wire = serde_json::to_value(&event).unwrap();
        assert_eq!(wire["action"]["tool_output"], json!(""));
        assert!(event.completed_action().is_none());

        if let Some(action) = event.action.as_mut() {
            action.tool_output = ToolOutput::Ready(json!("R"));
        }
        let wire = serde_json::to_value(&event).unwrap();
        assert_eq!(
            wire["action"],
            json!({"tool": "X", "tool_input": {"a": 1}, "tool_output": "R"})
        );
        assert!(event.completed_action().is_some());
    }

    #[test]
    fn test_wire_event_accepts_snake_case_id() {
        let wire: WireEvent = serde_json::from_value(json!({
            "user_id": 4,
            "conversation_id": 5,
            "output": null,
            "action": {}
        }))
        .unwrap();
        assert_eq!(wire.conversation_id, 5);
        assert_eq!(wire.action, WireAction::default());
    }

    #[test]
    fn test_output_text_for_commit() {
        assert_eq!(ToolOutput::Pending.as_text(), None);
        assert_eq!(ToolOutput::Ready(json!("plain")).as_text().as_deref(), Some("plain"));
        assert_eq!(
            ToolOutput::Ready(json!({"score": 7})).as_text().as_deref(),
            Some(r#"{"score":7}"#)
        );
    }
}
