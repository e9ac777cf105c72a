// ABOUTME: Raw step updates emitted by the reasoning engine during a run
// ABOUTME: Typed agent/tools stage variants with the loosely-shaped tool-call metadata they carry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

//! Step updates are the engine's side of the contract. On the wire an update
//! is a single-key mapping from stage name to payload:
//!
//! ```json
//! {"agent": {"messages": [{"content": "", "tool_calls": [{"name": "x", "args": {}}]}]}}
//! {"tools": {"messages": [{"content": "result text", "name": "x"}]}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One incremental update from the reasoning engine, tagged by stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepUpdate {
    /// Model reasoning/output: assistant text plus optional tool-call metadata
    Agent(StagePayload),
    /// Tool execution result
    Tools(StagePayload),
}

impl StepUpdate {
    /// Agent step carrying a single message
    #[must_use]
    pub fn agent(message: StageMessage) -> Self {
        Self::Agent(StagePayload {
            messages: vec![message],
        })
    }

    /// Tools step carrying a single result message
    #[must_use]
    pub fn tools(message: StageMessage) -> Self {
        Self::Tools(StagePayload {
            messages: vec![message],
        })
    }

    /// Stage name as it appears on the wire
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Agent(_) => "agent",
            Self::Tools(_) => "tools",
        }
    }

    /// First message of the payload, if any
    #[must_use]
    pub fn first_message(&self) -> Option<&StageMessage> {
        match self {
            Self::Agent(payload) | Self::Tools(payload) => payload.messages.first(),
        }
    }
}

/// Payload of a stage: a list of message-like records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StagePayload {
    /// Messages produced by the stage; only the first is consulted
    #[serde(default)]
    pub messages: Vec<StageMessage>,
}

/// A message-like record inside a stage payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageMessage {
    /// Assistant text (agent) or tool result text (tools)
    #[serde(default)]
    pub content: String,
    /// Structured tool-call list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<RawToolCall>,
    /// Provider-specific extras (fallback tool-call list, legacy function call)
    #[serde(default, skip_serializing_if = "AdditionalKwargs::is_empty")]
    pub additional_kwargs: AdditionalKwargs,
    /// Tool name on tools-stage messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl StageMessage {
    /// Plain text message
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Tool result message
    #[must_use]
    pub fn tool_result(tool_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: Some(tool_name.into()),
            ..Self::default()
        }
    }

    /// Attach a structured tool-call list
    #[must_use]
    pub fn with_tool_calls(mut self, tool_calls: Vec<RawToolCall>) -> Self {
        self.tool_calls = tool_calls;
        self
    }

    /// Attach a legacy single function call
    #[must_use]
    pub fn with_function_call(mut self, function_call: RawFunction) -> Self {
        self.additional_kwargs.function_call = Some(function_call);
        self
    }
}

/// Extra metadata some providers put next to the message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalKwargs {
    /// Tool-call list when the message's own list is empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<RawToolCall>,
    /// Legacy single function call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<RawFunction>,
}

impl AdditionalKwargs {
    /// Whether neither field is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tool_calls.is_empty() && self.function_call.is_none()
    }
}

/// An entry of a tool-call list, in any of the shapes engines emit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawToolCall {
    /// `{"name": ..., "args": {...}}`
    Structured {
        /// Tool name
        name: String,
        /// Already-structured arguments
        args: Value,
        /// Provider call id
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    /// `{"function": {"name": ..., "arguments": "..."}}`
    Function {
        /// Wrapped function call
        function: RawFunction,
        /// Provider call id
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    /// Anything else; skipped by the decoder
    Unrecognized(Value),
}

impl RawToolCall {
    /// Structured call without an id
    #[must_use]
    pub fn structured(name: impl Into<String>, args: Value) -> Self {
        Self::Structured {
            name: name.into(),
            args,
            id: None,
        }
    }
}

/// Function-call record whose arguments may be a JSON string or a value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFunction {
    /// Function (tool) name
    pub name: String,
    /// Arguments, usually a JSON-encoded string
    #[serde(default)]
    pub arguments: Value,
}

impl RawFunction {
    /// Function call with string-encoded arguments
    #[must_use]
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Value::String(arguments.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stage_tagged_deserialization() {
        let raw = json!({
            "agent": {"messages": [{
                "content": "",
                "tool_calls": [{"name": "X", "args": {"a": 1}}]
            }]}
        });
        let step: StepUpdate = serde_json::from_value(raw).unwrap();
        assert_eq!(step.stage(), "agent");
        let message = step.first_message().unwrap();
        assert_eq!(message.tool_calls, vec![RawToolCall::structured("X", json!({"a": 1}))]);

        let tools: StepUpdate =
            serde_json::from_value(json!({"tools": {"messages": [{"content": "R"}]}})).unwrap();
        assert_eq!(tools.stage(), "tools");
        assert_eq!(tools.first_message().unwrap().content, "R");
    }

    #[test]
    fn test_function_shaped_and_unknown_entries() {
        let raw = json!([
            {"id": "call_1", "function": {"name": "f", "arguments": "{\"a\":1}"}},
            {"type": "mystery"}
        ]);
        let calls: Vec<RawToolCall> = serde_json::from_value(raw).unwrap();
        assert!(matches!(&calls[0], RawToolCall::Function { function, .. } if function.name == "f"));
        assert!(matches!(calls[1], RawToolCall::Unrecognized(_)));
    }

    #[test]
    fn test_empty_payload_has_no_first_message() {
        let step: StepUpdate = serde_json::from_value(json!({"agent": {}})).unwrap();
        assert!(step.first_message().is_none());
    }
}
