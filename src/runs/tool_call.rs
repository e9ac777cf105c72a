// ABOUTME: Decodes the tool-call request embedded in an agent step
// ABOUTME: Collapses structured, function-wrapped, and legacy function-call shapes into one variant type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

use serde_json::Value;
use tracing::warn;

use super::step::{RawFunction, RawToolCall, StageMessage};

/// Arguments of a legacy call: parsed when the payload was valid JSON, raw text otherwise
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolArguments {
    /// Structured value (already an object, or a string that parsed)
    Parsed(Value),
    /// String payload that failed to parse, kept verbatim
    Raw(String),
}

impl ToolArguments {
    /// Decode a possibly string-encoded argument payload. Never fails.
    #[must_use]
    pub fn decode(arguments: &Value) -> Self {
        match arguments {
            Value::String(text) => serde_json::from_str(text)
                .map_or_else(|_| Self::Raw(text.clone()), Self::Parsed),
            other => Self::Parsed(other.clone()),
        }
    }

    /// Value reported as `tool_input`
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Parsed(value) => value,
            Self::Raw(text) => Value::String(text),
        }
    }
}

/// The single tool call surfaced for an agent step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCallRequest {
    /// The step requested no tool
    None,
    /// `{name, args}` with structured arguments
    Structured {
        /// Tool name
        name: String,
        /// Arguments as sent
        args: Value,
    },
    /// Function-call shape with string- or value-encoded arguments
    Legacy {
        /// Tool name
        name: String,
        /// Decoded arguments
        arguments: ToolArguments,
    },
}

impl ToolCallRequest {
    /// Decode the tool call carried by an agent-stage message.
    ///
    /// Lookup order: the message's own list, then `additional_kwargs.tool_calls`,
    /// then `additional_kwargs.function_call`. Only the first list entry is
    /// considered; the rest are logged and dropped. An unrecognizable first
    /// entry yields [`ToolCallRequest::None`].
    #[must_use]
    pub fn decode(message: &StageMessage) -> Self {
        let calls = if message.tool_calls.is_empty() {
            &message.additional_kwargs.tool_calls
        } else {
            &message.tool_calls
        };

        let Some((first, rest)) = calls.split_first() else {
            return message
                .additional_kwargs
                .function_call
                .as_ref()
                .map_or(Self::None, Self::from_function);
        };
        if !rest.is_empty() {
            let dropped: Vec<String> = rest
                .iter()
                .filter_map(Self::from_raw)
                .filter_map(|call| call.name().map(str::to_owned))
                .collect();
            warn!(
                entries = calls.len(),
                ?dropped,
                "Agent step requested several tools; only the first entry is used"
            );
        }

        Self::from_raw(first).unwrap_or_else(|| {
            warn!("Agent step carried a tool call in an unrecognized shape");
            Self::None
        })
    }

    fn from_raw(call: &RawToolCall) -> Option<Self> {
        match call {
            RawToolCall::Structured { name, args, .. } => Some(Self::Structured {
                name: name.clone(),
                args: args.clone(),
            }),
            RawToolCall::Function { function, .. } => Some(Self::from_function(function)),
            RawToolCall::Unrecognized(_) => None,
        }
    }

    fn from_function(function: &RawFunction) -> Self {
        Self::Legacy {
            name: function.name.clone(),
            arguments: ToolArguments::decode(&function.arguments),
        }
    }

    /// Requested tool name, if any
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Structured { name, .. } | Self::Legacy { name, .. } => Some(name),
        }
    }

    /// Split into `(tool_name, tool_input)`, or `None` when no tool was requested
    #[must_use]
    pub fn into_parts(self) -> Option<(String, Value)> {
        match self {
            Self::None => None,
            Self::Structured { name, args } => Some((name, args)),
            Self::Legacy { name, arguments } => Some((name, arguments.into_value())),
        }
    }
}
