// ABOUTME: Run pipeline types from raw engine steps to unified client events
// ABOUTME: Step decoding, tool-call decoding, the unified event model, and the normalizer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

/// Unified event model and wire shape
pub mod event;
/// Run Event Normalizer
pub mod normalizer;
/// Raw step updates
pub mod step;
/// Tool-call decoding
pub mod tool_call;

pub use event::{ToolAction, ToolOutput, UnifiedEvent, WireAction, WireEvent};
pub use normalizer::{normalize_run, NormalizedEvent, RunNormalizer};
pub use step::{AdditionalKwargs, RawFunction, RawToolCall, StageMessage, StagePayload, StepUpdate};
pub use tool_call::{ToolArguments, ToolCallRequest};
