// ABOUTME: Integration tests for the stream session driver
// ABOUTME: Covers single-use redemption, commit ordering, cancellation, and engine failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{agent_text, agent_with_call, scripted_resources, tool_result, ScriptedEngine};
use futures_util::StreamExt;
use serde_json::json;
use startup_mentor::errors::{AppError, ErrorCode};
use startup_mentor::runs::ToolOutput;
use startup_mentor_core::models::MessageRole;

#[tokio::test]
async fn test_completed_run_commits_assistant_then_tool() {
    let engine = ScriptedEngine::new(vec![
        Ok(agent_with_call(
            "Looks promising",
            "analyze",
            json!({"startup_description": "idea"}),
        )),
        Ok(tool_result("analyze", r#"{"score":8}"#)),
    ]);
    let resources = scripted_resources(engine);
    let sessions = &resources.sessions;

    let pending = sessions.submit(1, 123, "idea").await.unwrap();
    let events: Vec<_> = sessions
        .open(&pending.token)
        .await
        .unwrap()
        .into_events()
        .collect()
        .await;

    assert_eq!(events.len(), 2);
    let last = events.last().unwrap();
    assert_eq!(last.assistant_output.as_deref(), Some("Looks promising"));
    assert_eq!(
        last.completed_action().unwrap().tool_output,
        ToolOutput::Ready(json!(r#"{"score":8}"#))
    );

    let messages = resources
        .conversations
        .get(1, 123)
        .await
        .unwrap()
        .messages()
        .await;
    let roles: Vec<_> = messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![MessageRole::User, MessageRole::Assistant, MessageRole::Tool]
    );
    assert_eq!(messages[1].content, "Looks promising");
    assert_eq!(messages[2].content, r#"{"score":8}"#);
    assert_eq!(messages[2].tool_name.as_deref(), Some("analyze"));
}

#[tokio::test]
async fn test_history_contains_prior_turns() {
    let engine = ScriptedEngine::new(vec![Ok(agent_text("Tell me more"))]);
    let resources = scripted_resources(engine.clone());
    let sessions = &resources.sessions;

    let first = sessions.submit(3, 1, "first").await.unwrap();
    let _: Vec<_> = sessions
        .open(&first.token)
        .await
        .unwrap()
        .into_events()
        .collect()
        .await;

    let second = sessions.submit(3, 1, "second").await.unwrap();
    let session = sessions.open(&second.token).await.unwrap();
    let contents: Vec<_> = session
        .history()
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(contents, vec!["first", "Tell me more", "second"]);
    drop(session);

    assert_eq!(engine.histories().len(), 1);
}

#[tokio::test]
async fn test_token_redeems_exactly_once() {
    let resources = scripted_resources(ScriptedEngine::new(vec![]));
    let sessions = &resources.sessions;

    let pending = sessions.submit(1, 1, "hi").await.unwrap();
    assert!(sessions.open(&pending.token).await.is_ok());

    let err = sessions.open(&pending.token).await.err().unwrap();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_dropped_stream_does_not_commit() {
    let engine = ScriptedEngine::new(vec![
        Ok(agent_with_call("", "analyze", json!({}))),
        Ok(tool_result("analyze", "done")),
        Ok(agent_text("final")),
    ]);
    let resources = scripted_resources(engine);
    let sessions = &resources.sessions;

    let pending = sessions.submit(4, 4, "go").await.unwrap();
    let first: Vec<_> = sessions
        .open(&pending.token)
        .await
        .unwrap()
        .into_events()
        .take(1)
        .collect()
        .await;
    assert_eq!(first.len(), 1);

    let conversation = resources.conversations.get(4, 4).await.unwrap();
    assert_eq!(conversation.len().await, 1);
}

#[tokio::test]
async fn test_engine_failure_degrades_without_commit() {
    let engine = ScriptedEngine::new(vec![
        Ok(agent_with_call("Checking", "analyze", json!({}))),
        Err(AppError::external_service("OpenAI", "connection reset")),
    ]);
    let resources = scripted_resources(engine);
    let sessions = &resources.sessions;

    let pending = sessions.submit(5, 5, "go").await.unwrap();
    let events: Vec<_> = sessions
        .open(&pending.token)
        .await
        .unwrap()
        .into_events()
        .collect()
        .await;

    assert_eq!(events.len(), 2);
    let degraded = events.last().unwrap();
    assert_eq!(degraded.assistant_output.as_deref(), Some("Checking"));
    assert_eq!(
        degraded.action.as_ref().unwrap().tool_output,
        ToolOutput::Ready(json!({"error": "OpenAI: connection reset"}))
    );

    let conversation = resources.conversations.get(5, 5).await.unwrap();
    assert_eq!(conversation.len().await, 1);
}

#[tokio::test]
async fn test_zero_step_run_commits_empty_assistant_message() {
    let resources = scripted_resources(ScriptedEngine::new(vec![]));
    let sessions = &resources.sessions;

    let pending = sessions.submit(6, 6, "hello").await.unwrap();
    let events: Vec<_> = sessions
        .open(&pending.token)
        .await
        .unwrap()
        .into_events()
        .collect()
        .await;
    assert!(events.is_empty());

    let messages = resources
        .conversations
        .get(6, 6)
        .await
        .unwrap()
        .messages()
        .await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, MessageRole::Assistant);
    assert_eq!(messages[1].content, "");
}

#[tokio::test]
async fn test_final_answer_without_tool_commits_only_assistant() {
    let engine = ScriptedEngine::new(vec![
        Ok(agent_with_call("", "analyze", json!({}))),
        Ok(tool_result("analyze", "R")),
        Ok(agent_text("Here is my take")),
    ]);
    let resources = scripted_resources(engine);
    let sessions = &resources.sessions;

    let pending = sessions.submit(7, 7, "go").await.unwrap();
    let _: Vec<_> = sessions
        .open(&pending.token)
        .await
        .unwrap()
        .into_events()
        .collect()
        .await;

    let messages = resources
        .conversations
        .get(7, 7)
        .await
        .unwrap()
        .messages()
        .await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].content, "Here is my take");
}
