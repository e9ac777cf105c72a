// ABOUTME: Main library entry point for the Startup Mentor streaming agent
// ABOUTME: Token-gated SSE streaming of a tool-calling mentor run over per-conversation transcripts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

#![deny(unsafe_code)]

//! # Startup Mentor
//!
//! A client submits a chat turn and receives a short-lived, single-use token.
//! Opening the stream with that token runs the mentor agent over the
//! conversation's transcript and pushes one normalized event per step.
//!
//! ## Architecture
//!
//! - **Stores**: conversation transcripts and pending-run tokens, in memory
//! - **Sweeper**: periodic purge of idle conversations and stale tokens
//! - **Agent**: ReAct-style loop over an OpenAI-compatible model and tools
//! - **Runs**: decoding of raw step updates into unified events
//! - **Session**: token redemption, relay, and transcript commit
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use startup_mentor::config::ServerConfig;
//! use startup_mentor::resources::ServerResources;
//!
//! #[tokio::main]
//! async fn main() -> startup_mentor::errors::AppResult<()> {
//!     let config = ServerConfig::from_env();
//!     let resources = Arc::new(ServerResources::new(config)?);
//!     let sweeper = resources.spawn_sweeper();
//!
//!     startup_mentor::server::serve(resources, startup_mentor::server::shutdown_signal()).await?;
//!     sweeper.shutdown().await;
//!     Ok(())
//! }
//! ```

/// Reasoning engine contract and the mentor agent
pub mod agent;

/// Environment configuration
pub mod config;

/// Unified error handling (re-exported from the core crate)
pub mod errors;

/// Chat model providers
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Process-scoped shared state
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Raw step decoding and unified events
pub mod runs;

/// Router assembly and serving
pub mod server;

/// Stream session driver
pub mod session;

/// Conversation and token stores
pub mod stores;

/// Background purge task
pub mod sweeper;

/// Agent tools
pub mod tools;
