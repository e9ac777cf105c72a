// ABOUTME: Core types and constants for the Startup Mentor streaming agent
// ABOUTME: Foundation crate with error handling, transcript models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

#![deny(unsafe_code)]

//! # Startup Mentor Core
//!
//! Foundation crate providing shared types and constants for the Startup Mentor
//! streaming agent. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `AppResult`
//! - **constants**: Defaults for TTLs, engine settings, and environment variable names
//! - **models**: Transcript messages and pending-run records

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants and configuration defaults organized by domain
pub mod constants;

/// Core data models (conversation messages, pending runs)
pub mod models;
