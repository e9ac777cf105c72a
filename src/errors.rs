// ABOUTME: Unified error handling re-exported from the core crate
// ABOUTME: AppError, ErrorCode, and AppResult used across stores, sessions, and routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

//! Error types live in `startup-mentor-core` so they can be shared without
//! pulling in the HTTP stack. This module re-exports them under the
//! conventional `crate::errors` path.

pub use startup_mentor_core::errors::*;
