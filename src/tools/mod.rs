// ABOUTME: Tools the mentor agent can call, plus the registry it looks them up in
// ABOUTME: AgentTool trait, name-keyed ToolRegistry, and function declarations for the model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

//! # Agent Tools
//!
//! A tool is a named async function over JSON. The registry is built once at
//! startup and shared immutably behind an `Arc`.

/// External market/product/founder analysis tool
pub mod analysis;

pub use analysis::ExternalAnalysisTool;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};
use crate::llm::FunctionDeclaration;

/// A tool the reasoning engine may invoke by name
#[async_trait]
pub trait AgentTool: Send + Sync {
    /// Unique name the model uses to call the tool
    fn name(&self) -> &'static str;

    /// Description for model consumption
    fn description(&self) -> &'static str;

    /// JSON Schema of the arguments object
    fn parameters(&self) -> Value;

    /// Run the tool
    ///
    /// # Errors
    ///
    /// Returns `AppError` for invalid arguments or failed downstream calls
    async fn execute(&self, args: Value) -> AppResult<Value>;

    /// Declaration offered to the model
    fn declaration(&self) -> FunctionDeclaration {
        FunctionDeclaration {
            name: self.name().to_owned(),
            description: self.description().to_owned(),
            parameters: Some(self.parameters()),
        }
    }
}

/// Name-keyed registry of agent tools
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn AgentTool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    ///
    /// # Returns
    ///
    /// `true` if the tool was registered, `false` if the name was taken
    pub fn register(&mut self, tool: Arc<dyn AgentTool>) -> bool {
        let name = tool.name().to_owned();
        if self.tools.contains_key(&name) {
            warn!("Tool '{}' is already registered, skipping", name);
            return false;
        }
        debug!("Registering tool '{}'", name);
        self.tools.insert(name, tool);
        true
    }

    /// Look up a tool
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn AgentTool>> {
        self.tools.get(name)
    }

    /// Number of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Declarations for every registered tool, sorted by name
    #[must_use]
    pub fn declarations(&self) -> Vec<FunctionDeclaration> {
        let mut declarations: Vec<_> = self.tools.values().map(|t| t.declaration()).collect();
        declarations.sort_by(|a, b| a.name.cmp(&b.name));
        declarations
    }

    /// Execute a tool by name
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for unknown names, otherwise the tool's own error
    pub async fn execute(&self, name: &str, args: Value) -> AppResult<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| AppError::not_found(format!("Tool '{name}'")))?;
        tool.execute(args).await
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.tools.keys().collect();
        names.sort();
        f.debug_struct("ToolRegistry").field("tools", &names).finish()
    }
}
