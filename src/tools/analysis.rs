// ABOUTME: External startup analysis tool backed by an HTTP analysis service
// ABOUTME: Validates the description argument, fills defaults, POSTs JSON, and returns the JSON result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Startup Mentor Contributors

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, instrument};

use startup_mentor_core::constants::analysis::{DEFAULT_MODE, TOOL_NAME};

use super::AgentTool;
use crate::config::AnalysisToolConfig;
use crate::errors::{AppError, AppResult};

const SERVICE_LABEL: &str = "analysis";

/// Arguments accepted by the analysis tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Description of the startup idea
    pub startup_description: String,
    /// Analysis depth, e.g. `basic` or `advanced`
    #[serde(default = "default_mode")]
    pub analysis_mode: String,
    /// Whether the service should include external research
    #[serde(default = "default_external_research")]
    pub include_external_research: bool,
}

fn default_mode() -> String {
    DEFAULT_MODE.to_owned()
}

const fn default_external_research() -> bool {
    true
}

impl AnalysisRequest {
    /// Parse and validate tool arguments
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `startup_description` is missing or blank
    pub fn from_args(args: Value) -> AppResult<Self> {
        let request: Self = serde_json::from_value(args)
            .map_err(|e| AppError::invalid_input(format!("Invalid analysis arguments: {e}")))?;
        if request.startup_description.trim().is_empty() {
            return Err(AppError::invalid_input(
                "startup_description must not be empty",
            ));
        }
        Ok(request)
    }
}

/// Calls the external market/product/founder analysis service
pub struct ExternalAnalysisTool {
    client: Client,
    api_url: String,
}

impl ExternalAnalysisTool {
    /// Build the tool with its own HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: &AnalysisToolConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }
}

#[async_trait]
impl AgentTool for ExternalAnalysisTool {
    fn name(&self) -> &'static str {
        TOOL_NAME
    }

    fn description(&self) -> &'static str {
        "Use this tool when you have a sufficiently detailed startup description and want a \
         structured analysis. Provide: startup_description, analysis_mode, include_external_research."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "startup_description": {
                    "type": "string",
                    "description": "A clear and comprehensive description of the startup idea"
                },
                "analysis_mode": {
                    "type": "string",
                    "description": "Analysis depth, e.g., 'basic' or 'advanced'",
                    "default": DEFAULT_MODE
                },
                "include_external_research": {
                    "type": "boolean",
                    "description": "Whether to include external research in analysis",
                    "default": true
                }
            },
            "required": ["startup_description"]
        })
    }

    #[instrument(skip(self, args), fields(url = %self.api_url))]
    async fn execute(&self, args: Value) -> AppResult<Value> {
        let request = AnalysisRequest::from_args(args)?;
        info!(
            mode = %request.analysis_mode,
            external_research = request.include_external_research,
            "Requesting startup analysis"
        );

        let response = self
            .client
            .post(&self.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Analysis request failed: {}", e);
                AppError::external_service(SERVICE_LABEL, format!("Request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Analysis service returned {}: {}", status, body);
            return Err(AppError::external_service(
                SERVICE_LABEL,
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    body.chars().take(200).collect::<String>()
                ),
            ));
        }

        response.json::<Value>().await.map_err(|e| {
            AppError::external_service(SERVICE_LABEL, format!("Invalid JSON response: {e}"))
        })
    }
}
