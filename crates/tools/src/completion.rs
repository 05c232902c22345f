//! Language-model completion adapter.
//!
//! Wraps a [`Provider`] so that LLM calls are bounded and reported like any
//! other tool call. Provider failures are mapped onto [`ToolError`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use concierge_core::error::{ProviderError, ToolError};
use concierge_core::message::Message;
use concierge_core::provider::{Provider, ProviderRequest};
use concierge_core::tool::{ToolAdapter, ToolOutput};

use crate::http::required_str;

/// Bound used when no completion timeout is configured.
pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);

pub struct CompletionTool {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl CompletionTool {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            timeout: DEFAULT_COMPLETION_TIMEOUT,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn map_error(&self, err: ProviderError) -> ToolError {
        let tool_name = self.name().to_string();
        match err {
            ProviderError::Timeout(_) => ToolError::Timeout {
                tool_name,
                timeout: self.timeout,
            },
            ProviderError::NotConfigured(reason) => ToolError::NotConfigured { tool_name, reason },
            ProviderError::AuthenticationFailed(message) => ToolError::RemoteError {
                tool_name,
                status: Some(401),
                message,
            },
            ProviderError::RateLimited { retry_after_secs } => ToolError::RemoteError {
                tool_name,
                status: Some(429),
                message: format!("rate limited, retry after {retry_after_secs}s"),
            },
            ProviderError::ApiError { status_code, message } => ToolError::RemoteError {
                tool_name,
                status: Some(status_code),
                message,
            },
            ProviderError::Network(message) => ToolError::RemoteError {
                tool_name,
                status: None,
                message,
            },
        }
    }
}

#[async_trait]
impl ToolAdapter for CompletionTool {
    fn name(&self) -> &str {
        "completion"
    }

    fn description(&self) -> &str {
        "Answer a free-form prompt with the configured language model."
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Parameters: `prompt` (required) and `system` (optional).
    async fn call(&self, parameters: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let prompt = required_str(&parameters, "prompt")?;

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = parameters["system"].as_str() {
            messages.push(Message::system(system));
        }
        messages.push(Message::user(prompt));

        let request = ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| self.map_error(e))?;

        let text = response.message.content.trim().to_string();
        if text.is_empty() {
            return Err(ToolError::RemoteError {
                tool_name: self.name().to_string(),
                status: None,
                message: "empty completion".into(),
            });
        }

        Ok(ToolOutput::with_data(
            text,
            serde_json::json!({"model": response.model}),
        ))
    }
}
