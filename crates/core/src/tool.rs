//! ToolAdapter trait: the abstraction over agent capabilities.
//!
//! A tool adapter wraps exactly one external capability (an HTTP API, a local
//! computation, a language-model call). Agents never talk to the outside
//! world directly; they go through [`ToolAdapter::invoke`], which bounds the
//! call in time and reports every failure as a [`ToolError`] value.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ToolError;

/// Bound applied to an adapter that does not configure its own.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(5);

/// Successful payload of a tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Human-readable rendering of the result
    pub output: String,

    /// Optional structured data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolOutput {
    pub fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            data: None,
        }
    }

    pub fn with_data(output: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            output: output.into(),
            data: Some(data),
        }
    }
}

/// The core ToolAdapter trait.
///
/// Implementors provide [`call`](ToolAdapter::call); callers use
/// [`invoke`](ToolAdapter::invoke), which enforces [`timeout`](ToolAdapter::timeout).
#[async_trait]
pub trait ToolAdapter: Send + Sync {
    /// The unique name of this tool (e.g., "current_weather", "calculator").
    fn name(&self) -> &str;

    /// A description of what this tool does.
    fn description(&self) -> &str;

    /// Upper bound on a single invocation.
    fn timeout(&self) -> Duration {
        DEFAULT_TOOL_TIMEOUT
    }

    /// Perform the raw call. Unbounded; use `invoke` instead.
    async fn call(&self, parameters: serde_json::Value) -> Result<ToolOutput, ToolError>;

    /// Perform the call within `timeout()`. Exceeding it yields
    /// [`ToolError::Timeout`]; the in-flight call is dropped.
    async fn invoke(&self, parameters: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let timeout = self.timeout();
        let started = Instant::now();

        let outcome = match tokio::time::timeout(timeout, self.call(parameters)).await {
            Ok(result) => result,
            Err(_) => Err(ToolError::Timeout {
                tool_name: self.name().to_string(),
                timeout,
            }),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(_) => debug!(tool = %self.name(), elapsed_ms, "Tool invocation succeeded"),
            Err(e) => warn!(tool = %self.name(), elapsed_ms, error = %e, "Tool invocation failed"),
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[async_trait]
    impl ToolAdapter for EchoTool {
        fn name(&self) -> &str { "echo" }
        fn description(&self) -> &str { "Echoes back the input" }
        async fn call(&self, parameters: serde_json::Value) -> Result<ToolOutput, ToolError> {
            let text = parameters["text"]
                .as_str()
                .ok_or_else(|| ToolError::InvalidInput("Missing 'text' argument".into()))?;
            Ok(ToolOutput::text(text))
        }
    }

    /// Never answers within any reasonable bound.
    struct StalledTool;

    #[async_trait]
    impl ToolAdapter for StalledTool {
        fn name(&self) -> &str { "stalled" }
        fn description(&self) -> &str { "Hangs forever" }
        fn timeout(&self) -> Duration { Duration::from_millis(50) }
        async fn call(&self, _parameters: serde_json::Value) -> Result<ToolOutput, ToolError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(ToolOutput::text("too late"))
        }
    }

    #[tokio::test]
    async fn invoke_passes_through_success() {
        let out = EchoTool
            .invoke(serde_json::json!({"text": "hello world"}))
            .await
            .unwrap();
        assert_eq!(out.output, "hello world");
        assert!(out.data.is_none());
    }

    #[tokio::test]
    async fn invoke_passes_through_typed_failure() {
        let err = EchoTool.invoke(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn invoke_times_out_stalled_call() {
        let err = StalledTool.invoke(serde_json::json!({})).await.unwrap_err();
        match err {
            ToolError::Timeout { tool_name, timeout } => {
                assert_eq!(tool_name, "stalled");
                assert_eq!(timeout, Duration::from_millis(50));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn default_timeout_is_five_seconds() {
        assert_eq!(EchoTool.timeout(), Duration::from_secs(5));
    }
}
