//! Outcome types: what an agent returns and what the pipeline hands back.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Serializable failure tag carried by an [`ExecutionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Empty or whitespace-only input; no agent was invoked
    InvalidQuery,
    ToolTimeout,
    ToolRemoteError,
    NotConfigured,
    InvalidInput,
    /// The winning agent panicked during execution
    UnexpectedAgentFault,
}

impl ErrorKind {
    /// Whether the caller, not the system, is at fault (4xx-equivalent).
    pub fn is_caller_error(self) -> bool {
        matches!(self, Self::InvalidQuery)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InvalidQuery => "InvalidQuery",
            Self::ToolTimeout => "ToolTimeout",
            Self::ToolRemoteError => "ToolRemoteError",
            Self::NotConfigured => "NotConfigured",
            Self::InvalidInput => "InvalidInput",
            Self::UnexpectedAgentFault => "UnexpectedAgentFault",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    pub message: String,
}

/// A successful answer produced by an agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentResponse {
    pub text: String,

    /// Names of the tools that were invoked, in call order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools_used: Vec<String>,

    /// True when a tool failed and the agent answered anyway
    #[serde(default)]
    pub degraded: bool,
}

impl AgentResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tools_used.push(tool.into());
        self
    }

    pub fn degraded(mut self) -> Self {
        self.degraded = true;
        self
    }
}

/// The single result returned for every processed query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub response_text: String,

    /// Which agent produced the response; absent for rejected queries
    pub agent_used: Option<String>,

    pub execution_time_seconds: f64,

    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools_used: Vec<String>,

    #[serde(default)]
    pub degraded: bool,
}

impl ExecutionResult {
    /// Wrap an agent's successful answer.
    pub fn answered(agent: impl Into<String>, response: AgentResponse, elapsed: Duration) -> Self {
        Self {
            response_text: response.text,
            agent_used: Some(agent.into()),
            execution_time_seconds: elapsed.as_secs_f64(),
            success: true,
            error: None,
            tools_used: response.tools_used,
            degraded: response.degraded,
        }
    }

    /// Build a failure result. `agent` is `None` only when no agent ran.
    pub fn failed(
        agent: Option<String>,
        kind: ErrorKind,
        message: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        let message = message.into();
        Self {
            response_text: message.clone(),
            agent_used: agent,
            execution_time_seconds: elapsed.as_secs_f64(),
            success: false,
            error: Some(ErrorDetail { kind, message }),
            tools_used: Vec::new(),
            degraded: false,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}
