//! Error types for the Concierge domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; the top-level [`Error`]
//! wraps them for callers that only need to propagate.

use std::time::Duration;

use thiserror::Error;

use crate::outcome::ErrorKind;

/// The top-level error type for all Concierge operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single tool adapter invocation.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Tool timed out: {tool_name} after {timeout:?}")]
    Timeout { tool_name: String, timeout: Duration },

    #[error("Remote error from {tool_name} (status: {status:?}): {message}")]
    RemoteError {
        tool_name: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid tool input: {0}")]
    InvalidInput(String),

    #[error("Tool not configured: {tool_name}: {reason}")]
    NotConfigured { tool_name: String, reason: String },
}

impl ToolError {
    /// The serializable kind reported in an execution result.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } => ErrorKind::ToolTimeout,
            Self::RemoteError { .. } => ErrorKind::ToolRemoteError,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::NotConfigured { .. } => ErrorKind::NotConfigured,
        }
    }

    /// Short, user-facing reason used in degraded answers.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "the service took too long to respond",
            Self::RemoteError { status: Some(404), .. } => "the service could not find it",
            Self::RemoteError { .. } => "the service returned an error",
            Self::InvalidInput(_) => "the request could not be understood",
            Self::NotConfigured { .. } => "the service is not configured",
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Typed failure returned by an agent's `execute`.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    #[error("{0}")]
    Tool(#[from] ToolError),

    #[error("Language model failure: {0}")]
    Provider(#[from] ProviderError),

    #[error("Cannot answer: {0}")]
    Unanswerable(String),
}

impl AgentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Tool(e) => e.kind(),
            Self::Provider(ProviderError::Timeout(_)) => ErrorKind::ToolTimeout,
            Self::Provider(ProviderError::NotConfigured(_)) => ErrorKind::NotConfigured,
            Self::Provider(_) => ErrorKind::ToolRemoteError,
            Self::Unanswerable(_) => ErrorKind::InvalidInput,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("Query is empty")]
    EmptyQuery,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Duplicate agent name: {0}")]
    DuplicateAgentName(String),

    #[error("No agents registered")]
    Empty,

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),
}
