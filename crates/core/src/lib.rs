//! # Concierge Core
//!
//! Domain types, traits, and error definitions for the Concierge agent router.
//! This crate has **no framework dependencies**: it defines the domain model
//! that the tool, agent and CLI crates implement against.
//!
//! ## Design Philosophy
//!
//! Every seam is a trait here ([`ToolAdapter`], [`Agent`], [`Provider`]).
//! Implementations live in their respective crates, which keeps them
//! swappable via configuration and easy to replace with stubs in tests.

pub mod agent;
pub mod error;
pub mod event;
pub mod message;
pub mod outcome;
pub mod provider;
pub mod query;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use agent::{Agent, AgentInfo};
pub use error::{AgentError, Error, ProviderError, RegistryError, Result, RoutingError, ToolError};
pub use event::{DomainEvent, EventBus};
pub use message::{Message, Role};
pub use outcome::{AgentResponse, ErrorDetail, ErrorKind, ExecutionResult};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use query::{ConfidenceScore, Modality, Query};
pub use tool::{DEFAULT_TOOL_TIMEOUT, ToolAdapter, ToolOutput};
