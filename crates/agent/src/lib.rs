//! Agents, routing and execution: the heart of Concierge.
//!
//! A query flows through three stages:
//!
//! 1. **Score**: every agent in the [`AgentRegistry`] rates the query
//! 2. **Select**: the [`ConfidenceRouter`] picks the most confident agent,
//!    or the fallback agent when nobody is confident enough
//! 3. **Execute**: the [`ExecutionPipeline`] runs the winner, times it and
//!    turns any outcome (including a panic) into an `ExecutionResult`

pub mod agents;
pub mod builder;
pub mod pipeline;
pub mod registry;
pub mod router;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use agents::{GeneralAgent, ResearchAgent, WeatherAgent};
pub use builder::{build_pipeline, build_pipeline_with_provider, build_registry};
pub use pipeline::ExecutionPipeline;
pub use registry::AgentRegistry;
pub use router::{ConfidenceRouter, RoutingDecision, RoutingPolicy};
