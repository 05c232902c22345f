//! Agent trait: a handler specialized for one class of queries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::outcome::AgentResponse;
use crate::query::{ConfidenceScore, Query};

/// The core Agent trait.
///
/// Each specialist (weather, research, general, ...) implements this trait
/// and is registered once at startup. The router only ever calls `score`;
/// the pipeline calls `execute` on the winner.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Unique name within the registry (e.g., "Weather").
    fn name(&self) -> &str;

    /// What this agent is good at.
    fn description(&self) -> &str;

    /// Names of the tool adapters this agent may call.
    fn tools(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Self-assessed confidence for `query`.
    ///
    /// Must be deterministic, side-effect-free and local (no network).
    /// An agent that cannot evaluate the query returns `ConfidenceScore::ZERO`.
    fn score(&self, query: &Query) -> ConfidenceScore;

    /// Answer `query`. Tool failures are either recovered into a degraded
    /// response or returned as a typed [`AgentError`].
    async fn execute(&self, query: &Query) -> Result<AgentResponse, AgentError>;

    /// Static description for listings and status output.
    fn info(&self) -> AgentInfo {
        AgentInfo {
            name: self.name().to_string(),
            description: self.description().to_string(),
            tools: self.tools().into_iter().map(String::from).collect(),
        }
    }
}

/// A snapshot of an agent's identity and declared tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tools: Vec<String>,
}
