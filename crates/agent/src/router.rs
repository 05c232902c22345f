//! Confidence-based routing.
//!
//! Every registered agent scores the query; the highest score wins, with
//! ties going to the earliest-registered agent. When nobody is confident
//! enough, the designated fallback agent takes the query.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use concierge_core::agent::Agent;
use concierge_core::error::{RegistryError, RoutingError};
use concierge_core::query::{ConfidenceScore, Query};
use tracing::{debug, warn};

use crate::registry::AgentRegistry;

/// Minimum top score below which the fallback agent is used.
pub const DEFAULT_FALLBACK_THRESHOLD: f64 = 0.15;

pub const DEFAULT_FALLBACK_AGENT: &str = "General";

#[derive(Debug, Clone, PartialEq)]
pub struct RoutingPolicy {
    pub fallback_threshold: f64,
    pub fallback_agent: String,
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self {
            fallback_threshold: DEFAULT_FALLBACK_THRESHOLD,
            fallback_agent: DEFAULT_FALLBACK_AGENT.into(),
        }
    }
}

/// The outcome of routing one query.
#[derive(Clone)]
pub struct RoutingDecision {
    pub agent: Arc<dyn Agent>,

    /// Every agent's score, in registry order
    pub scores: Vec<(String, ConfidenceScore)>,

    /// Highest score observed (not necessarily the selected agent's)
    pub top_score: ConfidenceScore,

    /// True when the threshold overrode the highest scorer
    pub fallback_used: bool,
}

impl RoutingDecision {
    pub fn agent_name(&self) -> &str {
        self.agent.name()
    }
}

impl std::fmt::Debug for RoutingDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingDecision")
            .field("agent", &self.agent_name())
            .field("scores", &self.scores)
            .field("top_score", &self.top_score)
            .field("fallback_used", &self.fallback_used)
            .finish()
    }
}

pub struct ConfidenceRouter {
    registry: Arc<AgentRegistry>,
    policy: RoutingPolicy,
}

impl ConfidenceRouter {
    /// Create a router over a non-empty registry.
    pub fn new(registry: Arc<AgentRegistry>, policy: RoutingPolicy) -> Result<Self, RegistryError> {
        if registry.is_empty() {
            return Err(RegistryError::Empty);
        }
        if registry.get(&policy.fallback_agent).is_none() {
            warn!(
                fallback = %policy.fallback_agent,
                "Fallback agent is not registered; low-confidence queries go to the top scorer"
            );
        }
        Ok(Self { registry, policy })
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    pub fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    /// Pick the agent for `query`. Fails only on blank text.
    pub fn select(&self, query: &Query) -> Result<RoutingDecision, RoutingError> {
        if query.is_blank() {
            return Err(RoutingError::EmptyQuery);
        }

        let agents = self.registry.all();
        let scores: Vec<(String, ConfidenceScore)> = agents
            .iter()
            .map(|agent| (agent.name().to_string(), guarded_score(agent.as_ref(), query)))
            .collect();

        // Strictly greater, so the earliest agent keeps a tie.
        let mut winner = 0;
        for (i, (_, score)) in scores.iter().enumerate().skip(1) {
            if score.value() > scores[winner].1.value() {
                winner = i;
            }
        }
        let top_score = scores[winner].1;

        let mut agent = Arc::clone(&agents[winner]);
        let mut fallback_used = false;
        if agents.len() > 1 && top_score.value() < self.policy.fallback_threshold {
            if let Some(fallback) = self.registry.get(&self.policy.fallback_agent) {
                fallback_used = fallback.name() != agent.name();
                agent = fallback;
            }
        }

        debug!(
            query_id = %query.id(),
            scores = ?scores.iter().map(|(n, s)| format!("{n}={s}")).collect::<Vec<_>>(),
            "Scored agents"
        );

        Ok(RoutingDecision {
            agent,
            scores,
            top_score,
            fallback_used,
        })
    }
}

/// Score with a guard: a panic or non-finite value counts as zero.
fn guarded_score(agent: &dyn Agent, query: &Query) -> ConfidenceScore {
    match catch_unwind(AssertUnwindSafe(|| agent.score(query))) {
        Ok(score) => ConfidenceScore::new(score.value()),
        Err(_) => {
            warn!(agent = agent.name(), "Agent panicked while scoring; treating as 0.0");
            ConfidenceScore::ZERO
        }
    }
}
