//! The ordered set of agents the router chooses from.
//!
//! Built once at startup and then shared read-only as `Arc<AgentRegistry>`.
//! Insertion order is significant: it is the tie-break order for routing.

use std::sync::Arc;

use concierge_core::agent::{Agent, AgentInfo};
use concierge_core::error::RegistryError;

#[derive(Default)]
pub struct AgentRegistry {
    agents: Vec<Arc<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from agents in the given order.
    pub fn from_agents(
        agents: impl IntoIterator<Item = Arc<dyn Agent>>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for agent in agents {
            registry.register(agent)?;
        }
        Ok(registry)
    }

    /// Append an agent. Names must be unique.
    pub fn register(&mut self, agent: Arc<dyn Agent>) -> Result<(), RegistryError> {
        if self.get(agent.name()).is_some() {
            return Err(RegistryError::DuplicateAgentName(agent.name().to_string()));
        }
        self.agents.push(agent);
        Ok(())
    }

    /// All agents in registration order.
    pub fn all(&self) -> &[Arc<dyn Agent>] {
        &self.agents
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Agent>> {
        self.agents.iter().find(|a| a.name() == name).cloned()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name()).collect()
    }

    /// Name, description and declared tools of every agent, in order.
    pub fn describe(&self) -> Vec<AgentInfo> {
        self.agents.iter().map(|a| a.info()).collect()
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("agents", &self.names())
            .finish()
    }
}
