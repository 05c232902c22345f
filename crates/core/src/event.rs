//! Domain events: observability hooks for the routing pipeline.
//!
//! Events are published as a query moves through the pipeline. Subscribers
//! (embedders, tests) can watch routing decisions without
//! the pipeline knowing who is listening.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::outcome::ErrorKind;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A query was rejected before routing (blank text)
    QueryRejected {
        query_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// The router picked an agent
    QueryRouted {
        query_id: Uuid,
        agent: String,
        top_score: f64,
        fallback_used: bool,
        /// (agent name, score) in registry order
        scores: Vec<(String, f64)>,
        timestamp: DateTime<Utc>,
    },

    /// The winning agent finished (or faulted)
    QueryCompleted {
        query_id: Uuid,
        agent: String,
        success: bool,
        error_kind: Option<ErrorKind>,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
