//! The execution pipeline: route, execute, time, and always return a result.
//!
//! This is the last-resort fault boundary. Whatever the winning agent does,
//! including panicking, the caller gets a well-formed [`ExecutionResult`].

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use concierge_core::error::RoutingError;
use concierge_core::event::{DomainEvent, EventBus};
use concierge_core::outcome::{ErrorKind, ExecutionResult};
use concierge_core::query::{Modality, Query};
use futures::FutureExt;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::router::{ConfidenceRouter, RoutingDecision};

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a question or request.";

pub const AGENT_FAULT_MESSAGE: &str =
    "Something went wrong while answering your request. Please try again.";

/// Cheap to clone; clones share the router and event bus.
#[derive(Clone)]
pub struct ExecutionPipeline {
    router: Arc<ConfidenceRouter>,
    event_bus: Option<Arc<EventBus>>,
}

impl ExecutionPipeline {
    pub fn new(router: ConfidenceRouter) -> Self {
        Self {
            router: Arc::new(router),
            event_bus: None,
        }
    }

    /// Publish routing and completion events to `bus`.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn router(&self) -> &ConfidenceRouter {
        &self.router
    }

    /// Process raw user text arriving through `modality`.
    pub async fn process(&self, text: impl Into<String>, modality: Modality) -> ExecutionResult {
        let query = Query::unchecked(text, modality);
        self.run(&query).await
    }

    /// Route and execute one query.
    pub async fn run(&self, query: &Query) -> ExecutionResult {
        let span = info_span!("query", query_id = %query.id(), modality = %query.modality());
        self.run_inner(query).instrument(span).await
    }

    async fn run_inner(&self, query: &Query) -> ExecutionResult {
        let started = Instant::now();

        let decision = match self.router.select(query) {
            Ok(decision) => decision,
            Err(RoutingError::EmptyQuery) => {
                info!("Rejected blank query");
                self.publish(DomainEvent::QueryRejected {
                    query_id: query.id(),
                    timestamp: Utc::now(),
                });
                return ExecutionResult::failed(
                    None,
                    ErrorKind::InvalidQuery,
                    EMPTY_QUERY_MESSAGE,
                    started.elapsed(),
                );
            }
        };

        let agent_name = decision.agent_name().to_string();
        info!(
            agent = %agent_name,
            top_score = %decision.top_score,
            fallback = decision.fallback_used,
            "Routed query"
        );
        self.publish_routed(query, &decision);

        let outcome = AssertUnwindSafe(decision.agent.execute(query))
            .catch_unwind()
            .await;
        let elapsed = started.elapsed();

        let result = match outcome {
            Ok(Ok(response)) => {
                if response.degraded {
                    warn!(agent = %agent_name, tools = ?response.tools_used, "Answered without live data");
                } else {
                    debug!(agent = %agent_name, tools = ?response.tools_used, "Answered");
                }
                ExecutionResult::answered(&agent_name, response, elapsed)
            }
            Ok(Err(e)) => {
                warn!(agent = %agent_name, error = %e, "Agent could not answer");
                ExecutionResult::failed(
                    Some(agent_name.clone()),
                    e.kind(),
                    format!("I'm sorry, I couldn't complete that request. {e}"),
                    elapsed,
                )
            }
            Err(panic) => {
                error!(agent = %agent_name, panic = %panic_message(panic.as_ref()), "Agent panicked during execution");
                ExecutionResult::failed(
                    Some(agent_name.clone()),
                    ErrorKind::UnexpectedAgentFault,
                    AGENT_FAULT_MESSAGE,
                    elapsed,
                )
            }
        };

        info!(
            agent = %agent_name,
            success = result.success,
            elapsed_ms = elapsed.as_millis() as u64,
            "Query completed"
        );
        self.publish_completed(query, &agent_name, &result, elapsed);

        result
    }

    fn publish(&self, event: DomainEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }

    fn publish_routed(&self, query: &Query, decision: &RoutingDecision) {
        self.publish(DomainEvent::QueryRouted {
            query_id: query.id(),
            agent: decision.agent_name().to_string(),
            top_score: decision.top_score.value(),
            fallback_used: decision.fallback_used,
            scores: decision
                .scores
                .iter()
                .map(|(name, score)| (name.clone(), score.value()))
                .collect(),
            timestamp: Utc::now(),
        });
    }

    fn publish_completed(&self, query: &Query, agent: &str, result: &ExecutionResult, elapsed: Duration) {
        self.publish(DomainEvent::QueryCompleted {
            query_id: query.id(),
            agent: agent.to_string(),
            success: result.success,
            error_kind: result.error_kind(),
            duration_ms: elapsed.as_millis() as u64,
            timestamp: Utc::now(),
        });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".into()
    }
}
