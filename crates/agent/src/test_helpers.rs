//! Shared test doubles for agent, router and pipeline tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use concierge_core::agent::Agent;
use concierge_core::error::{AgentError, ProviderError, ToolError};
use concierge_core::message::Message;
use concierge_core::outcome::AgentResponse;
use concierge_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use concierge_core::query::{ConfidenceScore, Query};
use concierge_core::tool::{ToolAdapter, ToolOutput};
use serde_json::Value;

/// A tool that always succeeds with a fixed output and remembers its last parameters.
pub struct RecordingTool {
    name: String,
    output: String,
    last_params: Mutex<Option<Value>>,
}

impl RecordingTool {
    pub fn new(name: &str, output: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            output: output.to_string(),
            last_params: Mutex::new(None),
        })
    }

    pub fn last_params(&self) -> Option<Value> {
        self.last_params.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolAdapter for RecordingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Records parameters and returns a fixed output"
    }

    async fn call(&self, parameters: Value) -> Result<ToolOutput, ToolError> {
        *self.last_params.lock().unwrap() = Some(parameters);
        Ok(ToolOutput::text(self.output.clone()))
    }
}

/// A tool that always fails with the given error.
pub struct FailingTool {
    name: String,
    error: ToolError,
}

impl FailingTool {
    pub fn new(name: &str, error: ToolError) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            error,
        })
    }
}

#[async_trait]
impl ToolAdapter for FailingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    async fn call(&self, _parameters: Value) -> Result<ToolOutput, ToolError> {
        Err(self.error.clone())
    }
}

/// An agent with a fixed score and reply that counts how often it is consulted.
pub struct ScriptedAgent {
    name: String,
    score: f64,
    reply: Result<String, AgentError>,
    score_calls: AtomicUsize,
    execute_calls: AtomicUsize,
}

impl ScriptedAgent {
    pub fn new(name: &str, score: f64) -> Arc<Self> {
        Self::build(name, score, Ok(format!("{name} answered")))
    }

    pub fn failing(name: &str, score: f64, error: AgentError) -> Arc<Self> {
        Self::build(name, score, Err(error))
    }

    fn build(name: &str, score: f64, reply: Result<String, AgentError>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            score,
            reply,
            score_calls: AtomicUsize::new(0),
            execute_calls: AtomicUsize::new(0),
        })
    }

    pub fn score_calls(&self) -> usize {
        self.score_calls.load(Ordering::SeqCst)
    }

    pub fn execute_calls(&self) -> usize {
        self.execute_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Scripted test agent"
    }

    fn score(&self, _query: &Query) -> ConfidenceScore {
        self.score_calls.fetch_add(1, Ordering::SeqCst);
        ConfidenceScore::new(self.score)
    }

    async fn execute(&self, _query: &Query) -> Result<AgentResponse, AgentError> {
        self.execute_calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map(AgentResponse::new)
    }
}

/// An agent that panics while scoring or executing.
pub struct PanickingAgent {
    name: String,
    score: Option<f64>,
}

impl PanickingAgent {
    /// Scores normally, panics in `execute`.
    pub fn on_execute(name: &str, score: f64) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            score: Some(score),
        })
    }

    /// Panics in `score`.
    pub fn on_score(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            score: None,
        })
    }
}

#[async_trait]
impl Agent for PanickingAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Panics on purpose"
    }

    fn score(&self, _query: &Query) -> ConfidenceScore {
        match self.score {
            Some(score) => ConfidenceScore::new(score),
            None => panic!("{} blew up while scoring", self.name),
        }
    }

    async fn execute(&self, _query: &Query) -> Result<AgentResponse, AgentError> {
        panic!("{} blew up while executing", self.name)
    }
}

/// A provider that returns a sequence of scripted replies.
pub struct SequentialMockProvider {
    replies: Mutex<Vec<Result<String, ProviderError>>>,
    call_count: AtomicUsize,
}

impl SequentialMockProvider {
    pub fn new(replies: Vec<Result<String, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            call_count: AtomicUsize::new(0),
        })
    }

    pub fn single_text(text: &str) -> Arc<Self> {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst);
        let replies = self.replies.lock().unwrap();
        let reply = replies.get(call).cloned().unwrap_or_else(|| {
            panic!(
                "SequentialMockProvider: no more replies (call #{call}, have {})",
                replies.len()
            )
        });

        reply.map(|text| ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: request.model,
        })
    }
}
