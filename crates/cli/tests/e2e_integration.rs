//! End-to-end tests for the Concierge pipeline.
//!
//! These build the real agents and adapters from configuration, point the
//! HTTP adapters at local mock servers and push queries through
//! `ExecutionPipeline::process`.

use std::sync::Arc;
use std::time::Duration;

use concierge_agent::{ExecutionPipeline, build_pipeline_with_provider};
use concierge_config::AppConfig;
use concierge_core::error::ProviderError;
use concierge_core::message::Message;
use concierge_core::outcome::ErrorKind;
use concierge_core::provider::{Provider, ProviderRequest, ProviderResponse};
use concierge_core::query::Modality;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Mock Provider ────────────────────────────────────────────────────────

/// Replies with the same text to every completion request.
struct ScriptedProvider {
    reply: String,
    calls: std::sync::Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: std::sync::Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let model = request.model.clone();
        self.calls.lock().unwrap().push(request);
        Ok(ProviderResponse {
            message: Message::assistant(&self.reply),
            usage: None,
            model,
        })
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────

fn config_for(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.weather.base_url = server.uri();
    config.weather.api_key = Some("owm-test".into());
    config.news.base_url = server.uri();
    config.news.api_key = Some("news-test".into());
    config.search.base_url = server.uri();
    config
}

fn pipeline(config: &AppConfig) -> ExecutionPipeline {
    build_pipeline_with_provider(config, None).expect("default agents register")
}

fn london_weather() -> serde_json::Value {
    serde_json::json!({
        "name": "London",
        "main": {"temp": 14.2, "feels_like": 13.0, "humidity": 72},
        "weather": [{"description": "overcast clouds"}],
        "wind": {"speed": 3.6}
    })
}

// ── E2E: routing outcomes ────────────────────────────────────────────────

#[tokio::test]
async fn e2e_weather_question_goes_to_weather_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "owm-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_weather()))
        .expect(1)
        .mount(&server)
        .await;

    let pipeline = pipeline(&config_for(&server));
    let result = pipeline.process("What's the weather in London?", Modality::Text).await;

    assert!(result.success);
    assert_eq!(result.agent_used.as_deref(), Some("Weather"));
    assert!(result.response_text.contains("Current weather in London: 14.2°C"));
    assert_eq!(result.tools_used, vec!["current_weather"]);
    assert!(!result.degraded);
    assert!(result.execution_time_seconds >= 0.0);
}

#[tokio::test]
async fn e2e_percentage_goes_to_general() {
    let server = MockServer::start().await;
    let pipeline = pipeline(&config_for(&server));

    let result = pipeline.process("Calculate 15% of 250", Modality::Text).await;

    assert!(result.success);
    assert_eq!(result.agent_used.as_deref(), Some("General"));
    assert!(result.response_text.contains("37.5"));
    assert_eq!(result.tools_used, vec!["calculator"]);
}

#[tokio::test]
async fn e2e_blank_input_is_invalid_query() {
    let server = MockServer::start().await;
    let pipeline = pipeline(&config_for(&server));

    for text in ["", "   ", "\t\n"] {
        let result = pipeline.process(text, Modality::Voice).await;
        assert!(!result.success);
        assert!(result.agent_used.is_none());
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidQuery));
    }

    // No adapter was ever reached.
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn e2e_stalled_weather_api_still_answers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(london_weather())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.tools.timeouts.insert("current_weather".into(), 0.2);
    let pipeline = pipeline(&config);

    let result = pipeline.process("What's the weather in London?", Modality::Text).await;

    assert!(result.success);
    assert!(result.degraded);
    assert_eq!(result.agent_used.as_deref(), Some("Weather"));
    assert!(result.response_text.contains("I'm sorry"));
    assert!(result.response_text.contains("London"));
    assert!(result.execution_time_seconds < 5.0);
}

#[tokio::test]
async fn e2e_research_question_uses_web_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("q", "rust programming language"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "AbstractText": "Rust is a general-purpose programming language.",
            "AbstractSource": "Wikipedia",
            "RelatedTopics": []
        })))
        .mount(&server)
        .await;

    let pipeline = pipeline(&config_for(&server));
    let result = pipeline
        .process("Tell me about the Rust programming language", Modality::Text)
        .await;

    assert!(result.success);
    assert_eq!(result.agent_used.as_deref(), Some("Research"));
    assert!(result.response_text.contains("general-purpose programming language"));
    assert_eq!(result.tools_used, vec!["web_search"]);
}

#[tokio::test]
async fn e2e_news_question_uses_headlines() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("category", "technology"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "articles": [{"title": "New chip unveiled", "source": {"name": "Wired"}}]
        })))
        .mount(&server)
        .await;

    let pipeline = pipeline(&config_for(&server));
    let result = pipeline.process("What's the latest tech news?", Modality::Text).await;

    assert!(result.success);
    assert_eq!(result.agent_used.as_deref(), Some("Research"));
    assert!(result.response_text.contains("New chip unveiled (Wired)"));
}

#[tokio::test]
async fn e2e_small_talk_falls_back_to_language_model() {
    let server = MockServer::start().await;
    let provider = ScriptedProvider::new("Happy to help! What would you like to know?");
    let pipeline = build_pipeline_with_provider(&config_for(&server), Some(provider.clone()))
        .expect("default agents register");

    let result = pipeline.process("Write me a limerick", Modality::Voice).await;

    assert!(result.success);
    assert_eq!(result.agent_used.as_deref(), Some("General"));
    assert_eq!(result.response_text, "Happy to help! What would you like to know?");
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn e2e_same_text_routes_identically() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_weather()))
        .mount(&server)
        .await;

    let pipeline = pipeline(&config_for(&server));
    let first = pipeline.process("Weather in London please", Modality::Text).await;
    let second = pipeline.process("Weather in London please", Modality::Text).await;

    assert_eq!(first.agent_used, second.agent_used);
    assert_eq!(first.agent_used.as_deref(), Some("Weather"));
}

#[tokio::test]
async fn e2e_missing_service_key_degrades() {
    let server = MockServer::start().await;
    let mut config = config_for(&server);
    config.weather.api_key = None;
    let pipeline = pipeline(&config);

    let result = pipeline.process("Will it rain in Paris tomorrow?", Modality::Text).await;

    assert!(result.success);
    assert!(result.degraded);
    assert_eq!(result.agent_used.as_deref(), Some("Weather"));
    assert!(result.response_text.contains("not configured"));
}
