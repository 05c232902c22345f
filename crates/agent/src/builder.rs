//! Assemble the registry, router and pipeline from configuration.

use std::sync::Arc;

use concierge_config::AppConfig;
use concierge_core::agent::Agent;
use concierge_core::error::{self, RegistryError};
use concierge_core::provider::Provider;
use concierge_tools::ToolKit;
use tracing::info;

use crate::agents::{GeneralAgent, ResearchAgent, WeatherAgent};
use crate::pipeline::ExecutionPipeline;
use crate::registry::AgentRegistry;
use crate::router::{ConfidenceRouter, RoutingPolicy};

/// Instantiate one agent by its configured name.
pub fn make_agent(name: &str, tools: &ToolKit) -> Result<Arc<dyn Agent>, RegistryError> {
    let agent: Arc<dyn Agent> = match name {
        "Weather" => Arc::new(WeatherAgent::new(
            tools.current_weather.clone(),
            tools.weather_forecast.clone(),
        )),
        "Research" => Arc::new(ResearchAgent::new(
            tools.news_search.clone(),
            tools.top_headlines.clone(),
            tools.web_search.clone(),
        )),
        "General" => Arc::new(GeneralAgent::new(
            tools.calculator.clone(),
            tools.datetime.clone(),
            tools.completion.clone(),
        )),
        other => return Err(RegistryError::UnknownAgent(other.to_string())),
    };
    Ok(agent)
}

/// Register the configured agents in configuration order.
pub fn build_registry(config: &AppConfig, tools: &ToolKit) -> Result<AgentRegistry, RegistryError> {
    let agents = config
        .routing
        .agents
        .iter()
        .map(|name| make_agent(name, tools))
        .collect::<Result<Vec<_>, _>>()?;
    AgentRegistry::from_agents(agents)
}

pub fn routing_policy(config: &AppConfig) -> RoutingPolicy {
    RoutingPolicy {
        fallback_threshold: config.routing.fallback_threshold,
        fallback_agent: config.routing.fallback_agent.clone(),
    }
}

/// Build a pipeline using the default language-model provider from config.
pub fn build_pipeline(config: &AppConfig) -> error::Result<ExecutionPipeline> {
    let providers = concierge_providers::build_from_config(config);
    build_pipeline_with_provider(config, providers.default_provider())
}

/// Build a pipeline with an explicit provider (or none).
pub fn build_pipeline_with_provider(
    config: &AppConfig,
    provider: Option<Arc<dyn Provider>>,
) -> error::Result<ExecutionPipeline> {
    let has_llm = provider.is_some();
    let tools = concierge_tools::build_from_config(config, provider);
    let registry = Arc::new(build_registry(config, &tools)?);

    info!(
        agents = ?registry.names(),
        tools = ?tools.names(),
        language_model = has_llm,
        "Concierge ready"
    );

    let router = ConfidenceRouter::new(registry, routing_policy(config))?;
    Ok(ExecutionPipeline::new(router))
}
