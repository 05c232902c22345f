//! Built-in tool adapters for Concierge.
//!
//! Adapters give agents their only contact with the outside world:
//! weather and news APIs, web search, a calculator, the local clock and
//! the language model. Each one is bounded by its own timeout and reports
//! failures as typed [`ToolError`](concierge_core::error::ToolError)s.

pub mod calculator;
pub mod completion;
pub mod datetime;
pub mod http;
pub mod news;
pub mod weather;
pub mod web_search;

use std::sync::Arc;

use concierge_config::AppConfig;
use concierge_core::provider::Provider;
use concierge_core::tool::ToolAdapter;

pub use calculator::CalculatorTool;
pub use completion::CompletionTool;
pub use datetime::DateTimeTool;
pub use news::{NewsApi, NewsSearchTool, TopHeadlinesTool};
pub use weather::{CurrentWeatherTool, WeatherApi, WeatherForecastTool};
pub use web_search::WebSearchTool;

/// Every adapter an agent may need, shared behind `Arc`s.
///
/// `completion` is absent when no language model is configured.
#[derive(Clone)]
pub struct ToolKit {
    pub current_weather: Arc<dyn ToolAdapter>,
    pub weather_forecast: Arc<dyn ToolAdapter>,
    pub news_search: Arc<dyn ToolAdapter>,
    pub top_headlines: Arc<dyn ToolAdapter>,
    pub web_search: Arc<dyn ToolAdapter>,
    pub calculator: Arc<dyn ToolAdapter>,
    pub datetime: Arc<dyn ToolAdapter>,
    pub completion: Option<Arc<dyn ToolAdapter>>,
}

impl ToolKit {
    /// Names of the adapters present, for status output.
    pub fn names(&self) -> Vec<&str> {
        let mut names = vec![
            self.current_weather.name(),
            self.weather_forecast.name(),
            self.news_search.name(),
            self.top_headlines.name(),
            self.web_search.name(),
            self.calculator.name(),
            self.datetime.name(),
        ];
        if let Some(completion) = &self.completion {
            names.push(completion.name());
        }
        names
    }
}

/// Build every adapter from configuration.
///
/// `provider` backs the `completion` adapter; pass `None` to run without a
/// language model.
pub fn build_from_config(config: &AppConfig, provider: Option<Arc<dyn Provider>>) -> ToolKit {
    let client = http::shared_client();
    let timeouts = &config.tools;

    let weather_api = Arc::new(WeatherApi::new(
        client.clone(),
        &config.weather.base_url,
        config.weather.api_key.clone(),
        &config.weather.units,
    ));
    let news_api = Arc::new(NewsApi::new(
        client.clone(),
        &config.news.base_url,
        config.news.api_key.clone(),
        &config.news.country,
    ));

    let completion = provider.map(|provider| {
        let tool = CompletionTool::new(provider, &config.default_model)
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.default_max_tokens)
            .with_timeout(timeouts.timeout_for("completion"));
        Arc::new(tool) as Arc<dyn ToolAdapter>
    });

    ToolKit {
        current_weather: Arc::new(
            CurrentWeatherTool::new(weather_api.clone())
                .with_timeout(timeouts.timeout_for("current_weather")),
        ),
        weather_forecast: Arc::new(
            WeatherForecastTool::new(weather_api).with_timeout(timeouts.timeout_for("weather_forecast")),
        ),
        news_search: Arc::new(
            NewsSearchTool::new(news_api.clone()).with_timeout(timeouts.timeout_for("news_search")),
        ),
        top_headlines: Arc::new(
            TopHeadlinesTool::new(news_api).with_timeout(timeouts.timeout_for("top_headlines")),
        ),
        web_search: Arc::new(
            WebSearchTool::new(client, &config.search.base_url)
                .with_timeout(timeouts.timeout_for("web_search")),
        ),
        calculator: Arc::new(CalculatorTool::new().with_timeout(timeouts.timeout_for("calculator"))),
        datetime: Arc::new(DateTimeTool::new().with_timeout(timeouts.timeout_for("datetime"))),
        completion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn kit_without_provider_has_no_completion() {
        let kit = build_from_config(&AppConfig::default(), None);
        assert!(kit.completion.is_none());
        assert_eq!(kit.names().len(), 7);
        assert!(kit.names().contains(&"web_search"));
    }

    #[test]
    fn per_adapter_timeouts_applied() {
        let mut config = AppConfig::default();
        config.tools.timeouts.insert("web_search".into(), 8.0);
        let kit = build_from_config(&config, None);

        assert_eq!(kit.web_search.timeout(), Duration::from_secs(8));
        assert_eq!(kit.current_weather.timeout(), Duration::from_secs(5));
    }

    struct SilentProvider;

    #[async_trait::async_trait]
    impl Provider for SilentProvider {
        fn name(&self) -> &str {
            "silent"
        }

        async fn complete(
            &self,
            _request: concierge_core::provider::ProviderRequest,
        ) -> Result<concierge_core::provider::ProviderResponse, concierge_core::error::ProviderError> {
            Err(concierge_core::error::ProviderError::NotConfigured("silent".into()))
        }
    }

    #[test]
    fn completion_uses_its_own_timeout() {
        let mut config = AppConfig::default();
        config.tools.completion_timeout_secs = 12.0;
        let kit = build_from_config(&config, Some(Arc::new(SilentProvider)));

        let completion = kit.completion.expect("provider given");
        assert_eq!(completion.name(), "completion");
        assert_eq!(completion.timeout(), Duration::from_secs(12));
        assert_eq!(kit.calculator.timeout(), Duration::from_secs(5));
    }
}
