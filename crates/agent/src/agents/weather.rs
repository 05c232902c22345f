//! Weather specialist: current conditions and short-range forecasts.

use std::sync::Arc;

use async_trait::async_trait;
use concierge_core::agent::Agent;
use concierge_core::error::AgentError;
use concierge_core::outcome::AgentResponse;
use concierge_core::query::{ConfidenceScore, Query};
use concierge_core::tool::ToolAdapter;
use regex_lite::Regex;
use tracing::{debug, warn};

use super::text::{any_word, count_words, title_case};

pub const DEFAULT_LOCATION: &str = "New York";

const WEATHER_KEYWORDS: &[&str] = &[
    "weather", "temperature", "rain", "snow", "sunny", "cloudy", "forecast", "humidity",
    "wind", "storm", "hot", "cold", "degrees", "celsius", "fahrenheit", "precipitation",
    "climate", "meteorology", "atmospheric", "barometric", "pressure",
];

const FORECAST_TERMS: &[&str] = &["forecast", "tomorrow", "next week", "upcoming", "future"];

const FORECAST_INDICATORS: &[&str] = &[
    "forecast", "tomorrow", "next", "upcoming", "future", "will be", "going to be", "expect",
    "prediction", "days", "week", "weekend",
];

const LOCATION_PATTERNS: &[&str] = &[
    r"\b(?:in|at|for)\s+([a-z][a-z\s,]*)",
    r"^([a-z][a-z\s]*?)\s+weather\b",
];

/// Words that end a captured place name ("paris this weekend" -> "paris").
const LOCATION_TERMINATORS: &[&str] = &[
    "today", "tomorrow", "tonight", "now", "this", "next", "right", "later", "please", "on",
    "during", "over", "currently", "like", "be", "is", "will", "going", "and", "or", "in",
    "at", "for", "weather", "forecast", "week", "weekend", "morning", "afternoon", "evening",
    "the",
];

/// Captures that are not places.
const NOT_PLACES: &[&str] = &["me", "us", "it", "there", "here", "you", "a", "my", "our", "what", "s"];

pub struct WeatherAgent {
    current: Arc<dyn ToolAdapter>,
    forecast: Arc<dyn ToolAdapter>,
    location_patterns: Vec<Regex>,
}

impl WeatherAgent {
    pub fn new(current: Arc<dyn ToolAdapter>, forecast: Arc<dyn ToolAdapter>) -> Self {
        Self {
            current,
            forecast,
            location_patterns: LOCATION_PATTERNS
                .iter()
                .filter_map(|p| Regex::new(p).ok())
                .collect(),
        }
    }

    /// Place named in the (lower-cased) text, title-cased.
    pub fn extract_location(&self, text: &str) -> Option<String> {
        self.location_patterns
            .iter()
            .flat_map(|re| re.captures_iter(text))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .find_map(clean_location)
    }

    pub fn is_forecast_query(text: &str) -> bool {
        any_word(text, FORECAST_INDICATORS)
    }
}

/// First run of non-terminator words in a capture ("the weekend in berlin" -> "Berlin").
fn clean_location(raw: &str) -> Option<String> {
    let words: Vec<&str> = raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|w| !w.is_empty())
        .collect();

    words
        .split(|w| LOCATION_TERMINATORS.contains(w))
        .map(|run| run.join(" "))
        .find(|place| place.len() >= 2 && !NOT_PLACES.contains(&place.as_str()))
        .map(|place| title_case(&place))
}

#[async_trait]
impl Agent for WeatherAgent {
    fn name(&self) -> &str {
        "Weather"
    }

    fn description(&self) -> &str {
        "Current weather conditions and forecasts for any location."
    }

    fn tools(&self) -> Vec<&str> {
        vec![self.current.name(), self.forecast.name()]
    }

    fn score(&self, query: &Query) -> ConfidenceScore {
        let text = query.normalized();

        let mut score = 0.2 * count_words(&text, WEATHER_KEYWORDS) as f64;
        if self.extract_location(&text).is_some() {
            score += 0.3;
        }
        if any_word(&text, FORECAST_TERMS) {
            score += 0.2;
        }

        ConfidenceScore::new(score)
    }

    async fn execute(&self, query: &Query) -> Result<AgentResponse, AgentError> {
        let text = query.normalized();
        let location = self
            .extract_location(&text)
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

        let tool = if Self::is_forecast_query(&text) {
            &self.forecast
        } else {
            &self.current
        };
        debug!(tool = tool.name(), location = %location, "Fetching weather");

        let parameters = serde_json::json!({ "location": location });
        match tool.invoke(parameters).await {
            Ok(output) => Ok(AgentResponse::new(output.output).with_tool(tool.name())),
            Err(e) => {
                warn!(tool = tool.name(), error = %e, "Weather lookup failed, answering without live data");
                let text = format!(
                    "I'm sorry, I couldn't get the live weather for {location} because {}. \
                     Please try again in a moment.",
                    e.reason()
                );
                Ok(AgentResponse::new(text).with_tool(tool.name()).degraded())
            }
        }
    }
}
