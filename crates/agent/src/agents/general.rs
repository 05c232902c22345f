//! General assistant and designated fallback: math, clock and conversation.
//!
//! Scores at least [`SCORE_FLOOR`] for every query so that it can always
//! take over when no specialist is confident.

use std::sync::Arc;

use async_trait::async_trait;
use concierge_core::agent::Agent;
use concierge_core::error::AgentError;
use concierge_core::outcome::AgentResponse;
use concierge_core::query::{ConfidenceScore, Query};
use concierge_core::tool::ToolAdapter;
use concierge_tools::calculator::extract_expression;
use regex_lite::Regex;
use tracing::{debug, warn};

use super::text::{any_word, count_words};

pub const SCORE_FLOOR: f64 = 0.1;

const MATH_KEYWORDS: &[&str] = &[
    "calculate", "compute", "math", "mathematics", "equation", "solve", "add", "subtract",
    "multiply", "divide", "percentage", "percent", "sum", "total", "average", "mean",
];

const TIME_KEYWORDS: &[&str] = &[
    "time", "date", "today", "now", "current", "when", "day", "month", "year", "hour", "minute",
    "clock",
];

const CONVERSATION_KEYWORDS: &[&str] = &[
    "hello", "hi", "hey", "thanks", "thank you", "help", "please", "can you", "would you",
    "how are you",
];

const MATH_PATTERNS: &[&str] = &[
    r"\d\s*[-+*/x×÷]\s*\d",
    r"\d\s*%",
    r"\d\.\d",
];

const TIME_INDICATORS: &[&str] = &[
    "what time", "current time", "what date", "today", "now", "current date", "day is it",
    "time is it", "what day",
];

const GREETINGS: &[&str] = &[
    "hello", "hi", "hey", "good morning", "good afternoon", "good evening", "how are you",
];

const SYSTEM_PROMPT: &str = "You are Concierge, a friendly and concise personal assistant. \
Answer in a few sentences. For live weather or news, suggest the user ask for it directly.";

const HELP_TEXT: &str = "I can help with current weather and forecasts, the latest news and \
web research, calculations like \"15% of 250\", and the current date and time. \
Try asking \"What's the weather in Paris?\" or \"What's the latest tech news?\"";

pub struct GeneralAgent {
    calculator: Arc<dyn ToolAdapter>,
    datetime: Arc<dyn ToolAdapter>,
    completion: Option<Arc<dyn ToolAdapter>>,
    math_patterns: Vec<Regex>,
}

impl GeneralAgent {
    pub fn new(
        calculator: Arc<dyn ToolAdapter>,
        datetime: Arc<dyn ToolAdapter>,
        completion: Option<Arc<dyn ToolAdapter>>,
    ) -> Self {
        Self {
            calculator,
            datetime,
            completion,
            math_patterns: MATH_PATTERNS
                .iter()
                .filter_map(|p| Regex::new(p).ok())
                .collect(),
        }
    }

    fn contains_math_expression(&self, text: &str) -> bool {
        self.math_patterns.iter().any(|re| re.is_match(text))
    }

    pub fn is_time_query(text: &str) -> bool {
        any_word(text, TIME_INDICATORS)
    }

    async fn converse(&self, query: &Query, mut tried: Vec<String>) -> AgentResponse {
        let text = query.normalized();
        let fallback = |tried: Vec<String>| {
            let greeting = if any_word(&text, GREETINGS) { "Hello! " } else { "" };
            AgentResponse {
                text: format!("{greeting}{HELP_TEXT}"),
                tools_used: tried,
                degraded: true,
            }
        };

        let Some(completion) = &self.completion else {
            debug!("No language model configured, answering with help text");
            return fallback(tried);
        };

        let parameters = serde_json::json!({
            "prompt": query.trimmed(),
            "system": SYSTEM_PROMPT,
        });
        tried.push(completion.name().to_string());

        match completion.invoke(parameters).await {
            Ok(output) => AgentResponse {
                text: output.output,
                tools_used: tried,
                degraded: false,
            },
            Err(e) => {
                warn!(error = %e, "Language model unavailable, answering with help text");
                fallback(tried)
            }
        }
    }
}

#[async_trait]
impl Agent for GeneralAgent {
    fn name(&self) -> &str {
        "General"
    }

    fn description(&self) -> &str {
        "Calculations, date and time, and general conversation. Handles anything the specialists don't."
    }

    fn tools(&self) -> Vec<&str> {
        let mut tools = vec![self.calculator.name(), self.datetime.name()];
        if let Some(completion) = &self.completion {
            tools.push(completion.name());
        }
        tools
    }

    fn score(&self, query: &Query) -> ConfidenceScore {
        let text = query.normalized();

        let math = (0.2 * count_words(&text, MATH_KEYWORDS) as f64).min(0.8);
        let time = (0.2 * count_words(&text, TIME_KEYWORDS) as f64).min(0.8);
        let conversation = (0.1 * count_words(&text, CONVERSATION_KEYWORDS) as f64).min(0.5);
        let expression = if self.contains_math_expression(&text) { 0.6 } else { 0.0 };

        let score = (math + time + conversation + expression).max(SCORE_FLOOR);
        ConfidenceScore::new(score)
    }

    async fn execute(&self, query: &Query) -> Result<AgentResponse, AgentError> {
        let text = query.normalized();
        let mut tried = Vec::new();

        if let Some(expression) = extract_expression(&text) {
            let parameters = serde_json::json!({ "expression": expression });
            match self.calculator.invoke(parameters).await {
                Ok(output) => {
                    return Ok(AgentResponse::new(format!("{expression} = {}", output.output))
                        .with_tool(self.calculator.name()));
                }
                Err(e) => {
                    debug!(expression = %expression, error = %e, "Calculator declined, trying conversation");
                    tried.push(self.calculator.name().to_string());
                }
            }
        }

        if Self::is_time_query(&text) {
            match self.datetime.invoke(serde_json::json!({})).await {
                Ok(output) => {
                    let mut response = AgentResponse::new(output.output);
                    response.tools_used = tried;
                    return Ok(response.with_tool(self.datetime.name()));
                }
                Err(e) => {
                    warn!(error = %e, "Clock lookup failed");
                    tried.push(self.datetime.name().to_string());
                }
            }
        }

        Ok(self.converse(query, tried).await)
    }
}
