//! Research specialist: news, headlines and web lookups.

use std::sync::Arc;

use async_trait::async_trait;
use concierge_core::agent::Agent;
use concierge_core::error::AgentError;
use concierge_core::outcome::AgentResponse;
use concierge_core::query::{ConfidenceScore, Query};
use concierge_core::tool::ToolAdapter;
use tracing::{debug, warn};

use super::text::{any_word, contains_word, count_words, starts_with_word, strip_words};

const RESEARCH_KEYWORDS: &[&str] = &[
    "search", "find", "research", "information", "facts", "data", "statistics", "study",
    "report", "analysis", "details", "explain", "what is", "who is", "how does", "why does",
    "tell me about", "learn about", "know about",
];

const NEWS_KEYWORDS: &[&str] = &[
    "news", "latest", "recent", "current", "today", "headlines", "breaking", "update",
    "happening", "events", "developments", "announcement", "report", "story", "article",
];

const QUESTION_STARTS: &[&str] = &["what is", "who is", "how does", "why does", "when did", "where is"];

const QUESTION_PHRASES: &[&str] = &["tell me about", "explain", "find information", "search for"];

const RESEARCH_INDICATORS: &[&str] = &[
    "information about", "details about", "facts about", "research on", "study of", "analysis of",
];

const NEWS_INDICATORS: &[&str] = &[
    "news", "latest", "recent", "current events", "headlines", "breaking", "today",
    "happening now", "updates",
];

/// (category, trigger words) for `/top-headlines`.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("business", &["business", "economy", "market", "markets", "stock", "stocks", "finance"]),
    ("technology", &["technology", "tech", "ai", "software", "computer", "computing"]),
    ("health", &["health", "medical", "medicine", "covid", "disease"]),
    ("science", &["science", "scientific", "space", "physics", "biology"]),
    ("sports", &["sports", "sport", "football", "soccer", "basketball", "tennis", "cricket"]),
    ("entertainment", &["entertainment", "movie", "movies", "film", "music", "celebrity"]),
];

/// Words that carry no topic in a news request.
const NEWS_NOISE: &[&str] = &[
    "what", "what's", "whats", "is", "are", "the", "a", "an", "any", "me", "tell", "give", "show",
    "get", "find", "latest", "recent", "news", "headlines", "headline", "breaking", "today",
    "today's", "current", "events", "happening", "now", "updates", "update", "about", "on", "in",
    "of", "for", "top", "stories", "story", "please", "some", "there", "new", "s",
];

/// Leading phrases removed before a web search.
const TOPIC_PREFIXES: &[&str] = &[
    "find information about", "find information on", "tell me about", "information about",
    "details about", "facts about", "learn about", "research on", "search for", "what is",
    "what are", "what was", "who is", "who was", "how does", "how do", "why does", "why is",
    "when did", "where is", "explain", "define",
];

pub struct ResearchAgent {
    news_search: Arc<dyn ToolAdapter>,
    top_headlines: Arc<dyn ToolAdapter>,
    web_search: Arc<dyn ToolAdapter>,
}

impl ResearchAgent {
    pub fn new(
        news_search: Arc<dyn ToolAdapter>,
        top_headlines: Arc<dyn ToolAdapter>,
        web_search: Arc<dyn ToolAdapter>,
    ) -> Self {
        Self {
            news_search,
            top_headlines,
            web_search,
        }
    }

    pub fn is_news_query(text: &str) -> bool {
        any_word(text, NEWS_INDICATORS)
    }

    /// Headline category named in the text, if any.
    pub fn detect_category(text: &str) -> Option<&'static str> {
        CATEGORY_KEYWORDS
            .iter()
            .find(|(_, words)| any_word(text, words))
            .map(|(category, _)| *category)
    }

    /// What remains of a news request once filler and category words are gone.
    pub fn news_topic(text: &str) -> String {
        let topic = strip_words(text, NEWS_NOISE);
        match Self::detect_category(text) {
            Some(category) => {
                let words = CATEGORY_KEYWORDS
                    .iter()
                    .find(|(c, _)| *c == category)
                    .map(|(_, words)| *words)
                    .unwrap_or_default();
                strip_words(&topic, words)
            }
            None => topic,
        }
    }

    /// The subject of a research question, without question starters.
    pub fn search_topic(text: &str) -> String {
        let mut topic = text.trim().trim_end_matches(['?', '!', '.']).trim();
        for prefix in TOPIC_PREFIXES {
            if starts_with_word(topic, prefix) {
                topic = topic[prefix.len()..].trim_start();
                break;
            }
        }
        let topic = topic
            .strip_prefix("the ")
            .or_else(|| topic.strip_prefix("a "))
            .or_else(|| topic.strip_prefix("an "))
            .unwrap_or(topic);
        topic.trim().to_string()
    }

    async fn answer_news(&self, text: &str, original: &str) -> AgentResponse {
        let topic = Self::news_topic(text);
        let (tool, parameters) = if topic.is_empty() {
            let category = Self::detect_category(text).unwrap_or("general");
            (&self.top_headlines, serde_json::json!({ "category": category }))
        } else {
            (&self.news_search, serde_json::json!({ "query": topic }))
        };
        debug!(tool = tool.name(), params = %parameters, "Fetching news");

        match tool.invoke(parameters).await {
            Ok(output) => AgentResponse::new(output.output).with_tool(tool.name()),
            Err(e) => {
                warn!(tool = tool.name(), error = %e, "News lookup failed, trying web search");
                let fallback_topic = if topic.is_empty() { original } else { topic.as_str() };
                let mut response = self.answer_search(fallback_topic).await;
                response.tools_used.insert(0, tool.name().to_string());
                response
            }
        }
    }

    async fn answer_search(&self, topic: &str) -> AgentResponse {
        let tool = &self.web_search;
        match tool.invoke(serde_json::json!({ "query": topic })).await {
            Ok(output) => AgentResponse::new(output.output).with_tool(tool.name()),
            Err(e) => {
                warn!(tool = tool.name(), error = %e, "Web search failed, answering without live data");
                let text = format!(
                    "I'm sorry, I couldn't reach my live sources to research \"{topic}\" because {}. \
                     Please try again shortly.",
                    e.reason()
                );
                AgentResponse::new(text).with_tool(tool.name()).degraded()
            }
        }
    }
}

#[async_trait]
impl Agent for ResearchAgent {
    fn name(&self) -> &str {
        "Research"
    }

    fn description(&self) -> &str {
        "News, headlines and web research on any topic."
    }

    fn tools(&self) -> Vec<&str> {
        vec![
            self.news_search.name(),
            self.top_headlines.name(),
            self.web_search.name(),
        ]
    }

    fn score(&self, query: &Query) -> ConfidenceScore {
        let text = query.normalized();

        let mut score = 0.15 * count_words(&text, RESEARCH_KEYWORDS) as f64;
        score += 0.2 * count_words(&text, NEWS_KEYWORDS) as f64;

        let question = QUESTION_STARTS.iter().any(|p| starts_with_word(&text, p))
            || QUESTION_PHRASES.iter().any(|p| contains_word(&text, p));
        if question {
            score += 0.3;
        }

        score += 0.25 * count_words(&text, RESEARCH_INDICATORS) as f64;

        if text.ends_with('?') {
            score += 0.1;
        }

        ConfidenceScore::new(score)
    }

    async fn execute(&self, query: &Query) -> Result<AgentResponse, AgentError> {
        let text = query.normalized();

        let response = if Self::is_news_query(&text) {
            self.answer_news(&text, query.trimmed()).await
        } else {
            let topic = Self::search_topic(&text);
            let topic = if topic.is_empty() { query.trimmed().to_string() } else { topic };
            self.answer_search(&topic).await
        };

        Ok(response)
    }
}
