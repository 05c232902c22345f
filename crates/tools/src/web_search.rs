//! Web search backed by the DuckDuckGo Instant Answer API.
//!
//! The API needs no key. It returns an abstract, a definition, a direct
//! answer and related topics; whichever are present are rendered.

use std::time::Duration;

use async_trait::async_trait;
use concierge_core::error::ToolError;
use concierge_core::tool::{DEFAULT_TOOL_TIMEOUT, ToolAdapter, ToolOutput};
use serde_json::Value;

use crate::http::{get_json, required_str, truncate};

const RELATED_TOPICS: usize = 3;
const TOPIC_CHARS: usize = 200;

pub struct WebSearchTool {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl WebSearchTool {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ToolAdapter for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for facts, definitions and summaries on a topic."
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn call(&self, parameters: Value) -> Result<ToolOutput, ToolError> {
        let query = required_str(&parameters, "query")?;
        let url = format!("{}/", self.base_url);

        let body = get_json(
            &self.client,
            self.name(),
            &url,
            &[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ],
        )
        .await?;

        Ok(ToolOutput::with_data(render(query, &body), body))
    }
}

fn non_empty(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

fn render(query: &str, body: &Value) -> String {
    let mut sections = Vec::new();

    if let Some(answer) = non_empty(&body["Answer"]) {
        sections.push(format!("Quick answer: {answer}"));
    }

    if let Some(summary) = non_empty(&body["AbstractText"]).or_else(|| non_empty(&body["Abstract"])) {
        let mut section = format!("Summary: {summary}");
        if let Some(source) = non_empty(&body["AbstractSource"]) {
            section.push_str(&format!(" (source: {source})"));
        }
        sections.push(section);
    }

    if let Some(definition) = non_empty(&body["Definition"]) {
        let mut section = format!("Definition: {definition}");
        if let Some(source) = non_empty(&body["DefinitionSource"]) {
            section.push_str(&format!(" (source: {source})"));
        }
        sections.push(section);
    }

    let related: Vec<String> = body["RelatedTopics"]
        .as_array()
        .map(|topics| {
            topics
                .iter()
                .filter_map(|t| non_empty(&t["Text"]))
                .take(RELATED_TOPICS)
                .enumerate()
                .map(|(i, text)| format!("{}. {}", i + 1, truncate(text, TOPIC_CHARS)))
                .collect()
        })
        .unwrap_or_default();
    if !related.is_empty() {
        sections.push(format!("Related:\n{}", related.join("\n")));
    }

    if sections.is_empty() {
        return format!("No detailed information found for '{query}'. Try a more specific search.");
    }

    format!("Search results for '{query}':\n\n{}", sections.join("\n\n"))
}
