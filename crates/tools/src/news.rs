//! NewsAPI adapters: keyword search and category headlines.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use concierge_core::error::ToolError;
use concierge_core::tool::{DEFAULT_TOOL_TIMEOUT, ToolAdapter, ToolOutput};
use serde_json::Value;

use crate::http::{get_json, required_str, truncate};

const PAGE_SIZE: &str = "5";
const DESCRIPTION_CHARS: usize = 150;

/// Categories accepted by the `/top-headlines` endpoint.
pub const CATEGORIES: &[&str] = &[
    "business",
    "entertainment",
    "general",
    "health",
    "science",
    "sports",
    "technology",
];

/// Connection settings shared by both news adapters.
pub struct NewsApi {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    country: String,
}

impl NewsApi {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            country: country.into(),
        }
    }

    fn key(&self, tool_name: &str) -> Result<&str, ToolError> {
        self.api_key.as_deref().ok_or_else(|| ToolError::NotConfigured {
            tool_name: tool_name.to_string(),
            reason: "set NEWS_API_KEY or [news].api_key".into(),
        })
    }
}

/// Search recent articles by keyword.
pub struct NewsSearchTool {
    api: Arc<NewsApi>,
    timeout: Duration,
}

impl NewsSearchTool {
    pub fn new(api: Arc<NewsApi>) -> Self {
        Self {
            api,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ToolAdapter for NewsSearchTool {
    fn name(&self) -> &str {
        "news_search"
    }

    fn description(&self) -> &str {
        "Search recent English-language news articles by keyword."
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn call(&self, parameters: Value) -> Result<ToolOutput, ToolError> {
        let query = required_str(&parameters, "query")?;
        let key = self.api.key(self.name())?;
        let url = format!("{}/everything", self.api.base_url);

        let body = get_json(
            &self.api.client,
            self.name(),
            &url,
            &[
                ("q", query),
                ("apiKey", key),
                ("sortBy", "publishedAt"),
                ("pageSize", PAGE_SIZE),
                ("language", "en"),
            ],
        )
        .await?;

        Ok(render_articles(&format!("Latest news for '{query}'"), body))
    }
}

/// Top headlines for a category in the configured country.
pub struct TopHeadlinesTool {
    api: Arc<NewsApi>,
    timeout: Duration,
}

impl TopHeadlinesTool {
    pub fn new(api: Arc<NewsApi>) -> Self {
        Self {
            api,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ToolAdapter for TopHeadlinesTool {
    fn name(&self) -> &str {
        "top_headlines"
    }

    fn description(&self) -> &str {
        "Top headlines by category (business, technology, health, science, sports, entertainment, general)."
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn call(&self, parameters: Value) -> Result<ToolOutput, ToolError> {
        let category = parameters["category"].as_str().unwrap_or("general");
        if !CATEGORIES.contains(&category) {
            return Err(ToolError::InvalidInput(format!("Unknown news category '{category}'")));
        }

        let key = self.api.key(self.name())?;
        let url = format!("{}/top-headlines", self.api.base_url);

        let body = get_json(
            &self.api.client,
            self.name(),
            &url,
            &[
                ("category", category),
                ("country", self.api.country.as_str()),
                ("apiKey", key),
                ("pageSize", PAGE_SIZE),
            ],
        )
        .await?;

        Ok(render_articles(&format!("Top {category} headlines"), body))
    }
}

/// Render the `articles` array as a numbered list.
fn render_articles(heading: &str, body: Value) -> ToolOutput {
    let articles = body["articles"].as_array().cloned().unwrap_or_default();
    if articles.is_empty() {
        return ToolOutput::with_data(format!("{heading}: no articles found."), body);
    }

    let mut output = format!("{heading}:");
    for (i, article) in articles.iter().enumerate() {
        let title = article["title"].as_str().unwrap_or("Untitled");
        let source = article["source"]["name"].as_str().unwrap_or("Unknown source");
        output.push_str(&format!("\n{}. {title} ({source})", i + 1));
        if let Some(date) = article["publishedAt"].as_str().and_then(|d| d.get(..10)) {
            output.push_str(&format!(" {date}"));
        }
        if let Some(description) = article["description"].as_str().filter(|d| !d.is_empty()) {
            output.push_str(&format!("\n   {}", truncate(description, DESCRIPTION_CHARS)));
        }
    }

    ToolOutput::with_data(output, Value::Array(articles))
}
