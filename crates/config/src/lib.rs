//! Configuration loading, validation, and management for Concierge.
//!
//! Loads configuration from `~/.concierge/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Agent kinds the runtime knows how to build.
pub const KNOWN_AGENTS: &[&str] = &["Weather", "Research", "General"];

/// Upper bound accepted for any tool timeout, in seconds.
pub const MAX_TOOL_TIMEOUT_SECS: f64 = 3600.0;

/// The root configuration structure.
///
/// Maps directly to `~/.concierge/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Language-model API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Routing policy and agent order
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Tool adapter bounds
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Weather API settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// News API settings
    #[serde(default)]
    pub news: NewsConfig,

    /// Web search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1024
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("routing", &self.routing)
            .field("tools", &self.tools)
            .field("weather", &self.weather)
            .field("news", &self.news)
            .field("search", &self.search)
            .field("providers", &self.providers)
            .finish()
    }
}

/// Routing policy: fallback rule and registration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Below this top score the fallback agent is chosen
    #[serde(default = "default_fallback_threshold")]
    pub fallback_threshold: f64,

    /// Name of the designated fallback agent
    #[serde(default = "default_fallback_agent")]
    pub fallback_agent: String,

    /// Agents to register, in order. Order breaks score ties.
    #[serde(default = "default_agents")]
    pub agents: Vec<String>,
}

fn default_fallback_threshold() -> f64 {
    0.15
}
fn default_fallback_agent() -> String {
    "General".into()
}
fn default_agents() -> Vec<String> {
    KNOWN_AGENTS.iter().map(|s| s.to_string()).collect()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            fallback_threshold: default_fallback_threshold(),
            fallback_agent: default_fallback_agent(),
            agents: default_agents(),
        }
    }
}

/// Per-adapter execution bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Default bound for every adapter, in seconds
    #[serde(default = "default_tool_timeout_secs")]
    pub timeout_secs: f64,

    /// Bound for language-model completions, in seconds
    #[serde(default = "default_completion_timeout_secs")]
    pub completion_timeout_secs: f64,

    /// Per-adapter overrides keyed by adapter name, in seconds
    #[serde(default)]
    pub timeouts: HashMap<String, f64>,
}

fn default_tool_timeout_secs() -> f64 {
    5.0
}
fn default_completion_timeout_secs() -> f64 {
    30.0
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_tool_timeout_secs(),
            completion_timeout_secs: default_completion_timeout_secs(),
            timeouts: HashMap::new(),
        }
    }
}

impl ToolsConfig {
    /// Effective bound for the named adapter.
    pub fn timeout_for(&self, tool_name: &str) -> Duration {
        let secs = match self.timeouts.get(tool_name) {
            Some(secs) => *secs,
            None if tool_name == "completion" => self.completion_timeout_secs,
            None => self.timeout_secs,
        };
        Duration::try_from_secs_f64(secs.min(MAX_TOOL_TIMEOUT_SECS))
            .unwrap_or(Duration::from_secs_f64(default_tool_timeout_secs()))
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_weather_url")]
    pub base_url: String,

    /// "metric" or "imperial"
    #[serde(default = "default_units")]
    pub units: String,
}

fn default_weather_url() -> String {
    "https://api.openweathermap.org/data/2.5".into()
}
fn default_units() -> String {
    "metric".into()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_url(),
            units: default_units(),
        }
    }
}

impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("units", &self.units)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_news_url")]
    pub base_url: String,

    /// Country code for top headlines
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_news_url() -> String {
    "https://newsapi.org/v2".into()
}
fn default_country() -> String {
    "us".into()
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_news_url(),
            country: default_country(),
        }
    }
}

impl std::fmt::Debug for NewsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("country", &self.country)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_url")]
    pub base_url: String,
}

fn default_search_url() -> String {
    "https://api.duckduckgo.com".into()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_url(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.concierge/config.toml).
    ///
    /// Environment overrides:
    /// - `CONCIERGE_API_KEY`, then `OPENAI_API_KEY`, then `OPENROUTER_API_KEY`
    /// - `CONCIERGE_PROVIDER`, `CONCIERGE_MODEL`
    /// - `CONCIERGE_FALLBACK_THRESHOLD`
    /// - `WEATHER_API_KEY`, `NEWS_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup` (injectable for tests).
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if self.api_key.is_none() {
            self.api_key = lookup("CONCIERGE_API_KEY")
                .or_else(|| lookup("OPENAI_API_KEY"))
                .or_else(|| lookup("OPENROUTER_API_KEY"));
        }

        if let Some(provider) = lookup("CONCIERGE_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(model) = lookup("CONCIERGE_MODEL") {
            self.default_model = model;
        }

        if let Some(raw) = lookup("CONCIERGE_FALLBACK_THRESHOLD") {
            self.routing.fallback_threshold = raw.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "CONCIERGE_FALLBACK_THRESHOLD must be a number, got '{raw}'"
                ))
            })?;
        }

        if self.weather.api_key.is_none() {
            self.weather.api_key = lookup("WEATHER_API_KEY");
        }

        if self.news.api_key.is_none() {
            self.news.api_key = lookup("NEWS_API_KEY");
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".concierge")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        let threshold = self.routing.fallback_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::ValidationError(format!(
                "routing.fallback_threshold must be between 0.0 and 1.0, got {threshold}"
            )));
        }

        if self.routing.agents.is_empty() {
            return Err(ConfigError::ValidationError(
                "routing.agents must list at least one agent".into(),
            ));
        }

        if let Some(unknown) = self
            .routing
            .agents
            .iter()
            .find(|name| !KNOWN_AGENTS.contains(&name.as_str()))
        {
            return Err(ConfigError::ValidationError(format!(
                "unknown agent '{unknown}' in routing.agents (known: {})",
                KNOWN_AGENTS.join(", ")
            )));
        }

        let all_timeouts = [self.tools.timeout_secs, self.tools.completion_timeout_secs]
            .into_iter()
            .chain(self.tools.timeouts.values().copied());
        for secs in all_timeouts {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "tool timeouts must be positive, got {secs}"
                )));
            }
            if secs > MAX_TOOL_TIMEOUT_SECS {
                return Err(ConfigError::ValidationError(format!(
                    "tool timeouts must not exceed {MAX_TOOL_TIMEOUT_SECS}s, got {secs}"
                )));
            }
        }

        if !matches!(self.weather.units.as_str(), "metric" | "imperial") {
            return Err(ConfigError::ValidationError(format!(
                "weather.units must be 'metric' or 'imperial', got '{}'",
                self.weather.units
            )));
        }

        Ok(())
    }

    /// Check if a language-model API key is available.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
            || self
                .providers
                .get(&self.default_provider)
                .is_some_and(|p| p.api_key.is_some())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            routing: RoutingConfig::default(),
            tools: ToolsConfig::default(),
            weather: WeatherConfig::default(),
            news: NewsConfig::default(),
            search: SearchConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.routing.fallback_threshold, 0.15);
        assert_eq!(config.routing.fallback_agent, "General");
        assert_eq!(config.routing.agents, vec!["Weather", "Research", "General"]);
        assert_eq!(config.tools.timeout_for("current_weather"), Duration::from_secs(5));
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.default_provider, config.default_provider);
        assert_eq!(parsed.routing.agents, config.routing.agents);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let toml_str = r#"
[routing]
agents = ["General", "Weather"]

[tools]
timeout_secs = 2.5
[tools.timeouts]
web_search = 8
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.routing.agents, vec!["General", "Weather"]);
        assert_eq!(config.routing.fallback_threshold, 0.15);
        assert_eq!(config.tools.timeout_for("web_search"), Duration::from_secs(8));
        assert_eq!(config.tools.timeout_for("calculator"), Duration::from_millis(2500));
        assert_eq!(config.tools.timeout_for("completion"), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            default_temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn threshold_out_of_range_rejected() {
        let mut config = AppConfig::default();
        config.routing.fallback_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_agent_rejected() {
        let mut config = AppConfig::default();
        config.routing.agents.push("Stocks".into());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Stocks"));
    }

    #[test]
    fn empty_agent_list_rejected() {
        let mut config = AppConfig::default();
        config.routing.agents.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_timeout_rejected() {
        let mut config = AppConfig::default();
        config.tools.timeouts.insert("news_search".into(), 0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_timeout_rejected_and_clamped() {
        let mut config = AppConfig::default();
        config.tools.timeout_secs = 1e30;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        // Unvalidated values still yield a usable bound.
        assert_eq!(
            config.tools.timeout_for("web_search"),
            Duration::from_secs_f64(MAX_TOOL_TIMEOUT_SECS)
        );
        config.tools.timeouts.insert("calculator".into(), -1.0);
        assert_eq!(config.tools.timeout_for("calculator"), Duration::from_secs(5));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("CONCIERGE_MODEL", "gpt-4o"),
                ("CONCIERGE_FALLBACK_THRESHOLD", "0.3"),
                ("WEATHER_API_KEY", "owm-key"),
                ("NEWS_API_KEY", "news-key"),
            ]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.default_model, "gpt-4o");
        assert_eq!(config.routing.fallback_threshold, 0.3);
        assert_eq!(config.weather.api_key.as_deref(), Some("owm-key"));
        assert_eq!(config.news.api_key.as_deref(), Some("news-key"));
    }

    #[test]
    fn file_key_wins_over_env() {
        let mut config = AppConfig::default();
        config.weather.api_key = Some("from-file".into());
        config.apply_env(env(&[("WEATHER_API_KEY", "from-env")])).unwrap();
        assert_eq!(config.weather.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn bad_threshold_env_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(env(&[("CONCIERGE_FALLBACK_THRESHOLD", "high")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.default_provider, "openai");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "default_model = \"llama3\"\n[weather]\nunits = \"imperial\"\n"
        )
        .unwrap();
        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.default_model, "llama3");
        assert_eq!(config.weather.units, "imperial");
    }

    #[test]
    fn unparseable_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "routing = [[[").unwrap();
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut config = AppConfig::default();
        config.api_key = Some("sk-secret".into());
        config.news.api_key = Some("news-secret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(!debug.contains("news-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("fallback_threshold"));
        assert!(toml_str.contains("openweathermap"));
    }
}
