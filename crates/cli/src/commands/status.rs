//! `concierge status`: show the configuration in effect.

use concierge_config::AppConfig;

fn configured(key: Option<&str>) -> &'static str {
    if key.is_some() { "configured" } else { "missing" }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let providers = concierge_providers::build_from_config(&config);

    println!("Concierge Status");
    println!("================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Provider:     {}", config.default_provider);
    println!("  Model:        {}", config.default_model);
    println!("  Temperature:  {}", config.default_temperature);
    println!("  LLM key:      {}", if config.has_api_key() { "configured" } else { "missing" });
    println!(
        "  Providers:    {}",
        match providers.list() {
            list if list.is_empty() => "none".to_string(),
            list => list.join(", "),
        }
    );
    println!();
    println!("  Agents:       {}", config.routing.agents.join(" > "));
    println!(
        "  Fallback:     {} below {:.2}",
        config.routing.fallback_agent, config.routing.fallback_threshold
    );
    println!(
        "  Timeouts:     {}s per tool, {}s for completion",
        config.tools.timeout_secs, config.tools.completion_timeout_secs
    );
    let mut overrides: Vec<_> = config.tools.timeouts.iter().collect();
    overrides.sort_by(|a, b| a.0.cmp(b.0));
    for (tool, secs) in overrides {
        println!("                {tool}: {secs}s");
    }
    println!();
    println!("  Weather API:  {} ({}, {})", configured(config.weather.api_key.as_deref()), config.weather.base_url, config.weather.units);
    println!("  News API:     {} ({}, {})", configured(config.news.api_key.as_deref()), config.news.base_url, config.news.country);
    println!("  Web search:   {}", config.search.base_url);

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  Config file found");
    } else {
        println!("\n  No config file, using defaults (run `concierge init` to create one)");
    }

    Ok(())
}
