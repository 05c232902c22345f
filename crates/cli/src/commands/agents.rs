//! `concierge agents`: list registered agents.

use concierge_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let providers = concierge_providers::build_from_config(&config);
    let tools = concierge_tools::build_from_config(&config, providers.default_provider());
    let registry = concierge_agent::build_registry(&config, &tools)?;

    println!("Agents (in routing order)");
    println!("=========================");
    for (i, info) in registry.describe().iter().enumerate() {
        let fallback = if info.name == config.routing.fallback_agent {
            "  [fallback]"
        } else {
            ""
        };
        println!("  {}. {}{fallback}", i + 1, info.name);
        println!("     {}", info.description);
        println!("     Tools: {}", info.tools.join(", "));
    }

    Ok(())
}
