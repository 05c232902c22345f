//! `concierge route`: explain a routing decision without executing it.

use concierge_config::AppConfig;
use concierge_core::query::{Modality, Query};

pub async fn run(text: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let pipeline = concierge_agent::build_pipeline(&config)?;
    let router = pipeline.router();

    let query = Query::unchecked(text.join(" "), Modality::Text);
    let decision = router.select(&query)?;

    println!("Routing: \"{}\"", query.trimmed());
    println!("==================");
    for (name, score) in &decision.scores {
        let marker = if name == decision.agent_name() { "→" } else { " " };
        println!("  {marker} {name:<10} {score}");
    }
    println!();
    println!("  Selected:   {}", decision.agent_name());
    println!("  Top score:  {}", decision.top_score);
    if decision.fallback_used {
        println!(
            "  Fallback:   yes (top score below {:.2})",
            router.policy().fallback_threshold
        );
    }

    Ok(())
}
