//! `concierge ask`: one-shot or interactive question answering.

use std::io::Write;

use concierge_agent::ExecutionPipeline;
use concierge_config::AppConfig;
use concierge_core::outcome::ExecutionResult;
use concierge_core::query::Modality;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(text: Vec<String>, voice: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let pipeline = concierge_agent::build_pipeline(&config)?;
    let modality = if voice { Modality::Voice } else { Modality::Text };

    if !text.is_empty() {
        let result = pipeline.process(text.join(" "), modality).await;
        print_result(&result, json)?;
        return Ok(());
    }

    interactive(&pipeline, &config, modality, json).await
}

async fn interactive(
    pipeline: &ExecutionPipeline,
    config: &AppConfig,
    modality: Modality,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = pipeline.router().registry();

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║         Concierge · Interactive Mode         ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Agents:    {}", registry.names().join(", "));
    println!("  Fallback:  {} (below {:.2})", config.routing.fallback_agent, config.routing.fallback_threshold);
    println!("  Model:     {}", if config.has_api_key() { config.default_model.as_str() } else { "none (no API key)" });
    println!();
    println!("  Type your question and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }

        let result = pipeline.process(line, modality).await;
        println!();
        print_result(&result, json)?;
        println!();
    }

    println!();
    println!("  Goodbye!");
    println!();
    Ok(())
}

fn print_result(result: &ExecutionResult, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    let agent = result.agent_used.as_deref().unwrap_or("none");
    if result.success {
        for line in result.response_text.lines() {
            println!("  {agent} > {line}");
        }
    } else {
        let kind = result
            .error_kind()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "Error".into());
        eprintln!("  [{kind}] {}", result.response_text);
    }

    let mut footer = format!("  ({agent}, {:.2}s", result.execution_time_seconds);
    if !result.tools_used.is_empty() {
        footer.push_str(&format!(", tools: {}", result.tools_used.join(", ")));
    }
    if result.degraded {
        footer.push_str(", live data unavailable");
    }
    footer.push(')');
    println!("{footer}");

    Ok(())
}
