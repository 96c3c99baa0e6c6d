use anyhow::Result;
use colored::Colorize;
use promptforge_config::ForgeConfig;
use promptforge_core::Generation;
use promptforge_llm::bootstrap;

use super::{flags, params};
use crate::cli::{OutputFormat, PromptArgs, SamplingArgs};

/// Execute generate command
pub async fn execute(
    config: ForgeConfig,
    query: String,
    prompt: PromptArgs,
    sampling: SamplingArgs,
    format: OutputFormat,
) -> Result<()> {
    let flags = flags(&config.generation, &prompt);
    let params = params(&config.generation, &sampling);

    let orchestrator = bootstrap(&config).await?;
    let generation = orchestrator.generate(&query, &flags, params).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&generation)?),
        OutputFormat::Text => print_text(&generation),
    }
    Ok(())
}

fn print_text(generation: &Generation) {
    match generation {
        Generation::Single(text) => println!("{}", text),
        Generation::Multiple(texts) => {
            for (i, text) in texts.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("{}", format!("[{}]", i + 1).cyan().bold());
                println!("{}", text);
            }
        }
    }
}
