use anyhow::Result;
use colored::Colorize;
use promptforge_config::ForgeConfig;
use promptforge_core::Prompt;
use promptforge_llm::bootstrap;

use super::flags;
use crate::cli::{OutputFormat, PromptArgs};

/// Execute prompt command
pub async fn execute(
    config: ForgeConfig,
    query: String,
    prompt: PromptArgs,
    format: OutputFormat,
) -> Result<()> {
    let flags = flags(&config.generation, &prompt);
    let orchestrator = bootstrap(&config).await?;
    let payload = orchestrator.assemble(&query, &flags).await?;

    match (format, payload) {
        (OutputFormat::Json, payload) => println!("{}", serde_json::to_string(&payload)?),
        (OutputFormat::Text, Prompt::Text(text)) => println!("{}", text),
        (OutputFormat::Text, Prompt::Messages(messages)) => {
            for message in messages {
                println!("{}", format!("[{}]", message.role.as_str()).cyan().bold());
                println!("{}\n", message.content);
            }
        }
    }
    Ok(())
}
