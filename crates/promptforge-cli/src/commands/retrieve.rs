use anyhow::{Context, Result};
use colored::Colorize;
use promptforge_config::ForgeConfig;
use promptforge_core::{ExampleRetriever, ExampleSet};
use promptforge_llm::create_provider;
use serde_json::json;

use crate::cli::OutputFormat;

/// Execute retrieve command
///
/// Only the example set and the embedding provider are needed; no backend is
/// constructed.
pub async fn execute(config: ForgeConfig, query: String, k: usize, format: OutputFormat) -> Result<()> {
    let examples = ExampleSet::load(&config.data.examples)?;
    let embedder = create_provider(&config.embedding).context("Failed to create embedding provider")?;
    let retriever = ExampleRetriever::build(examples, embedder).await?;

    let results = retriever.top_k(&query, k).await?;

    match format {
        OutputFormat::Json => {
            let rows: Vec<_> = results
                .iter()
                .map(|r| {
                    json!({
                        "similarity": r.similarity,
                        "query": r.query,
                        "answer": retriever.examples().answer(&r.query),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string(&rows)?);
        }
        OutputFormat::Text => {
            if results.is_empty() {
                println!("{}", "No examples loaded".yellow());
            }
            for result in &results {
                println!(
                    "{} {}",
                    format!("{:.4}", result.similarity).green(),
                    result.query.bold()
                );
                if let Some(answer) = retriever.examples().answer(&result.query) {
                    println!("       {}", answer.dimmed());
                }
            }
        }
    }
    Ok(())
}
