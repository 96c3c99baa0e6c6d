use anyhow::{bail, Result};
use promptforge_config::ForgeConfig;

use crate::cli::ConfigCommands;

/// Execute config subcommand
pub fn execute(config: ForgeConfig, cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show { format } => show(&config, &format),
    }
}

/// Show the effective configuration (file, env and flags applied)
fn show(config: &ForgeConfig, format: &str) -> Result<()> {
    let rendered = match format {
        "json" => serde_json::to_string_pretty(config)?,
        "yaml" | "yml" => serde_yaml::to_string(config)?,
        "toml" => toml::to_string_pretty(config)?,
        other => bail!("Unsupported format '{}'. Valid options: toml, json, yaml", other),
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
