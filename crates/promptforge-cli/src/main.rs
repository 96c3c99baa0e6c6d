use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use promptforge_cli::{
    cli::{Cli, Commands},
    commands,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays pipeable
    let env_filter = EnvFilter::builder()
        .with_default_directive(cli.level_filter().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = commands::load_config(cli.config, cli.model, cli.backend)?;

    match cli.command {
        Commands::Generate {
            query,
            prompt,
            sampling,
            format,
        } => commands::generate::execute(config, query, prompt, sampling, format).await?,

        Commands::Retrieve { query, k, format } => {
            commands::retrieve::execute(config, query, k, format).await?
        }

        Commands::Prompt {
            query,
            prompt,
            format,
        } => commands::prompt::execute(config, query, prompt, format).await?,

        Commands::Config(cmd) => commands::config::execute(config, cmd)?,
    }

    Ok(())
}
