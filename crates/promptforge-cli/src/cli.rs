use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON on a single line
    Json,
}

#[derive(Parser)]
#[command(name = "pforge")]
#[command(about = "pforge - prompt orchestration with retrieved few-shot examples")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// Defaults to 'warn'
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/promptforge/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Model identifier (overrides config file)
    #[arg(short = 'm', long, global = true)]
    pub model: Option<String>,

    /// Backend to use: openai or local (overrides config file)
    #[arg(short = 'b', long, global = true)]
    pub backend: Option<String>,
}

impl Cli {
    /// Effective log level: --log-level, then --verbose, then warn
    pub fn level_filter(&self) -> LevelFilter {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.into(),
            (None, true) => LevelFilter::DEBUG,
            (None, false) => LevelFilter::WARN,
        }
    }
}

/// How the system prompt is built; unset values come from `[generation]`
#[derive(Debug, Clone, Default, Args)]
pub struct PromptArgs {
    /// Use the default system prompt instead of the model's optimized one
    #[arg(long)]
    pub no_optimized_prompt: bool,

    /// Do not append retrieved few-shot examples
    #[arg(long)]
    pub no_icl: bool,

    /// Number of few-shot examples to retrieve
    #[arg(short = 'k', long)]
    pub num_examples: Option<usize>,
}

/// Sampling overrides; unset values come from `[generation]`
#[derive(Debug, Clone, Default, Args)]
pub struct SamplingArgs {
    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Nucleus sampling mass
    #[arg(long)]
    pub top_p: Option<f32>,

    /// Maximum number of new tokens
    #[arg(long)]
    pub max_new_tokens: Option<u32>,

    /// Stop sequence (can be repeated)
    #[arg(long)]
    pub stop: Vec<String>,

    /// Number of completions to return
    #[arg(short = 'n', long, default_value = "1")]
    pub num_return_sequences: u32,

    /// Ask the backend for a JSON object
    #[arg(long = "json")]
    pub json_output: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a response for a query
    Generate {
        /// The query
        query: String,

        #[command(flatten)]
        prompt: PromptArgs,

        #[command(flatten)]
        sampling: SamplingArgs,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the examples closest to a query
    Retrieve {
        /// The query
        query: String,

        /// Number of examples to show
        #[arg(short = 'k', long, default_value = "3")]
        k: usize,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the payload `generate` would send, without calling the backend
    Prompt {
        /// The query
        query: String,

        #[command(flatten)]
        prompt: PromptArgs,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Output format (toml, json, yaml)
        #[arg(short = 'f', long, default_value = "toml")]
        format: String,
    },
}
