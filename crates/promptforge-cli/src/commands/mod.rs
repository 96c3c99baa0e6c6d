//! Subcommand implementations

pub mod config;
pub mod generate;
pub mod prompt;
pub mod retrieve;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use promptforge_config::{BackendKind, ConfigLoader, ForgeConfig, GenerationDefaults};
use promptforge_core::{GenerationFlags, SamplingParams};
use promptforge_llm::{flags_from, params_from};
use tracing::debug;

use crate::cli::{PromptArgs, SamplingArgs};

/// Load configuration, then apply `--model` / `--backend`
///
/// Validation happens in `bootstrap`, so `retrieve` and `config show` work
/// without a model configured.
pub fn load_config(
    path: Option<PathBuf>,
    model: Option<String>,
    backend: Option<String>,
) -> Result<ForgeConfig> {
    let mut config = ConfigLoader::load(path).context("Failed to load configuration")?;

    if let Some(model) = model {
        config.model.name = model;
    }
    if let Some(backend) = backend {
        config.model.backend = BackendKind::parse(&backend)
            .ok_or_else(|| anyhow!("Unknown backend '{}'. Valid options: openai, local", backend))?;
    }

    debug!(model = %config.model.name, backend = ?config.model.backend, "Configuration loaded");
    Ok(config)
}

/// Flags from config defaults with command-line switches applied
pub fn flags(defaults: &GenerationDefaults, args: &PromptArgs) -> GenerationFlags {
    let mut flags = flags_from(defaults);
    if args.no_optimized_prompt {
        flags.optimized_prompt = false;
    }
    if args.no_icl {
        flags.optimized_icl = false;
    }
    if let Some(k) = args.num_examples {
        flags.num_optimized_icl = k;
    }
    flags
}

/// Sampling parameters from config defaults with command-line values applied
pub fn params(defaults: &GenerationDefaults, args: &SamplingArgs) -> SamplingParams {
    let mut params = params_from(defaults);
    if let Some(temperature) = args.temperature {
        params.temperature = temperature;
    }
    if let Some(top_p) = args.top_p {
        params.top_p = top_p;
    }
    if let Some(max_new_tokens) = args.max_new_tokens {
        params.max_new_tokens = max_new_tokens;
    }
    if !args.stop.is_empty() {
        params.stop = args.stop.clone();
    }
    params.num_return_sequences = args.num_return_sequences;
    params.json_output = args.json_output;
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switches_override_defaults() {
        let defaults = GenerationDefaults::default();
        let args = PromptArgs {
            no_optimized_prompt: true,
            no_icl: false,
            num_examples: Some(7),
        };

        let flags = flags(&defaults, &args);
        assert!(!flags.optimized_prompt);
        assert!(flags.optimized_icl);
        assert_eq!(flags.num_optimized_icl, 7);
    }

    #[test]
    fn test_unset_sampling_args_keep_defaults() {
        let defaults = GenerationDefaults {
            temperature: 0.2,
            stop: vec!["END".into()],
            ..Default::default()
        };
        let args = SamplingArgs {
            num_return_sequences: 2,
            ..Default::default()
        };

        let params = params(&defaults, &args);
        assert!((params.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(params.stop, vec!["END".to_string()]);
        assert_eq!(params.num_return_sequences, 2);
    }
}
