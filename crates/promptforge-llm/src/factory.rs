//! Wiring configuration into a ready [`Orchestrator`]

use std::sync::Arc;

use promptforge_config::{BackendKind, ForgeConfig, GenerationDefaults};
use promptforge_core::{
    ExampleSet, GenerationBackend, GenerationFlags, LlmError, LlmResult, ModelPromptRegistry,
    Orchestrator, SamplingParams,
};
use tracing::{info, warn};

use crate::backends::{LocalEngineBackend, OpenAIChatBackend};
use crate::embeddings::create_provider;

/// Construct the configured generation backend
///
/// For the hosted backend a missing API key fails here, before any request.
/// A local engine is either connected to or launched, depending on
/// `local.launch`.
pub async fn create_backend(config: &ForgeConfig) -> LlmResult<Arc<dyn GenerationBackend>> {
    let model = config.model.name.as_str();
    match config.model.backend {
        BackendKind::OpenAI => Ok(Arc::new(OpenAIChatBackend::from_env(&config.openai, model)?)),
        BackendKind::Local if config.local.launch => {
            Ok(Arc::new(LocalEngineBackend::launch(model, &config.local).await?))
        }
        BackendKind::Local => Ok(Arc::new(LocalEngineBackend::connect(model, &config.local)?)),
    }
}

/// Load data files, build the index and construct the backend
///
/// The configuration is validated first. The example set must load; a
/// missing or malformed registry file only means every model gets the
/// default system prompt.
pub async fn bootstrap(config: &ForgeConfig) -> LlmResult<Orchestrator> {
    config
        .validate()
        .map_err(|e| LlmError::ConfigError(e.to_string()))?;
    let examples = ExampleSet::load(&config.data.examples)?;

    let registry = match ModelPromptRegistry::load(&config.data.model_mapping) {
        Ok(registry) => registry,
        Err(e) => {
            warn!(
                path = %config.data.model_mapping.display(),
                error = %e,
                "Model prompt registry unusable, using the default system prompt"
            );
            ModelPromptRegistry::default()
        }
    };

    let backend = create_backend(config).await?;
    let embedder = create_provider(&config.embedding)?;
    info!(
        backend = backend.provider_name(),
        embedding_model = embedder.model_name(),
        examples = examples.len(),
        "Bootstrapping orchestrator"
    );

    Orchestrator::builder()
        .examples(examples)
        .registry(registry)
        .embedder(embedder)
        .backend(backend)
        .build()
        .await
}

/// Per-call flags from configured defaults
pub fn flags_from(defaults: &GenerationDefaults) -> GenerationFlags {
    GenerationFlags {
        optimized_prompt: defaults.optimized_prompt,
        optimized_icl: defaults.optimized_icl,
        num_optimized_icl: defaults.num_optimized_icl,
    }
}

/// Sampling parameters from configured defaults
pub fn params_from(defaults: &GenerationDefaults) -> SamplingParams {
    SamplingParams {
        temperature: defaults.temperature,
        top_p: defaults.top_p,
        max_new_tokens: defaults.max_new_tokens,
        stop: defaults.stop.clone(),
        ..Default::default()
    }
}
