//! Optimized-prompt registry and artifact loading
//!
//! The registry maps backend model identifiers to artifact files. Artifacts come
//! in two historical shapes:
//!
//! ```json
//! {"terminal_node": {"state": [{"system_prompt": "..."}, {"system_prompt": "..."}]}}
//! ```
//!
//! where the last state's `system_prompt` wins, or simply a JSON string holding
//! the prompt. The structured shape is tried first; only a shape mismatch falls
//! through to the plain string.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{LlmError, LlmResult};
use crate::prompts::DEFAULT_SYSTEM_PROMPT;

/// Model identifier → artifact path
#[derive(Debug, Clone, Default)]
pub struct ModelPromptRegistry {
    entries: IndexMap<String, PathBuf>,
    base_dir: Option<PathBuf>,
}

impl ModelPromptRegistry {
    /// Build a registry from (model, path) pairs
    pub fn from_entries<I, M, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (M, P)>,
        M: Into<String>,
        P: Into<PathBuf>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(m, p)| (m.into(), p.into()))
                .collect(),
            base_dir: None,
        }
    }

    /// Load the registry from a JSON object file
    ///
    /// Relative artifact paths resolve against the registry file's directory.
    pub fn load(path: impl AsRef<Path>) -> LlmResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LlmError::ConfigError(format!(
                "Failed to read model prompt registry {}: {}",
                path.display(),
                e
            ))
        })?;
        let entries: IndexMap<String, PathBuf> = serde_json::from_str(&content)
            .map_err(|e| LlmError::ConfigError(format!("Invalid model prompt registry: {}", e)))?;

        debug!(path = %path.display(), models = entries.len(), "Loaded model prompt registry");
        Ok(Self {
            entries,
            base_dir: path.parent().map(Path::to_path_buf),
        })
    }

    /// Artifact path registered for `model`, if any
    pub fn artifact_path(&self, model: &str) -> Option<PathBuf> {
        let path = self.entries.get(model)?;
        match &self.base_dir {
            Some(base) if path.is_relative() => Some(base.join(path)),
            _ => Some(path.clone()),
        }
    }

    /// Number of registered models
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where an optimized prompt came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptSource {
    /// Loaded from the artifact at this path
    Artifact(Option<PathBuf>),
    /// The built-in default
    Default,
}

/// The system prompt resolved for one model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizedPrompt {
    text: String,
    source: PromptSource,
}

impl OptimizedPrompt {
    /// The built-in default prompt
    pub fn default_prompt() -> Self {
        Self {
            text: DEFAULT_SYSTEM_PROMPT.to_string(),
            source: PromptSource::Default,
        }
    }

    /// A prompt supplied directly rather than read from disk
    pub fn artifact(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: PromptSource::Artifact(None),
        }
    }

    /// Resolve the prompt for `model`
    ///
    /// Unregistered models and unusable artifacts are logged and fall back to
    /// [`DEFAULT_SYSTEM_PROMPT`].
    pub fn resolve(registry: &ModelPromptRegistry, model: &str) -> Self {
        let Some(path) = registry.artifact_path(model) else {
            warn!(model, "No optimized prompt registered for model, using default");
            return Self::default_prompt();
        };

        match load_artifact(&path) {
            Ok(text) => {
                info!(model, path = %path.display(), "Loaded optimized prompt");
                Self {
                    text,
                    source: PromptSource::Artifact(Some(path)),
                }
            }
            Err(e) => {
                warn!(model, error = %e, "Unusable optimized prompt artifact, using default");
                Self::default_prompt()
            }
        }
    }

    /// Prompt text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Where the prompt came from
    pub fn source(&self) -> &PromptSource {
        &self.source
    }

    /// True when the built-in default is in use
    pub fn is_default(&self) -> bool {
        self.source == PromptSource::Default
    }
}

/// Read an artifact file and extract its system prompt
pub fn load_artifact(path: &Path) -> LlmResult<String> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        LlmError::ArtifactError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|e| {
        LlmError::ArtifactError(format!("Failed to parse {}: {}", path.display(), e))
    })?;
    extract_system_prompt(&value)
}

/// Two-step extraction of the system prompt from a parsed artifact
pub fn extract_system_prompt(artifact: &Value) -> LlmResult<String> {
    if let Some(prompt) = structured_system_prompt(artifact) {
        return Ok(prompt.to_string());
    }

    debug!("Artifact is not a search trace, reading it as a plain prompt");
    artifact.as_str().map(str::to_string).ok_or_else(|| {
        LlmError::ArtifactError(
            "Artifact is neither a search trace with a system_prompt nor a string".to_string(),
        )
    })
}

/// `terminal_node.state[-1].system_prompt`, or `None` on any shape mismatch
fn structured_system_prompt(artifact: &Value) -> Option<&str> {
    artifact
        .get("terminal_node")?
        .get("state")?
        .as_array()?
        .last()?
        .get("system_prompt")?
        .as_str()
}
