//! Loading configuration from files and the environment

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::components::BackendKind;
use crate::config::{ConfigError, ConfigResult, ForgeConfig};

/// Environment variables that override file values
pub const ENV_OVERRIDES: &[&str] = &[
    "PROMPTFORGE_MODEL",
    "PROMPTFORGE_BACKEND",
    "PROMPTFORGE_EXAMPLES",
    "PROMPTFORGE_MODEL_MAPPING",
    "PROMPTFORGE_EMBEDDING_ENDPOINT",
    "PROMPTFORGE_LOCAL_ENDPOINT",
];

/// Reads [`ForgeConfig`] from TOML, YAML or JSON
pub struct ConfigLoader;

impl ConfigLoader {
    /// Default config location: `~/.config/promptforge/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("promptforge").join("config.toml"))
    }

    /// Load a config file, picking the format from its extension
    pub fn load_from_file(path: impl AsRef<Path>) -> ConfigResult<ForgeConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("toml")
            .to_lowercase();

        let config = Self::parse(&content, &extension, &path.display().to_string())?;
        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Parse config text in the given format
    pub fn parse(content: &str, format: &str, origin: &str) -> ConfigResult<ForgeConfig> {
        let parse_err = |message: String| ConfigError::Parse {
            path: origin.to_string(),
            message,
        };

        match format {
            #[cfg(feature = "toml")]
            "toml" => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string())),
            "json" => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Load configuration the way the CLI does
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// when present and built-in defaults otherwise. Environment overrides are
    /// applied last. The result is not validated; callers that construct a
    /// backend call [`ForgeConfig::validate`] themselves.
    pub fn load(path: Option<PathBuf>) -> ConfigResult<ForgeConfig> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::load_from_file(path)?,
                None => {
                    info!("No config file found, using defaults");
                    ForgeConfig::default()
                }
            },
        };

        Self::apply_overrides(&mut config, |key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `PROMPTFORGE_*` overrides using `lookup` to read variables
    pub fn apply_overrides<F>(config: &mut ForgeConfig, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("PROMPTFORGE_MODEL") {
            config.model.name = model;
        }
        if let Some(backend) = lookup("PROMPTFORGE_BACKEND") {
            config.model.backend = BackendKind::parse(&backend).ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "Unknown backend '{}'. Valid options: openai, local",
                    backend
                ))
            })?;
        }
        if let Some(path) = lookup("PROMPTFORGE_EXAMPLES") {
            config.data.examples = PathBuf::from(path);
        }
        if let Some(path) = lookup("PROMPTFORGE_MODEL_MAPPING") {
            config.data.model_mapping = PathBuf::from(path);
        }
        if let Some(endpoint) = lookup("PROMPTFORGE_EMBEDDING_ENDPOINT") {
            config.embedding.endpoint = endpoint;
        }
        if let Some(endpoint) = lookup("PROMPTFORGE_LOCAL_ENDPOINT") {
            config.local.endpoint = endpoint;
        }
        Ok(())
    }
}
