//! Backends and embedding providers for promptforge
//!
//! Implements the `promptforge-core` traits against real services:
//!
//! - [`backends::OpenAIChatBackend`]: hosted chat-completion API
//! - [`backends::LocalEngineBackend`]: self-hosted engine, optionally launched
//!   as a child process
//! - [`embeddings`]: OpenAI-compatible and Ollama embedding services
//!
//! [`bootstrap`] turns a [`promptforge_config::ForgeConfig`] into a ready
//! [`promptforge_core::Orchestrator`].

#![warn(missing_docs)]

pub mod backends;
pub mod embeddings;
pub mod factory;

pub use backends::{ChatTemplate, EngineLauncher, LocalEngineBackend, OpenAIChatBackend};
pub use embeddings::{create_provider, OllamaEmbeddings, OpenAIEmbeddings};
pub use factory::{bootstrap, create_backend, flags_from, params_from};
