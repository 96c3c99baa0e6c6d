//! # promptforge configuration
//!
//! Typed configuration for the orchestrator: which model and backend to use,
//! where the example set and prompt registry live, how to reach the embedding
//! service, and the per-call defaults.
//!
//! ```rust,no_run
//! use promptforge_config::ConfigLoader;
//!
//! let config = ConfigLoader::load_from_file("promptforge.toml")?;
//! println!("model: {}", config.model.name);
//! # Ok::<(), promptforge_config::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod components;
mod config;
mod loader;

pub use components::*;
pub use config::*;
pub use loader::*;
