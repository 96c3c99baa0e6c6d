//! Test doubles for the core traits

pub mod mocks;

pub use mocks::{MockBackend, MockEmbeddingProvider};
