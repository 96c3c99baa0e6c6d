//! Generation backends
//!
//! - `openai`: hosted chat-completion API, takes chat messages directly
//! - `local`: self-hosted engine, takes a single rendered prompt string

pub mod chat_template;
pub mod launcher;
pub mod local;
pub mod openai;

pub use chat_template::ChatTemplate;
pub use launcher::EngineLauncher;
pub use local::LocalEngineBackend;
pub use openai::OpenAIChatBackend;

use serde_json::{Map, Value};

/// Copy backend-specific sampling options into a request body
///
/// Keys already set by the backend are left untouched.
pub(crate) fn merge_extra(body: &mut Value, extra: &Map<String, Value>) {
    if let Value::Object(body) = body {
        for (key, value) in extra {
            body.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
}
