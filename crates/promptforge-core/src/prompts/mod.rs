//! System prompt templates and prompt assembly

mod assembler;
mod templates;

pub use assembler::PromptAssembler;
pub use templates::{
    compose_system_prompt, format_example_block, format_user_prompt, ANSWER_START_MARKER,
    DEFAULT_SYSTEM_PROMPT,
};
