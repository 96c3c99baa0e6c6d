//! Jinja chat templates for models served as raw completion endpoints

use std::path::Path;

use minijinja::{context, Environment, Error, ErrorKind, Value};
use promptforge_core::{ChatMessage, LlmError, LlmResult};

const TEMPLATE_NAME: &str = "chat";

/// A model's chat template
///
/// Rendered with the same variables tokenizer chat templates expect:
/// `messages`, `add_generation_prompt`, `bos_token` and `eos_token`.
#[derive(Debug)]
pub struct ChatTemplate {
    env: Environment<'static>,
    bos_token: String,
    eos_token: String,
}

impl ChatTemplate {
    /// Compile a template from source
    pub fn new(
        source: impl Into<String>,
        bos_token: impl Into<String>,
        eos_token: impl Into<String>,
    ) -> LlmResult<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_function("raise_exception", raise_exception);
        env.add_template_owned(TEMPLATE_NAME, source.into())
            .map_err(|e| LlmError::ConfigError(format!("Invalid chat template: {}", e)))?;

        Ok(Self {
            env,
            bos_token: bos_token.into(),
            eos_token: eos_token.into(),
        })
    }

    /// Load a template file
    pub fn from_file(
        path: &Path,
        bos_token: impl Into<String>,
        eos_token: impl Into<String>,
    ) -> LlmResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            LlmError::ConfigError(format!(
                "Failed to read chat template {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::new(source, bos_token, eos_token)
    }

    /// Render a conversation, ending with the assistant generation prompt
    pub fn render(&self, messages: &[ChatMessage]) -> LlmResult<String> {
        let template = self
            .env
            .get_template(TEMPLATE_NAME)
            .map_err(|e| LlmError::ConfigError(e.to_string()))?;

        template
            .render(context! {
                messages => Value::from_serialize(messages),
                add_generation_prompt => true,
                bos_token => &self.bos_token,
                eos_token => &self.eos_token,
            })
            .map_err(|e| LlmError::InvalidArgument(format!("Chat template failed: {}", e)))
    }
}

fn raise_exception(message: String) -> Result<String, Error> {
    Err(Error::new(ErrorKind::InvalidOperation, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHATML: &str = "{% for message in messages %}\
<|im_start|>{{ message.role }}\n{{ message.content }}<|im_end|>\n\
{% endfor %}\
{% if add_generation_prompt %}<|im_start|>assistant\n{% endif %}";

    #[test]
    fn test_render_chatml() {
        let template = ChatTemplate::new(CHATML, "", "").unwrap();
        let rendered = template
            .render(&ChatMessage::conversation(Some("Be brief"), "Hi"))
            .unwrap();

        assert_eq!(
            rendered,
            "<|im_start|>system\nBe brief<|im_end|>\n<|im_start|>user\nHi<|im_end|>\n<|im_start|>assistant\n"
        );
    }

    #[test]
    fn test_render_few_shot_turns() {
        let template = ChatTemplate::new(CHATML, "", "").unwrap();
        let rendered = template
            .render(&[
                ChatMessage::user("2 + 2?"),
                ChatMessage::assistant("4"),
                ChatMessage::user("3 + 3?"),
            ])
            .unwrap();

        assert_eq!(
            rendered,
            "<|im_start|>user\n2 + 2?<|im_end|>\n<|im_start|>assistant\n4<|im_end|>\n\
<|im_start|>user\n3 + 3?<|im_end|>\n<|im_start|>assistant\n"
        );
    }

    #[test]
    fn test_special_tokens_available() {
        let template =
            ChatTemplate::new("{{ bos_token }}{{ messages[0].content }}", "<s>", "</s>").unwrap();
        assert_eq!(template.render(&[ChatMessage::user("x")]).unwrap(), "<s>x");
    }

    #[test]
    fn test_raise_exception_surfaces_as_error() {
        let template = ChatTemplate::new(
            "{% if messages[0].role != 'user' %}{{ raise_exception('user first') }}{% endif %}",
            "",
            "",
        )
        .unwrap();

        let err = template
            .render(&[ChatMessage::system("s")])
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("user first"));
    }

    #[test]
    fn test_invalid_template_is_config_error() {
        let err = ChatTemplate::new("{% for %}", "", "").unwrap_err();
        assert!(err.is_config_error());
    }
}
