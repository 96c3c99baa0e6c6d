//! Literal prompt formats

/// System prompt used when no optimized prompt is requested or available
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant";

/// Marker closing the user turn; tells the model to continue the answer
pub const ANSWER_START_MARKER: &str = "<START>";

/// One few-shot block appended to the system prompt
pub fn format_example_block(query: &str, answer: &str) -> String {
    format!("\n\n#Query:\n{}\n\n#Answer:\n{}", query, answer)
}

/// The user turn sent for every query
pub fn format_user_prompt(query: &str) -> String {
    format!("# Query:\n{}\n\n# Answer:\n{}", query, ANSWER_START_MARKER)
}

/// Base prompt followed by one block per example, in the given order
pub fn compose_system_prompt<'a, I>(base: &str, examples: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut prompt = base.to_string();
    for (query, answer) in examples {
        prompt.push_str(&format_example_block(query, answer));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_block_literal() {
        assert_eq!(
            format_example_block("q", "a"),
            "\n\n#Query:\nq\n\n#Answer:\na"
        );
    }

    #[test]
    fn test_user_prompt_literal() {
        assert_eq!(
            format_user_prompt("What is Rust?"),
            "# Query:\nWhat is Rust?\n\n# Answer:\n<START>"
        );
    }

    #[test]
    fn test_compose_keeps_order() {
        let prompt = compose_system_prompt("base", [("q1", "a1"), ("q2", "a2")]);
        assert_eq!(
            prompt,
            "base\n\n#Query:\nq1\n\n#Answer:\na1\n\n#Query:\nq2\n\n#Answer:\na2"
        );
    }

    #[test]
    fn test_compose_without_examples_is_base() {
        let none: [(&str, &str); 0] = [];
        assert_eq!(compose_system_prompt(DEFAULT_SYSTEM_PROMPT, none), DEFAULT_SYSTEM_PROMPT);
    }
}
