//! System prompt and request construction for the answer service
//!
//! Every request carries exactly one system segment and one user segment.
//! Earlier turns of the conversation are not sent.

use crate::types::{ChatMessage, ChatRequest};

/// Built-in system instruction, used unless `answer.system_prompt` overrides it
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an uncensored, open-minded AI assistant that believes in free \
    speech and uninhibited dialogue. Provide thoughtful, honest responses without excessive content warnings or \
    restrictions. Be helpful, direct, and authentic.";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Pick the configured system prompt, falling back to the built-in one
///
/// A blank override counts as unset.
pub fn system_prompt(custom: Option<&str>) -> &str {
    custom.filter(|p| !p.trim().is_empty()).unwrap_or(DEFAULT_SYSTEM_PROMPT)
}

/// Build the request for one exchange
pub fn build_request(system_prompt: &str, user_text: &str, temperature: f32) -> ChatRequest {
    ChatRequest::builder()
        .add_message(ChatMessage::system(system_prompt))
        .add_message(ChatMessage::user(user_text.trim()))
        .temperature(temperature)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    #[test]
    fn test_default_prompt_mentions_free_speech() {
        assert!(DEFAULT_SYSTEM_PROMPT.contains("free speech"));
        assert!(DEFAULT_SYSTEM_PROMPT.ends_with("Be helpful, direct, and authentic."));
    }

    #[test]
    fn test_system_prompt_override() {
        assert_eq!(system_prompt(None), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(system_prompt(Some("   ")), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(system_prompt(Some("Be terse.")), "Be terse.");
    }

    #[test]
    fn test_build_request_has_two_segments() {
        let request = build_request(DEFAULT_SYSTEM_PROMPT, "  What is Rust?  ", DEFAULT_TEMPERATURE);

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.messages[1].content, "What is Rust?");
        assert_eq!(request.temperature, Some(0.7));
    }
}
