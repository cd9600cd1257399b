use crate::state::AppState;
use crossterm::event::{KeyCode, KeyEvent};

use super::{KeyAction, edit_composer};

/// Handle keys in the answer-service surface
///
/// Enter submits the compose buffer through the transcript; blank input and
/// input while an answer is pending are refused there. The compose box is
/// read-only while pending.
pub fn handle_ai_key(event: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let transcript = &mut state.ai.transcript;

    if event.code == KeyCode::Enter {
        let dispatch = transcript.submit_compose()?;
        state.ai.scroll.to_bottom();
        return Some(KeyAction::AskAi { dispatch });
    }

    if !transcript.is_pending() {
        edit_composer(event, transcript.composer_mut());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_handler::tests::{key, test_state, type_text};
    use crate::state::ViewMode;
    use duet_core::Author;

    fn ai_state() -> AppState {
        let mut state = test_state();
        state.switch_view(ViewMode::AiChat);
        state
    }

    #[test]
    fn test_enter_submits_trimmed_question() {
        let mut state = ai_state();
        type_text(&mut state, "  Hello  ");

        let action = handle_ai_key(key(KeyCode::Enter), &mut state);
        match action {
            Some(KeyAction::AskAi { dispatch }) => assert_eq!(dispatch.text, "Hello"),
            other => panic!("expected AskAi, got {:?}", other),
        }
        assert!(state.ai.transcript.is_pending());
        assert!(state.ai.transcript.composer().is_empty());
        assert_eq!(state.ai.transcript.last().unwrap().author, Author::Local);
    }

    #[test]
    fn test_blank_enter_is_noop() {
        let mut state = ai_state();
        type_text(&mut state, "   ");
        assert_eq!(handle_ai_key(key(KeyCode::Enter), &mut state), None);
        assert!(state.ai.transcript.is_empty());
        assert!(!state.ai.transcript.is_pending());
    }

    #[test]
    fn test_input_frozen_while_pending() {
        let mut state = ai_state();
        type_text(&mut state, "first");
        handle_ai_key(key(KeyCode::Enter), &mut state);

        type_text(&mut state, "second");
        assert!(state.ai.transcript.composer().is_empty());
        assert_eq!(handle_ai_key(key(KeyCode::Enter), &mut state), None);
        assert_eq!(state.ai.transcript.len(), 1);
    }
}
