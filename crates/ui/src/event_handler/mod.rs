mod ai_mode;
mod key_action;
mod welcome_mode;
mod xmtp_mode;

pub use key_action::KeyAction;

use crate::state::{AppState, ViewMode};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use duet_core::Composer;

use self::{ai_mode::handle_ai_key, welcome_mode::handle_welcome_key, xmtp_mode::handle_xmtp_key};

/// Lines moved per PageUp/PageDown
const PAGE: usize = 5;

/// Event handler for the TUI application
pub struct EventHandler;

impl EventHandler {
    /// Read a single event from the terminal
    ///
    /// Returns `Some(event)` if an event is available, `None` on timeout or error.
    pub fn read() -> Option<Event> {
        match crossterm::event::poll(std::time::Duration::from_millis(100)) {
            Ok(true) => match crossterm::event::read() {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::warn!("terminal read error: {}", e);
                    None
                }
            },
            Ok(false) => None,
            Err(e) => {
                tracing::warn!("event poll error: {}", e);
                None
            }
        }
    }

    /// Handle a keyboard event, returning the action the app must carry out
    pub fn handle_key_event(event: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
        if event.kind != KeyEventKind::Press {
            return None;
        }

        if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
            return Some(KeyAction::Quit);
        }

        match state.view {
            ViewMode::Welcome => handle_welcome_key(event, state),
            ViewMode::AiChat | ViewMode::XmtpChat => {
                if let Some(action) = handle_shell_key(event, state) {
                    return action;
                }
                match state.view {
                    ViewMode::AiChat => handle_ai_key(event, state),
                    _ => handle_xmtp_key(event, state),
                }
            }
        }
    }

    pub fn handle_event(event: &Event, state: &mut AppState) -> Option<KeyAction> {
        match event {
            Event::Key(key_event) => Self::handle_key_event(*key_event, state),
            _ => None,
        }
    }
}

/// Keys shared by both chat views: tabs, home, scrolling.
///
/// Returns `Some(action)` when the key was consumed.
fn handle_shell_key(event: KeyEvent, state: &mut AppState) -> Option<Option<KeyAction>> {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    match event.code {
        KeyCode::Esc => Some(Some(KeyAction::OpenView { view: ViewMode::Welcome })),
        KeyCode::F(1) => Some(Some(KeyAction::OpenView { view: ViewMode::AiChat })),
        KeyCode::F(2) => Some(Some(KeyAction::OpenView { view: ViewMode::XmtpChat })),
        KeyCode::Char('t') if ctrl => Some(Some(KeyAction::OpenView { view: state.view.toggled() })),
        KeyCode::PageUp => {
            if let Some(scroll) = active_scroll(state) {
                scroll.scroll_up(PAGE);
            }
            Some(None)
        }
        KeyCode::PageDown => {
            if let Some(scroll) = active_scroll(state) {
                scroll.scroll_down(PAGE);
            }
            Some(None)
        }
        _ => None,
    }
}

fn active_scroll(state: &mut AppState) -> Option<&mut crate::state::ScrollState> {
    match state.view {
        ViewMode::AiChat => Some(&mut state.ai.scroll),
        ViewMode::XmtpChat => state.xmtp.as_mut().map(|x| &mut x.scroll),
        ViewMode::Welcome => None,
    }
}

/// Apply a line-editing key to `composer`; returns whether it was consumed
pub(crate) fn edit_composer(event: KeyEvent, composer: &mut Composer) -> bool {
    let has_ctrl_or_alt =
        event.modifiers.contains(KeyModifiers::CONTROL) || event.modifiers.contains(KeyModifiers::ALT);

    match event.code {
        KeyCode::Backspace => composer.backspace(),
        KeyCode::Delete => composer.delete(),
        KeyCode::Left => composer.move_left(),
        KeyCode::Right => composer.move_right(),
        KeyCode::Home => composer.move_home(),
        KeyCode::End => composer.move_end(),
        KeyCode::Char(c) if !has_ctrl_or_alt => composer.insert_char(c),
        _ => return false,
    }
    true
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use duet_messaging::loopback::{LoopbackClientBuilder, LoopbackNetwork, LoopbackWallet};
    use std::sync::Arc;

    pub(crate) fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub(crate) fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub(crate) fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            EventHandler::handle_key_event(key(KeyCode::Char(c)), state);
        }
    }

    pub(crate) fn test_state() -> AppState {
        AppState::new(
            Arc::new(LoopbackWallet::fixed("0xa11ce00000000000000000000000000000000001")),
            Arc::new(LoopbackClientBuilder::new(LoopbackNetwork::new(true))),
        )
    }

    #[test]
    fn test_release_events_ignored() {
        let mut state = test_state();
        let mut event = key(KeyCode::Char('q'));
        event.kind = KeyEventKind::Release;
        event.state = KeyEventState::NONE;
        assert_eq!(EventHandler::handle_key_event(event, &mut state), None);
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let mut state = test_state();
        assert_eq!(EventHandler::handle_key_event(ctrl('c'), &mut state), Some(KeyAction::Quit));

        state.switch_view(ViewMode::AiChat);
        assert_eq!(EventHandler::handle_key_event(ctrl('c'), &mut state), Some(KeyAction::Quit));
    }

    #[test]
    fn test_shell_navigation() {
        let mut state = test_state();
        state.switch_view(ViewMode::AiChat);

        assert_eq!(
            EventHandler::handle_key_event(key(KeyCode::Esc), &mut state),
            Some(KeyAction::OpenView { view: ViewMode::Welcome })
        );
        assert_eq!(
            EventHandler::handle_key_event(key(KeyCode::F(2)), &mut state),
            Some(KeyAction::OpenView { view: ViewMode::XmtpChat })
        );
        assert_eq!(
            EventHandler::handle_key_event(ctrl('t'), &mut state),
            Some(KeyAction::OpenView { view: ViewMode::XmtpChat })
        );
    }

    #[test]
    fn test_page_keys_scroll_active_surface() {
        let mut state = test_state();
        state.switch_view(ViewMode::AiChat);

        assert_eq!(EventHandler::handle_key_event(key(KeyCode::PageUp), &mut state), None);
        assert_eq!(state.ai.scroll.offset(), PAGE);
        EventHandler::handle_key_event(key(KeyCode::PageDown), &mut state);
        assert!(state.ai.scroll.is_at_bottom());
    }

    #[test]
    fn test_edit_composer() {
        let mut composer = Composer::new();
        assert!(edit_composer(key(KeyCode::Char('h')), &mut composer));
        assert!(edit_composer(key(KeyCode::Char('i')), &mut composer));
        assert!(edit_composer(key(KeyCode::Left), &mut composer));
        assert!(edit_composer(key(KeyCode::Delete), &mut composer));
        assert_eq!(composer.text(), "h");
        assert!(!edit_composer(ctrl('x'), &mut composer));
        assert!(!edit_composer(key(KeyCode::Enter), &mut composer));
    }
}
