use crate::state::{AppState, ViewMode};
use crossterm::event::{KeyCode, KeyEvent};

use super::KeyAction;

/// Handle keys on the welcome page: card selection and quitting
pub fn handle_welcome_key(event: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    match event.code {
        KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => {
            state.welcome.prev();
            None
        }
        KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => {
            state.welcome.next();
            None
        }
        KeyCode::Enter => Some(KeyAction::OpenView { view: state.welcome.selected() }),
        KeyCode::Char('1') => Some(KeyAction::OpenView { view: ViewMode::AiChat }),
        KeyCode::Char('2') => Some(KeyAction::OpenView { view: ViewMode::XmtpChat }),
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
        _ => None,
    }
}
