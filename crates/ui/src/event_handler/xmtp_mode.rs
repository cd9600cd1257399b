use crate::state::{AppState, XmtpFocus};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{KeyAction, edit_composer};

/// Handle keys in the decentralized messaging surface
pub fn handle_xmtp_key(event: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let xmtp = state.xmtp.as_mut()?;

    if !xmtp.is_connected() {
        return match event.code {
            KeyCode::Enter if !xmtp.session.state().is_connecting() => Some(KeyAction::Connect),
            _ => None,
        };
    }

    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('d') => Some(KeyAction::Disconnect),
            KeyCode::Char('r') if !xmtp.loading_conversations => Some(KeyAction::RefreshConversations),
            _ => None,
        };
    }

    match event.code {
        KeyCode::Tab => {
            xmtp.focus = xmtp.focus.next();
            return None;
        }
        KeyCode::BackTab => {
            xmtp.focus = xmtp.focus.prev();
            return None;
        }
        _ => {}
    }

    match xmtp.focus {
        XmtpFocus::PeerInput => {
            if event.code == KeyCode::Enter {
                let address = xmtp.peer_input.text().trim().to_string();
                if address.is_empty() {
                    return None;
                }
                xmtp.dm_error = None;
                return Some(KeyAction::CreateDm { address });
            }
            edit_composer(event, &mut xmtp.peer_input);
            None
        }
        XmtpFocus::Conversations => match event.code {
            KeyCode::Up | KeyCode::Char('k') => {
                xmtp.cursor_up();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                xmtp.cursor_down();
                None
            }
            KeyCode::Enter => {
                let conversation = xmtp.cursor_conversation()?.clone();
                Some(KeyAction::SelectConversation { conversation })
            }
            _ => None,
        },
        XmtpFocus::Compose => {
            let conversation_id = xmtp.selected_id()?.clone();
            if event.code == KeyCode::Enter {
                let dispatch = xmtp.transcript.submit_compose()?;
                xmtp.scroll.to_bottom();
                return Some(KeyAction::SendMessage { conversation_id, dispatch });
            }
            if !xmtp.transcript.is_pending() {
                edit_composer(event, xmtp.transcript.composer_mut());
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_handler::tests::{ctrl, key, test_state, type_text};
    use crate::state::ViewMode;
    use chrono::Local;
    use duet_messaging::{Conversation, ConversationId, ConversationKind};

    fn group(id: &str) -> Conversation {
        Conversation {
            id: ConversationId::new(id),
            kind: ConversationKind::Group { name: None },
            created_at: Local::now(),
        }
    }

    async fn connected_state() -> AppState {
        let mut state = test_state();
        state.switch_view(ViewMode::XmtpChat);
        let xmtp = state.xmtp.as_mut().unwrap();
        let connect = xmtp.session.begin_connect().unwrap();
        xmtp.session.finish_connect(connect.await);
        state
    }

    #[test]
    fn test_enter_connects_when_disconnected() {
        let mut state = test_state();
        state.switch_view(ViewMode::XmtpChat);
        assert_eq!(handle_xmtp_key(key(KeyCode::Enter), &mut state), Some(KeyAction::Connect));

        let _pending = state.xmtp.as_mut().unwrap().session.begin_connect();
        assert_eq!(handle_xmtp_key(key(KeyCode::Enter), &mut state), None);
    }

    #[tokio::test]
    async fn test_control_keys() {
        let mut state = connected_state().await;
        assert_eq!(handle_xmtp_key(ctrl('d'), &mut state), Some(KeyAction::Disconnect));
        assert_eq!(handle_xmtp_key(ctrl('r'), &mut state), Some(KeyAction::RefreshConversations));

        state.xmtp.as_mut().unwrap().loading_conversations = true;
        assert_eq!(handle_xmtp_key(ctrl('r'), &mut state), None);
    }

    #[tokio::test]
    async fn test_create_dm_from_peer_input() {
        let mut state = connected_state().await;
        handle_xmtp_key(key(KeyCode::Tab), &mut state);
        assert_eq!(state.xmtp.as_ref().unwrap().focus, XmtpFocus::PeerInput);

        assert_eq!(handle_xmtp_key(key(KeyCode::Enter), &mut state), None);

        state.xmtp.as_mut().unwrap().dm_error = Some("old".to_string());
        type_text(&mut state, " 0xabc ");
        assert_eq!(
            handle_xmtp_key(key(KeyCode::Enter), &mut state),
            Some(KeyAction::CreateDm { address: "0xabc".to_string() })
        );
        assert!(state.xmtp.as_ref().unwrap().dm_error.is_none());
    }

    #[tokio::test]
    async fn test_list_navigation_selects() {
        let mut state = connected_state().await;
        let xmtp = state.xmtp.as_mut().unwrap();
        xmtp.set_conversations(vec![group("a"), group("b")]);
        xmtp.focus = XmtpFocus::Conversations;

        handle_xmtp_key(key(KeyCode::Down), &mut state);
        assert_eq!(
            handle_xmtp_key(key(KeyCode::Enter), &mut state),
            Some(KeyAction::SelectConversation { conversation: group_with_time(&state, "b") })
        );
    }

    fn group_with_time(state: &AppState, id: &str) -> Conversation {
        state
            .xmtp
            .as_ref()
            .unwrap()
            .conversations
            .iter()
            .find(|c| c.id.as_str() == id)
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn test_compose_requires_selection() {
        let mut state = connected_state().await;
        type_text(&mut state, "hello");
        assert!(state.xmtp.as_ref().unwrap().transcript.composer().is_empty());

        state.xmtp.as_mut().unwrap().begin_selection(group("a"));
        type_text(&mut state, "hello");
        match handle_xmtp_key(key(KeyCode::Enter), &mut state) {
            Some(KeyAction::SendMessage { conversation_id, dispatch }) => {
                assert_eq!(conversation_id.as_str(), "a");
                assert_eq!(dispatch.text, "hello");
            }
            other => panic!("expected SendMessage, got {:?}", other),
        }
        assert!(state.xmtp.as_ref().unwrap().transcript.is_pending());
    }
}
