use crate::app::App;
use crate::event_handler::{EventHandler, KeyAction};

/// Route a terminal event through the key handlers and carry out the action
pub async fn handle_event(app: &mut App, event: crossterm::event::Event) {
    let Some(action) = EventHandler::handle_event(&event, app.state_mut()) else {
        return;
    };
    tracing::trace!(?action, "key action");

    match action {
        KeyAction::Quit => app.quit(),
        KeyAction::OpenView { view } => app.open_view(view),
        KeyAction::AskAi { dispatch } => app.ask_ai(dispatch),
        KeyAction::Connect => app.connect_wallet(),
        KeyAction::Disconnect => app.disconnect_wallet(),
        KeyAction::RefreshConversations => app.refresh_conversations(),
        KeyAction::SelectConversation { conversation } => app.select_conversation(conversation),
        KeyAction::CreateDm { address } => app.create_dm(address),
        KeyAction::SendMessage { conversation_id, dispatch } => app.send_message(conversation_id, dispatch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crate::state::ViewMode;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use duet_providers::MockResponse;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_welcome_to_ai_and_ask() {
        let mut app = test_app(vec![MockResponse::text("42")]);
        handle_event(&mut app, press(KeyCode::Enter)).await;
        assert_eq!(app.state().view, ViewMode::AiChat);

        for c in "meaning?".chars() {
            handle_event(&mut app, press(KeyCode::Char(c))).await;
        }
        handle_event(&mut app, press(KeyCode::Enter)).await;
        assert!(app.state().ai.transcript.is_pending());

        let event = app.next_app_event().await.unwrap();
        app.handle_app_event(event);
        assert_eq!(app.state().ai.transcript.last().unwrap().content, "42");
    }

    #[tokio::test]
    async fn test_escape_home_tears_down_messaging() {
        let mut app = test_app(Vec::new()).with_view(ViewMode::XmtpChat);
        handle_event(&mut app, press(KeyCode::Enter)).await;
        assert!(app.state().xmtp.as_ref().unwrap().session.state().is_connecting());

        handle_event(&mut app, press(KeyCode::Esc)).await;
        assert_eq!(app.state().view, ViewMode::Welcome);
        assert!(app.state().xmtp.is_none());

        let event = app.next_app_event().await.unwrap();
        app.handle_app_event(event);
        assert!(app.state().xmtp.is_none());
    }

    #[tokio::test]
    async fn test_quit() {
        let mut app = test_app(Vec::new());
        handle_event(&mut app, press(KeyCode::Char('q'))).await;
        assert!(app.should_exit());
    }
}
