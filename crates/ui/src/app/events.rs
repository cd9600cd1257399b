use crate::app::App;
use crate::state::DM_CREATION_ERROR;

use duet_core::{Reply, Ticket};
use duet_messaging::{ConnectOutcome, Conversation, Message, MessageStream, MessagingError, Subscription};

/// Completion of work spawned off the event loop
pub enum AppEvent {
    /// The answer service replied or failed
    AnswerFinished { ticket: Ticket, reply: Reply },
    /// A wallet connect attempt finished
    Connected(ConnectOutcome),
    /// Conversation list fetched after connect or refresh
    ConversationsLoaded(Result<Vec<Conversation>, MessagingError>),
    /// Direct conversation found or created
    DmCreated(Result<Conversation, MessagingError>),
    /// History and live stream for a selected conversation
    MessagesLoaded { generation: u64, result: Result<(Vec<Message>, MessageStream), MessagingError> },
    /// Item from a conversation subscription
    MessageArrived { generation: u64, message: Result<Message, MessagingError> },
    /// A message send finished
    SendFinished { ticket: Ticket, result: Result<Message, MessagingError> },
}

impl std::fmt::Debug for AppEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppEvent::AnswerFinished { ticket, reply } => {
                f.debug_struct("AnswerFinished").field("ticket", ticket).field("reply", reply).finish()
            }
            AppEvent::Connected(outcome) => f.debug_tuple("Connected").field(outcome).finish(),
            AppEvent::ConversationsLoaded(result) => {
                f.debug_tuple("ConversationsLoaded").field(&result.as_ref().map(Vec::len)).finish()
            }
            AppEvent::DmCreated(result) => f.debug_tuple("DmCreated").field(result).finish(),
            AppEvent::MessagesLoaded { generation, result } => f
                .debug_struct("MessagesLoaded")
                .field("generation", generation)
                .field("ok", &result.is_ok())
                .finish(),
            AppEvent::MessageArrived { generation, message } => f
                .debug_struct("MessageArrived")
                .field("generation", generation)
                .field("ok", &message.is_ok())
                .finish(),
            AppEvent::SendFinished { ticket, result } => f
                .debug_struct("SendFinished")
                .field("ticket", ticket)
                .field("ok", &result.is_ok())
                .finish(),
        }
    }
}

impl App {
    /// Apply a collaborator result to the state
    ///
    /// Results for surfaces that have since been torn down or switched away
    /// from are dropped.
    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::AnswerFinished { ticket, reply } => {
                if !self.state.ai.transcript.complete(ticket, reply) {
                    tracing::debug!("answer arrived after the surface was remounted");
                }
            }
            AppEvent::Connected(outcome) => {
                let Some(xmtp) = self.state.xmtp.as_mut() else {
                    return;
                };
                if xmtp.session.finish_connect(outcome) && xmtp.is_connected() {
                    tracing::info!("wallet connected");
                    self.refresh_conversations();
                }
            }
            AppEvent::ConversationsLoaded(result) => {
                let Some(xmtp) = self.state.xmtp.as_mut().filter(|x| x.is_connected()) else {
                    return;
                };
                match result {
                    Ok(conversations) => {
                        tracing::debug!(count = conversations.len(), "conversations loaded");
                        xmtp.set_conversations(conversations);
                    }
                    Err(e) => {
                        tracing::warn!("failed to load conversations: {}", e);
                        xmtp.loading_conversations = false;
                    }
                }
            }
            AppEvent::DmCreated(result) => {
                let Some(xmtp) = self.state.xmtp.as_mut().filter(|x| x.is_connected()) else {
                    return;
                };
                match result {
                    Ok(conversation) => {
                        xmtp.peer_input.clear();
                        xmtp.dm_error = None;
                        xmtp.upsert_conversation(conversation.clone());
                        self.select_conversation(conversation);
                    }
                    Err(e) => {
                        tracing::warn!("failed to create DM: {}", e);
                        xmtp.dm_error = Some(DM_CREATION_ERROR.to_string());
                    }
                }
            }
            AppEvent::MessagesLoaded { generation, result } => self.apply_messages_loaded(generation, result),
            AppEvent::MessageArrived { generation, message } => {
                let Some(xmtp) = self.state.xmtp.as_mut() else {
                    return;
                };
                match message {
                    Ok(message) => {
                        xmtp.ingest_message(generation, message);
                    }
                    Err(e) => tracing::warn!("message stream error: {}", e),
                }
            }
            AppEvent::SendFinished { ticket, result } => {
                let Some(xmtp) = self.state.xmtp.as_mut() else {
                    return;
                };
                let reply = match result {
                    Ok(message) => Reply::Acknowledged { remote_id: message.id.0 },
                    Err(e) => {
                        tracing::warn!("failed to send message: {}", e);
                        Reply::SendFailed { message: format!("Failed to send message: {}", e) }
                    }
                };
                xmtp.transcript.complete(ticket, reply);
            }
        }
    }

    fn apply_messages_loaded(
        &mut self, generation: u64, result: Result<(Vec<Message>, MessageStream), MessagingError>,
    ) {
        let Some(xmtp) = self.state.xmtp.as_mut() else {
            return;
        };
        match result {
            Ok((history, stream)) => {
                if !xmtp.apply_history(generation, history) {
                    tracing::debug!(generation, "discarding history for a deselected conversation");
                    return;
                }
                let tx = self.event_tx.clone();
                let subscription = Subscription::spawn(stream, move |message| {
                    let _ = tx.send(AppEvent::MessageArrived { generation, message });
                });
                xmtp.attach_subscription(generation, subscription);
            }
            Err(e) => {
                tracing::warn!("failed to load messages: {}", e);
                xmtp.history_failed(generation);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crate::state::ViewMode;
    use chrono::Local;
    use duet_messaging::{ConversationId, ConversationKind, InboxId, MessageId};

    fn group(id: &str) -> Conversation {
        Conversation {
            id: ConversationId::new(id),
            kind: ConversationKind::Group { name: None },
            created_at: Local::now(),
        }
    }

    fn message(id: &str, conversation: &str) -> Message {
        Message {
            id: MessageId::new(id),
            conversation_id: ConversationId::new(conversation),
            sender_inbox_id: InboxId::new("inbox-peer"),
            content: format!("content {}", id),
            sent_at: Local::now(),
        }
    }

    #[tokio::test]
    async fn test_stale_answer_dropped_after_remount() {
        let mut app = test_app(Vec::new()).with_view(ViewMode::AiChat);
        let dispatch = app.state_mut().ai.transcript.submit("hello").unwrap();

        app.open_view(ViewMode::XmtpChat);
        app.open_view(ViewMode::AiChat);

        app.handle_app_event(AppEvent::AnswerFinished {
            ticket: dispatch.ticket,
            reply: Reply::Answer { content: "late".into(), citations: Vec::new() },
        });
        assert!(app.state().ai.transcript.is_empty());
    }

    #[tokio::test]
    async fn test_conversations_ignored_when_disconnected() {
        let mut app = test_app(Vec::new()).with_view(ViewMode::XmtpChat);
        app.handle_app_event(AppEvent::ConversationsLoaded(Ok(vec![group("a")])));
        assert!(app.state().xmtp.as_ref().unwrap().conversations.is_empty());
    }

    #[tokio::test]
    async fn test_dm_failure_sets_inline_error() {
        let mut app = test_app(Vec::new()).with_view(ViewMode::XmtpChat);
        let xmtp = app.state_mut().xmtp.as_mut().unwrap();
        let connect = xmtp.session.begin_connect().unwrap();
        xmtp.session.finish_connect(connect.await);

        app.handle_app_event(AppEvent::DmCreated(Err(MessagingError::PeerNotReachable("0x1".into()))));
        assert_eq!(app.state().xmtp.as_ref().unwrap().dm_error.as_deref(), Some(DM_CREATION_ERROR));
    }

    #[tokio::test]
    async fn test_stale_history_does_not_subscribe() {
        let mut app = test_app(Vec::new()).with_view(ViewMode::XmtpChat);
        let xmtp = app.state_mut().xmtp.as_mut().unwrap();
        let connect = xmtp.session.begin_connect().unwrap();
        xmtp.session.finish_connect(connect.await);
        let stale = xmtp.begin_selection(group("one"));
        xmtp.begin_selection(group("two"));

        let stream: MessageStream = Box::pin(futures::stream::pending::<duet_messaging::Result<Message>>());
        app.handle_app_event(AppEvent::MessagesLoaded { generation: stale, result: Ok((vec![message("m1", "one")], stream)) });

        let xmtp = app.state().xmtp.as_ref().unwrap();
        assert!(xmtp.transcript.is_empty());
        assert!(!xmtp.has_subscription());
        assert!(xmtp.loading_messages);
    }

    #[tokio::test]
    async fn test_history_then_stream_events() {
        let mut app = test_app(Vec::new()).with_view(ViewMode::XmtpChat);
        let xmtp = app.state_mut().xmtp.as_mut().unwrap();
        let connect = xmtp.session.begin_connect().unwrap();
        xmtp.session.finish_connect(connect.await);
        let generation = xmtp.begin_selection(group("one"));

        let stream: MessageStream = Box::pin(futures::stream::pending::<duet_messaging::Result<Message>>());
        app.handle_app_event(AppEvent::MessagesLoaded { generation, result: Ok((vec![message("m1", "one")], stream)) });
        assert!(app.state().xmtp.as_ref().unwrap().has_subscription());

        app.handle_app_event(AppEvent::MessageArrived { generation, message: Ok(message("m1", "one")) });
        app.handle_app_event(AppEvent::MessageArrived { generation, message: Ok(message("m2", "one")) });
        let xmtp = app.state().xmtp.as_ref().unwrap();
        assert_eq!(xmtp.transcript.len(), 2);
        assert!(!xmtp.loading_messages);
    }
}
