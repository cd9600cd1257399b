use crate::app::{App, AppEvent};

use duet_core::Dispatch;
use duet_messaging::{
    Conversation, ConversationId, Message, MessageStream, MessagingClient, MessagingError, Result,
};
use std::future::Future;
use std::sync::Arc;

impl App {
    /// Spawn `work`, dropping it if the app shuts down first
    fn spawn_messaging<F>(&self, work: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        let cancel = self.cancel_token.clone();
        let tx = self.sender();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                event = work => {
                    let _ = tx.send(event);
                }
            }
        });
    }

    fn messaging_client(&self) -> Option<Arc<dyn MessagingClient>> {
        self.state.xmtp.as_ref()?.session.client().cloned()
    }

    pub(crate) fn connect_wallet(&mut self) {
        let Some(connect) = self.state.xmtp.as_mut().and_then(|x| x.session.begin_connect()) else {
            return;
        };
        tracing::info!("connecting wallet");
        self.spawn_messaging(async move { AppEvent::Connected(connect.await) });
    }

    pub(crate) fn disconnect_wallet(&mut self) {
        if let Some(xmtp) = self.state.xmtp.as_mut() {
            xmtp.disconnect();
        }
    }

    /// Sync with the network, then reload the conversation list
    pub(crate) fn refresh_conversations(&mut self) {
        let Some(client) = self.messaging_client() else {
            return;
        };
        if let Some(xmtp) = self.state.xmtp.as_mut() {
            xmtp.loading_conversations = true;
        }

        self.spawn_messaging(async move {
            let result: Result<Vec<Conversation>> = async {
                let known = client.sync_conversations().await?;
                tracing::debug!(known, "conversations synced");
                client.list_conversations().await
            }
            .await;
            AppEvent::ConversationsLoaded(result)
        });
    }

    pub(crate) fn create_dm(&mut self, address: String) {
        let Some(client) = self.messaging_client() else {
            return;
        };
        self.spawn_messaging(async move { AppEvent::DmCreated(client.create_dm(&address).await) });
    }

    /// Open `conversation`: subscribe first, then fetch history
    ///
    /// Messages posted between the two calls show up in both and are
    /// deduplicated when ingested.
    pub(crate) fn select_conversation(&mut self, conversation: Conversation) {
        let Some(client) = self.messaging_client() else {
            return;
        };
        let Some(xmtp) = self.state.xmtp.as_mut() else {
            return;
        };
        let id = conversation.id.clone();
        let generation = xmtp.begin_selection(conversation);
        tracing::debug!(conversation = %id, generation, "conversation selected");

        self.spawn_messaging(async move {
            let result: Result<(Vec<Message>, MessageStream)> = async {
                let stream = client.stream_messages(&id).await?;
                let history = client.list_messages(&id).await?;
                Ok((history, stream))
            }
            .await;
            AppEvent::MessagesLoaded { generation, result }
        });
    }

    pub(crate) fn send_message(&mut self, conversation_id: ConversationId, dispatch: Dispatch) {
        let ticket = dispatch.ticket;
        let Some(client) = self.messaging_client() else {
            self.handle_app_event(AppEvent::SendFinished { ticket, result: Err(MessagingError::NotConnected) });
            return;
        };
        self.spawn_messaging(async move {
            let result = client.send(&conversation_id, &dispatch.text).await;
            AppEvent::SendFinished { ticket, result }
        });
    }
}
