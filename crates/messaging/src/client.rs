use futures::stream::BoxStream;
use std::sync::Arc;

use crate::error::Result;
use crate::types::{Conversation, ConversationId, InboxId, Message, WalletAccount};

/// Live, unbounded feed of new messages in one conversation
pub type MessageStream = BoxStream<'static, Result<Message>>;

/// Wallet-connect collaborator
#[async_trait::async_trait]
pub trait WalletConnector: Send + Sync {
    async fn connect(&self) -> Result<WalletAccount>;
}

/// Turns a connected wallet into a messaging client
#[async_trait::async_trait]
pub trait ClientBuilder: Send + Sync {
    async fn build(&self, account: &WalletAccount) -> Result<Arc<dyn MessagingClient>>;
}

/// Decentralized messaging collaborator, scoped to one inbox
#[async_trait::async_trait]
pub trait MessagingClient: Send + Sync {
    /// Inbox of the connected wallet; messages from it render as local
    fn inbox_id(&self) -> &InboxId;

    async fn list_conversations(&self) -> Result<Vec<Conversation>>;

    /// Pull conversations created elsewhere; returns how many are known afterwards
    async fn sync_conversations(&self) -> Result<usize>;

    /// History of a conversation, oldest first
    async fn list_messages(&self, conversation_id: &ConversationId) -> Result<Vec<Message>>;

    async fn send(&self, conversation_id: &ConversationId, content: &str) -> Result<Message>;

    /// Find or create the direct conversation with `peer_address`
    async fn create_dm(&self, peer_address: &str) -> Result<Conversation>;

    /// Subscribe to messages arriving after this call
    async fn stream_messages(&self, conversation_id: &ConversationId) -> Result<MessageStream>;
}
