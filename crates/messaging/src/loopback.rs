//! In-process messaging network.
//!
//! Every client built from the same [`LoopbackNetwork`] shares its inboxes,
//! conversations and message history. New messages fan out over a broadcast
//! channel, so streams behave like a live network subscription. An optional
//! echo peer answers direct messages, which makes the surface usable without a
//! second participant.

use chrono::Local;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::address::{is_valid_address, normalize_address};
use crate::client::{ClientBuilder, MessageStream, MessagingClient, WalletConnector};
use crate::error::{MessagingError, Result};
use crate::types::*;
use duet_core::MessagingConfig;

/// Address of the built-in peer that replies to every direct message
pub const ECHO_PEER_ADDRESS: &str = "0xec40ec40ec40ec40ec40ec40ec40ec40ec40ec40";

/// Name of the group every new inbox joins when the echo peer is enabled
pub const LOUNGE_NAME: &str = "duet lounge";

const BROADCAST_CAPACITY: usize = 256;

struct ConversationRecord {
    id: ConversationId,
    /// Group name; `None` for direct messages and unnamed groups
    name: Option<String>,
    is_dm: bool,
    /// Member addresses (normalized)
    members: Vec<String>,
    created_at: chrono::DateTime<Local>,
    messages: Vec<Message>,
}

impl ConversationRecord {
    /// The conversation as seen by `viewer`
    fn view_for(&self, viewer: &str) -> Conversation {
        let kind = if self.is_dm {
            let peer = self.members.iter().find(|m| m.as_str() != viewer).cloned().unwrap_or_default();
            ConversationKind::DirectMessage { peer_address: peer }
        } else {
            ConversationKind::Group { name: self.name.clone() }
        };
        Conversation { id: self.id.clone(), kind, created_at: self.created_at }
    }

    fn has_member(&self, address: &str) -> bool {
        self.members.iter().any(|m| m == address)
    }
}

#[derive(Default)]
struct NetworkState {
    /// address -> inbox
    inboxes: HashMap<String, InboxId>,
    conversations: Vec<ConversationRecord>,
    next_message: u64,
    next_group: u64,
}

impl NetworkState {
    fn conversation(&self, id: &ConversationId) -> Option<&ConversationRecord> {
        self.conversations.iter().find(|c| &c.id == id)
    }

    fn conversation_mut(&mut self, id: &ConversationId) -> Option<&mut ConversationRecord> {
        self.conversations.iter_mut().find(|c| &c.id == id)
    }

    fn next_message_id(&mut self) -> MessageId {
        self.next_message += 1;
        MessageId::new(format!("msg-{:08}", self.next_message))
    }

    fn append(&mut self, conversation_id: &ConversationId, sender: InboxId, content: String) -> Result<Message> {
        let id = self.next_message_id();
        let record = self
            .conversation_mut(conversation_id)
            .ok_or_else(|| MessagingError::ConversationNotFound(conversation_id.to_string()))?;

        let message =
            Message { id, conversation_id: record.id.clone(), sender_inbox_id: sender, content, sent_at: Local::now() };
        record.messages.push(message.clone());
        Ok(message)
    }
}

/// Shared in-process network
#[derive(Clone)]
pub struct LoopbackNetwork {
    state: Arc<Mutex<NetworkState>>,
    events: broadcast::Sender<Message>,
    echo_peer: bool,
}

impl Default for LoopbackNetwork {
    fn default() -> Self {
        Self::new(false)
    }
}

impl LoopbackNetwork {
    pub fn new(echo_peer: bool) -> Self {
        let (events, _) = broadcast::channel(BROADCAST_CAPACITY);
        let network = Self { state: Arc::new(Mutex::new(NetworkState::default())), events, echo_peer };
        if echo_peer {
            network.register(ECHO_PEER_ADDRESS);
        }
        network
    }

    pub fn has_echo_peer(&self) -> bool {
        self.echo_peer
    }

    fn lock(&self) -> MutexGuard<'_, NetworkState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register an inbox for `address`, returning the existing one if present
    pub fn register(&self, address: &str) -> InboxId {
        let address = normalize_address(address);
        let mut state = self.lock();
        state
            .inboxes
            .entry(address.clone())
            .or_insert_with(|| InboxId::new(format!("inbox-{}", address.trim_start_matches("0x"))))
            .clone()
    }

    pub fn inbox_for(&self, address: &str) -> Option<InboxId> {
        self.lock().inboxes.get(&normalize_address(address)).cloned()
    }

    /// Create a group among registered `members`
    pub fn create_group(&self, name: Option<&str>, members: &[&str]) -> Result<ConversationId> {
        let members: Vec<String> = members.iter().map(|m| normalize_address(m)).collect();
        let mut state = self.lock();
        if let Some(missing) = members.iter().find(|m| !state.inboxes.contains_key(*m)) {
            return Err(MessagingError::PeerNotReachable(missing.clone()));
        }

        state.next_group += 1;
        let id = ConversationId::new(format!("grp-{:012x}", state.next_group));
        state.conversations.push(ConversationRecord {
            id: id.clone(),
            name: name.map(str::to_string),
            is_dm: false,
            members,
            created_at: Local::now(),
            messages: Vec::new(),
        });
        tracing::debug!(conversation = %id, "loopback group created");
        Ok(id)
    }

    /// Post a message as `sender_address` and fan it out to streams
    pub fn post(&self, conversation_id: &ConversationId, sender_address: &str, content: &str) -> Result<Message> {
        let sender_address = normalize_address(sender_address);
        let message = {
            let mut state = self.lock();
            let sender = state
                .inboxes
                .get(&sender_address)
                .cloned()
                .ok_or_else(|| MessagingError::PeerNotReachable(sender_address.clone()))?;
            let record = state
                .conversation(conversation_id)
                .ok_or_else(|| MessagingError::ConversationNotFound(conversation_id.to_string()))?;
            if !record.has_member(&sender_address) {
                return Err(MessagingError::ConversationNotFound(conversation_id.to_string()));
            }
            state.append(conversation_id, sender, content.to_string())?
        };

        // no receivers is not an error
        let _ = self.events.send(message.clone());

        if self.echo_peer && sender_address != ECHO_PEER_ADDRESS {
            self.echo(conversation_id, &message);
        }
        Ok(message)
    }

    fn echo(&self, conversation_id: &ConversationId, original: &Message) {
        let is_echo_dm = self
            .lock()
            .conversation(conversation_id)
            .is_some_and(|c| c.is_dm && c.has_member(ECHO_PEER_ADDRESS));
        if !is_echo_dm {
            return;
        }

        match self.post(conversation_id, ECHO_PEER_ADDRESS, &format!("echo: {}", original.content)) {
            Ok(reply) => tracing::debug!(message = %reply.id, "echo peer replied"),
            Err(e) => tracing::warn!("echo peer failed to reply: {}", e),
        }
    }

    fn dm_id(a: &str, b: &str) -> ConversationId {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        ConversationId::new(format!("dm-{}-{}", low.trim_start_matches("0x"), high.trim_start_matches("0x")))
    }

    fn find_or_create_dm(&self, own_address: &str, peer_address: &str) -> Result<Conversation> {
        let peer = normalize_address(peer_address);
        if !is_valid_address(&peer) {
            return Err(MessagingError::PeerNotReachable(peer_address.trim().to_string()));
        }

        let mut state = self.lock();
        if !state.inboxes.contains_key(&peer) {
            return Err(MessagingError::PeerNotReachable(peer));
        }

        let id = Self::dm_id(own_address, &peer);
        if state.conversation(&id).is_none() {
            state.conversations.push(ConversationRecord {
                id: id.clone(),
                name: None,
                is_dm: true,
                members: vec![own_address.to_string(), peer.clone()],
                created_at: Local::now(),
                messages: Vec::new(),
            });
            tracing::debug!(conversation = %id, "loopback dm created");
        }

        state
            .conversation(&id)
            .map(|record| record.view_for(own_address))
            .ok_or_else(|| MessagingError::ConversationNotFound(id.to_string()))
    }

    fn subscribe(&self, conversation_id: ConversationId) -> MessageStream {
        let rx = self.events.subscribe();
        futures::stream::unfold(rx, move |mut rx| {
            let conversation_id = conversation_id.clone();
            async move {
                loop {
                    match rx.recv().await {
                        Ok(message) if message.conversation_id == conversation_id => return Some((Ok(message), rx)),
                        Ok(_) => continue,
                        Err(RecvError::Lagged(skipped)) => {
                            return Some((Err(MessagingError::Stream(format!("missed {} messages", skipped))), rx));
                        }
                        Err(RecvError::Closed) => return None,
                    }
                }
            }
        })
        .boxed()
    }

    /// Client bound to `address`, registering it first
    pub fn client_for(&self, address: &str) -> LoopbackClient {
        let address = normalize_address(address);
        let inbox_id = self.register(&address);
        LoopbackClient { network: self.clone(), address, inbox_id }
    }
}

/// Messaging client on a [`LoopbackNetwork`]
pub struct LoopbackClient {
    network: LoopbackNetwork,
    address: String,
    inbox_id: InboxId,
}

impl LoopbackClient {
    pub fn address(&self) -> &str {
        &self.address
    }

    fn record_check<T>(&self, id: &ConversationId, f: impl FnOnce(&ConversationRecord) -> T) -> Result<T> {
        let state = self.network.lock();
        state
            .conversation(id)
            .filter(|c| c.has_member(&self.address))
            .map(f)
            .ok_or_else(|| MessagingError::ConversationNotFound(id.to_string()))
    }
}

#[async_trait::async_trait]
impl MessagingClient for LoopbackClient {
    fn inbox_id(&self) -> &InboxId {
        &self.inbox_id
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let state = self.network.lock();
        let mut conversations: Vec<Conversation> = state
            .conversations
            .iter()
            .filter(|c| c.has_member(&self.address))
            .map(|c| c.view_for(&self.address))
            .collect();
        conversations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(conversations)
    }

    async fn sync_conversations(&self) -> Result<usize> {
        let count = self.network.lock().conversations.iter().filter(|c| c.has_member(&self.address)).count();
        tracing::debug!(count, "loopback sync");
        Ok(count)
    }

    async fn list_messages(&self, conversation_id: &ConversationId) -> Result<Vec<Message>> {
        self.record_check(conversation_id, |c| c.messages.clone())
    }

    async fn send(&self, conversation_id: &ConversationId, content: &str) -> Result<Message> {
        self.network.post(conversation_id, &self.address, content)
    }

    async fn create_dm(&self, peer_address: &str) -> Result<Conversation> {
        self.network.find_or_create_dm(&self.address, peer_address)
    }

    async fn stream_messages(&self, conversation_id: &ConversationId) -> Result<MessageStream> {
        self.record_check(conversation_id, |_| ())?;
        Ok(self.network.subscribe(conversation_id.clone()))
    }
}

/// Wallet connector with a fixed or generated address, or a scripted failure
pub struct LoopbackWallet {
    address: Option<String>,
    failure: Option<String>,
}

impl LoopbackWallet {
    pub fn fixed(address: impl Into<String>) -> Self {
        Self { address: Some(address.into()), failure: None }
    }

    /// Fresh random address on every connect
    pub fn generated() -> Self {
        Self { address: None, failure: None }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self { address: None, failure: Some(message.into()) }
    }

    fn random_address() -> String {
        let bytes = uuid::Uuid::new_v4();
        let more = uuid::Uuid::new_v4();
        let hex: String = bytes.as_bytes().iter().chain(&more.as_bytes()[..4]).map(|b| format!("{:02x}", b)).collect();
        format!("0x{}", hex)
    }
}

#[async_trait::async_trait]
impl WalletConnector for LoopbackWallet {
    async fn connect(&self) -> Result<WalletAccount> {
        if let Some(message) = &self.failure {
            return Err(MessagingError::Wallet(message.clone()));
        }

        let address = match &self.address {
            Some(address) if is_valid_address(address) => normalize_address(address),
            Some(address) => return Err(MessagingError::InvalidAddress(address.clone())),
            None => Self::random_address(),
        };
        tracing::info!(address = %address, "wallet connected");
        Ok(WalletAccount::new(address))
    }
}

/// Builds [`LoopbackClient`]s; new inboxes join the lounge when the echo peer is on
pub struct LoopbackClientBuilder {
    network: LoopbackNetwork,
}

impl LoopbackClientBuilder {
    pub fn new(network: LoopbackNetwork) -> Self {
        Self { network }
    }

    fn seed_lounge(&self, address: &str) -> Result<()> {
        let lounge = self.network.create_group(Some(LOUNGE_NAME), &[ECHO_PEER_ADDRESS, address])?;
        self.network.post(
            &lounge,
            ECHO_PEER_ADDRESS,
            &format!("Welcome to the {}. Start a DM with {} and it will answer.", LOUNGE_NAME, ECHO_PEER_ADDRESS),
        )?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ClientBuilder for LoopbackClientBuilder {
    async fn build(&self, account: &WalletAccount) -> Result<Arc<dyn MessagingClient>> {
        let is_new = self.network.inbox_for(&account.address).is_none();
        let client = self.network.client_for(&account.address);

        if is_new && self.network.has_echo_peer() {
            self.seed_lounge(client.address())?;
        }
        tracing::info!(inbox = %client.inbox_id(), "messaging client ready");
        Ok(Arc::new(client))
    }
}

/// Wallet connector and client builder for the configured loopback setup
pub fn from_config(config: &MessagingConfig) -> (Arc<dyn WalletConnector>, Arc<dyn ClientBuilder>) {
    let network = LoopbackNetwork::new(config.echo_peer);
    let wallet: Arc<dyn WalletConnector> = match (&config.fail_connect, &config.wallet_address) {
        (Some(message), _) => Arc::new(LoopbackWallet::failing(message.clone())),
        (None, Some(address)) => Arc::new(LoopbackWallet::fixed(address.clone())),
        (None, None) => Arc::new(LoopbackWallet::generated()),
    };
    (wallet, Arc::new(LoopbackClientBuilder::new(network)))
}
