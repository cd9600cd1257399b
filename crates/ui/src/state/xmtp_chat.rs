use duet_core::{Author, Composer, IncomingMessage, Transcript};
use duet_messaging::{Conversation, ConversationId, InboxId, Message, MessagingSession, Subscription};

use super::ScrollState;

/// Inline error under the new-conversation input
pub const DM_CREATION_ERROR: &str = "Failed to create DM. Make sure the address is valid and has XMTP enabled.";

/// Which control receives typed keys in the decentralized surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XmtpFocus {
    PeerInput,
    Conversations,
    #[default]
    Compose,
}

impl XmtpFocus {
    pub fn next(self) -> Self {
        match self {
            XmtpFocus::PeerInput => XmtpFocus::Conversations,
            XmtpFocus::Conversations => XmtpFocus::Compose,
            XmtpFocus::Compose => XmtpFocus::PeerInput,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            XmtpFocus::PeerInput => XmtpFocus::Compose,
            XmtpFocus::Conversations => XmtpFocus::PeerInput,
            XmtpFocus::Compose => XmtpFocus::Conversations,
        }
    }
}

/// Convert a network message into a transcript entry seen by `own_inbox`
pub fn to_incoming(message: Message, own_inbox: &InboxId) -> IncomingMessage {
    let author = if message.is_from(own_inbox) { Author::Local } else { Author::Remote };
    IncomingMessage { remote_id: message.id.0, author, content: message.content, timestamp: message.sent_at }
}

/// State of the decentralized messaging surface
///
/// Every conversation switch bumps `generation`; loads and stream items
/// tagged with an older generation are discarded.
pub struct XmtpChatState {
    pub session: MessagingSession,
    pub focus: XmtpFocus,
    pub peer_input: Composer,
    pub dm_error: Option<String>,
    pub conversations: Vec<Conversation>,
    pub list_cursor: usize,
    pub selected: Option<Conversation>,
    pub loading_conversations: bool,
    pub loading_messages: bool,
    pub transcript: Transcript,
    pub scroll: ScrollState,
    generation: u64,
    subscription: Option<Subscription>,
}

impl XmtpChatState {
    pub fn new(session: MessagingSession) -> Self {
        Self {
            session,
            focus: XmtpFocus::default(),
            peer_input: Composer::new(),
            dm_error: None,
            conversations: Vec::new(),
            list_cursor: 0,
            selected: None,
            loading_conversations: false,
            loading_messages: false,
            transcript: Transcript::new(),
            scroll: ScrollState::new(),
            generation: 0,
            subscription: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    pub fn inbox_id(&self) -> Option<InboxId> {
        self.session.client().map(|client| client.inbox_id().clone())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation && self.selected.is_some()
    }

    pub fn selected_id(&self) -> Option<&ConversationId> {
        self.selected.as_ref().map(|c| &c.id)
    }

    pub fn has_subscription(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    /// Switch to `conversation`: cancel the old stream, clear the transcript.
    ///
    /// Returns the generation that the history load and stream must carry.
    pub fn begin_selection(&mut self, conversation: Conversation) -> u64 {
        self.cancel_subscription();
        self.transcript.reset();
        self.scroll.reset();
        if let Some(index) = self.conversations.iter().position(|c| c.id == conversation.id) {
            self.list_cursor = index;
        }
        self.selected = Some(conversation);
        self.loading_messages = true;
        self.generation += 1;
        self.generation
    }

    /// Apply loaded history; false when the selection has moved on
    pub fn apply_history(&mut self, generation: u64, messages: Vec<Message>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.loading_messages = false;
        if let Some(inbox) = self.inbox_id() {
            for message in messages {
                self.transcript.ingest(to_incoming(message, &inbox));
            }
        }
        true
    }

    /// History load failed; leave the conversation empty
    pub fn history_failed(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.loading_messages = false;
        true
    }

    /// Keep `subscription` if it still belongs to the selected conversation
    pub fn attach_subscription(&mut self, generation: u64, subscription: Subscription) -> bool {
        if !self.is_current(generation) {
            subscription.cancel();
            return false;
        }
        self.cancel_subscription();
        self.subscription = Some(subscription);
        true
    }

    /// Append a streamed message; false when stale or already present
    pub fn ingest_message(&mut self, generation: u64, message: Message) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        match self.inbox_id() {
            Some(inbox) => self.transcript.ingest(to_incoming(message, &inbox)),
            None => false,
        }
    }

    pub fn cancel_subscription(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }

    /// Replace the conversation list after a load or refresh
    pub fn set_conversations(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
        self.loading_conversations = false;
        if let Some(id) = self.selected.as_ref().map(|c| c.id.clone())
            && let Some(index) = self.conversations.iter().position(|c| c.id == id)
        {
            self.list_cursor = index;
        }
        self.list_cursor = self.list_cursor.min(self.conversations.len().saturating_sub(1));
    }

    /// Insert a newly created conversation at the top unless already listed
    pub fn upsert_conversation(&mut self, conversation: Conversation) {
        match self.conversations.iter().position(|c| c.id == conversation.id) {
            Some(index) => self.list_cursor = index,
            None => {
                self.conversations.insert(0, conversation);
                self.list_cursor = 0;
            }
        }
    }

    pub fn cursor_up(&mut self) {
        self.list_cursor = self.list_cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if self.list_cursor + 1 < self.conversations.len() {
            self.list_cursor += 1;
        }
    }

    pub fn cursor_conversation(&self) -> Option<&Conversation> {
        self.conversations.get(self.list_cursor)
    }

    pub fn content_size(&self) -> usize {
        self.transcript.len()
    }

    /// Drop the client and everything loaded through it
    pub fn disconnect(&mut self) {
        self.cancel_subscription();
        self.session.disconnect();
        self.conversations.clear();
        self.list_cursor = 0;
        self.selected = None;
        self.loading_conversations = false;
        self.loading_messages = false;
        self.dm_error = None;
        self.peer_input.clear();
        self.transcript.reset();
        self.scroll.reset();
        self.generation += 1;
    }
}

impl std::fmt::Debug for XmtpChatState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmtpChatState")
            .field("session", &self.session)
            .field("focus", &self.focus)
            .field("conversations", &self.conversations.len())
            .field("selected", &self.selected_id())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
