use duet_core::Dispatch;
use duet_messaging::{Conversation, ConversationId};

use crate::state::ViewMode;

/// Actions that can be triggered by key events
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    /// Leave the application
    Quit,
    /// Show another page
    OpenView { view: ViewMode },
    /// A question was submitted to the answer service
    AskAi { dispatch: Dispatch },
    /// Start the wallet connect flow
    Connect,
    /// Drop the messaging client
    Disconnect,
    /// Sync and reload the conversation list
    RefreshConversations,
    /// Open a conversation from the list
    SelectConversation { conversation: Conversation },
    /// Find or create a direct conversation with a wallet address
    CreateDm { address: String },
    /// A message was submitted in the open conversation
    SendMessage { conversation_id: ConversationId, dispatch: Dispatch },
}
