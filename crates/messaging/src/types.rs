use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::address::truncate_address;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Network-assigned conversation identifier
    ConversationId
);
string_id!(
    /// Network-assigned message identifier
    MessageId
);
string_id!(
    /// Identity of one participant's inbox; messages are classified by it
    InboxId
);

/// Direct message or group, each with its own display fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversationKind {
    DirectMessage { peer_address: String },
    Group { name: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub kind: ConversationKind,
    pub created_at: DateTime<Local>,
}

impl Conversation {
    pub fn is_dm(&self) -> bool {
        matches!(self.kind, ConversationKind::DirectMessage { .. })
    }

    /// Name shown for a group: its name, or the shortened id
    fn group_name(&self, name: Option<&str>) -> String {
        name.filter(|n| !n.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| truncate_address(self.id.as_str(), 6))
    }

    /// Entry text in the conversation list
    pub fn label(&self) -> String {
        match &self.kind {
            ConversationKind::DirectMessage { peer_address } => format!("DM {}", truncate_address(peer_address, 6)),
            ConversationKind::Group { name } => format!("Group {}", self.group_name(name.as_deref())),
        }
    }

    /// Heading above the open conversation
    pub fn title(&self) -> String {
        match &self.kind {
            ConversationKind::DirectMessage { peer_address } => {
                format!("DM with {}", truncate_address(peer_address, 6))
            }
            ConversationKind::Group { name } => format!("Group: {}", self.group_name(name.as_deref())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_inbox_id: InboxId,
    pub content: String,
    pub sent_at: DateTime<Local>,
}

impl Message {
    pub fn is_from(&self, inbox_id: &InboxId) -> bool {
        &self.sender_inbox_id == inbox_id
    }
}

/// A connected wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAccount {
    pub address: String,
}

impl WalletAccount {
    pub fn new(address: impl Into<String>) -> Self {
        Self { address: address.into() }
    }

    pub fn short_address(&self) -> String {
        truncate_address(&self.address, 6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEER: &str = "0x1234567890abcdef1234567890abcdef1234abcd";

    fn conversation(kind: ConversationKind) -> Conversation {
        Conversation { id: ConversationId::new("grp-9f8e7d6c5b4a"), kind, created_at: Local::now() }
    }

    #[test]
    fn test_dm_label_and_title() {
        let dm = conversation(ConversationKind::DirectMessage { peer_address: PEER.to_string() });
        assert!(dm.is_dm());
        assert_eq!(dm.label(), "DM 0x1234...abcd");
        assert_eq!(dm.title(), "DM with 0x1234...abcd");
    }

    #[test]
    fn test_named_group_label_and_title() {
        let group = conversation(ConversationKind::Group { name: Some("builders".to_string()) });
        assert!(!group.is_dm());
        assert_eq!(group.label(), "Group builders");
        assert_eq!(group.title(), "Group: builders");
    }

    #[test]
    fn test_unnamed_group_uses_truncated_id() {
        let group = conversation(ConversationKind::Group { name: None });
        assert_eq!(group.label(), "Group grp-9f...5b4a");

        let blank = conversation(ConversationKind::Group { name: Some("  ".to_string()) });
        assert_eq!(blank.title(), "Group: grp-9f...5b4a");
    }

    #[test]
    fn test_message_is_from() {
        let me = InboxId::new("inbox-me");
        let message = Message {
            id: MessageId::new("m1"),
            conversation_id: ConversationId::new("c1"),
            sender_inbox_id: me.clone(),
            content: "gm".to_string(),
            sent_at: Local::now(),
        };
        assert!(message.is_from(&me));
        assert!(!message.is_from(&InboxId::new("inbox-peer")));
    }

    #[test]
    fn test_wallet_short_address() {
        assert_eq!(WalletAccount::new(PEER).short_address(), "0x1234...abcd");
    }
}
