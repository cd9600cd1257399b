//! Wallet and decentralized messaging collaborators.
//!
//! The chat surface talks only to the traits in [`client`]; [`loopback`]
//! provides the in-process network used by default.

pub mod address;
pub mod client;
pub mod error;
pub mod loopback;
pub mod session;
pub mod subscription;
pub mod types;

pub use address::{is_valid_address, truncate_address};
pub use client::{ClientBuilder, MessageStream, MessagingClient, WalletConnector};
pub use error::{MessagingError, Result};
pub use session::{ConnectOutcome, ConnectState, MessagingSession};
pub use subscription::Subscription;
pub use types::{Conversation, ConversationId, ConversationKind, InboxId, Message, MessageId, WalletAccount};
