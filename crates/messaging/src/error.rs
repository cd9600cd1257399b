use thiserror::Error;

/// Result type alias for messaging operations
pub type Result<T> = std::result::Result<T, MessagingError>;

/// Failures reported by the wallet and messaging collaborators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagingError {
    #[error("not connected to the messaging network")]
    NotConnected,

    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),

    /// Address is well-formed but has no inbox on the network
    #[error("peer {0} is not reachable on the messaging network")]
    PeerNotReachable(String),

    #[error("conversation not found: {0}")]
    ConversationNotFound(String),

    #[error("wallet error: {0}")]
    Wallet(String),

    #[error("message stream error: {0}")]
    Stream(String),
}

impl From<MessagingError> for duet_core::Error {
    fn from(err: MessagingError) -> Self {
        duet_core::Error::Messaging(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(MessagingError::NotConnected.to_string(), "not connected to the messaging network");
        assert_eq!(
            MessagingError::PeerNotReachable("0xabc".to_string()).to_string(),
            "peer 0xabc is not reachable on the messaging network"
        );
        assert_eq!(MessagingError::Wallet("user rejected".to_string()).to_string(), "wallet error: user rejected");
    }

    #[test]
    fn test_converts_into_core_error() {
        let err: duet_core::Error = MessagingError::NotConnected.into();
        assert_eq!(err.to_string(), "messaging error: not connected to the messaging network");
    }
}
