//! Explicit messaging session context.
//!
//! Owns the wallet connector, the client builder, the connection state and the
//! connected client. Constructed when a chat view is entered and dropped when
//! the user returns to the welcome view.

use std::future::Future;
use std::sync::Arc;

use crate::client::{ClientBuilder, MessagingClient, WalletConnector};
use crate::error::Result;
use crate::types::WalletAccount;

/// Connection lifecycle; success and failure are mutually exclusive
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectState {
    #[default]
    Disconnected,
    Connecting,
    Connected {
        address: String,
    },
    Failed {
        message: String,
    },
}

impl ConnectState {
    pub fn is_connecting(&self) -> bool {
        matches!(self, ConnectState::Connecting)
    }

    /// Standing error shown in the connect view
    pub fn error(&self) -> Option<&str> {
        match self {
            ConnectState::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Result of one connect attempt, produced off the UI task
pub struct ConnectOutcome {
    attempt: u64,
    result: Result<(WalletAccount, Arc<dyn MessagingClient>)>,
}

impl std::fmt::Debug for ConnectOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectOutcome")
            .field("attempt", &self.attempt)
            .field("ok", &self.result.is_ok())
            .finish()
    }
}

pub struct MessagingSession {
    wallet: Arc<dyn WalletConnector>,
    builder: Arc<dyn ClientBuilder>,
    state: ConnectState,
    account: Option<WalletAccount>,
    client: Option<Arc<dyn MessagingClient>>,
    attempt: u64,
}

impl MessagingSession {
    pub fn new(wallet: Arc<dyn WalletConnector>, builder: Arc<dyn ClientBuilder>) -> Self {
        Self { wallet, builder, state: ConnectState::Disconnected, account: None, client: None, attempt: 0 }
    }

    pub fn state(&self) -> &ConnectState {
        &self.state
    }

    pub fn client(&self) -> Option<&Arc<dyn MessagingClient>> {
        self.client.as_ref()
    }

    pub fn account(&self) -> Option<&WalletAccount> {
        self.account.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// Success text after a completed connect
    pub fn success_message(&self) -> Option<String> {
        self.account.as_ref().map(|account| format!("Wallet connected as {}", account.short_address()))
    }

    /// Start connecting.
    ///
    /// Returns `None` while a connect is in flight or a client is installed.
    /// The returned future owns everything it needs; spawn it and pass its
    /// output to [`finish_connect`](Self::finish_connect).
    pub fn begin_connect(&mut self) -> Option<impl Future<Output = ConnectOutcome> + Send + use<>> {
        if self.state.is_connecting() || self.client.is_some() {
            return None;
        }

        self.attempt += 1;
        self.state = ConnectState::Connecting;
        let attempt = self.attempt;
        let wallet = Arc::clone(&self.wallet);
        let builder = Arc::clone(&self.builder);

        Some(async move {
            let result: Result<(WalletAccount, Arc<dyn MessagingClient>)> = async {
                let account = wallet.connect().await?;
                let client = builder.build(&account).await?;
                Ok((account, client))
            }
            .await;
            ConnectOutcome { attempt, result }
        })
    }

    /// Install the client or record the failure.
    ///
    /// Outcomes from attempts superseded by [`disconnect`](Self::disconnect)
    /// are ignored; returns whether the outcome was applied.
    pub fn finish_connect(&mut self, outcome: ConnectOutcome) -> bool {
        if outcome.attempt != self.attempt || !self.state.is_connecting() {
            tracing::debug!(attempt = outcome.attempt, current = self.attempt, "ignoring stale connect outcome");
            return false;
        }

        match outcome.result {
            Ok((account, client)) => {
                self.state = ConnectState::Connected { address: account.address.clone() };
                self.account = Some(account);
                self.client = Some(client);
            }
            Err(e) => {
                tracing::warn!("wallet connection failed: {}", e);
                self.state = ConnectState::Failed { message: e.to_string() };
                self.account = None;
                self.client = None;
            }
        }
        true
    }

    /// Drop the client and return to the disconnected state
    pub fn disconnect(&mut self) {
        if self.client.is_some() || self.state.is_connecting() {
            tracing::info!("messaging session disconnected");
        }
        self.attempt += 1;
        self.state = ConnectState::Disconnected;
        self.account = None;
        self.client = None;
    }
}

impl std::fmt::Debug for MessagingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagingSession")
            .field("state", &self.state)
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loopback::{LoopbackClientBuilder, LoopbackNetwork, LoopbackWallet};

    const ALICE: &str = "0xa11ce00000000000000000000000000000000001";

    fn session(wallet: LoopbackWallet) -> MessagingSession {
        MessagingSession::new(Arc::new(wallet), Arc::new(LoopbackClientBuilder::new(LoopbackNetwork::new(false))))
    }

    #[tokio::test]
    async fn test_connect_success() {
        let mut session = session(LoopbackWallet::fixed(ALICE));
        assert_eq!(session.state(), &ConnectState::Disconnected);

        let connect = session.begin_connect().unwrap();
        assert!(session.state().is_connecting());
        assert!(session.begin_connect().is_none());

        assert!(session.finish_connect(connect.await));
        assert_eq!(session.state(), &ConnectState::Connected { address: ALICE.to_string() });
        assert!(session.is_connected());
        assert_eq!(session.success_message().as_deref(), Some("Wallet connected as 0xa11c...0001"));
        assert!(session.state().error().is_none());
        assert!(session.begin_connect().is_none());
    }

    #[tokio::test]
    async fn test_connect_failure_is_standing_error() {
        let mut session = session(LoopbackWallet::failing("user rejected request"));
        let connect = session.begin_connect().unwrap();
        session.finish_connect(connect.await);

        assert_eq!(session.state().error(), Some("wallet error: user rejected request"));
        assert!(!session.is_connected());
        assert!(session.success_message().is_none());

        assert!(session.begin_connect().is_some());
    }

    #[tokio::test]
    async fn test_disconnect_discards_in_flight_connect() {
        let mut session = session(LoopbackWallet::fixed(ALICE));
        let connect = session.begin_connect().unwrap();
        session.disconnect();

        assert!(!session.finish_connect(connect.await));
        assert_eq!(session.state(), &ConnectState::Disconnected);
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn test_disconnect_after_connect() {
        let mut session = session(LoopbackWallet::fixed(ALICE));
        let connect = session.begin_connect().unwrap();
        session.finish_connect(connect.await);

        session.disconnect();
        assert!(session.client().is_none());
        assert!(session.account().is_none());
        assert_eq!(session.state(), &ConnectState::Disconnected);
    }
}
