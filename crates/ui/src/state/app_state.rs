use std::sync::Arc;

use duet_messaging::{ClientBuilder, MessagingSession, WalletConnector};

use super::{AiChatState, ViewMode, WelcomeState, XmtpChatState};

/// Typing indicator frames, advanced once per tick
pub const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Main application state
pub struct AppState {
    /// Page currently shown
    pub view: ViewMode,
    /// Welcome card selection
    pub welcome: WelcomeState,
    /// Answer-service surface
    pub ai: AiChatState,
    /// Messaging surface; present only while a chat view is open
    pub xmtp: Option<XmtpChatState>,
    /// Animation counter
    pub tick: usize,
    pub should_exit: bool,
    wallet: Arc<dyn WalletConnector>,
    builder: Arc<dyn ClientBuilder>,
}

impl AppState {
    pub fn new(wallet: Arc<dyn WalletConnector>, builder: Arc<dyn ClientBuilder>) -> Self {
        Self {
            view: ViewMode::Welcome,
            welcome: WelcomeState::new(),
            ai: AiChatState::new(),
            xmtp: None,
            tick: 0,
            should_exit: false,
            wallet,
            builder,
        }
    }

    /// Change page.
    ///
    /// Entering a chat view constructs the messaging session if there is none;
    /// returning to the welcome view tears it down. The AI surface is
    /// remounted every time it becomes active. Returns false when `view` is
    /// already shown.
    pub fn switch_view(&mut self, view: ViewMode) -> bool {
        if view == self.view {
            return false;
        }
        tracing::debug!(from = %self.view, to = %view, "switching view");

        match view {
            ViewMode::Welcome => self.teardown_messaging(),
            ViewMode::AiChat | ViewMode::XmtpChat => {
                if self.xmtp.is_none() {
                    let session = MessagingSession::new(Arc::clone(&self.wallet), Arc::clone(&self.builder));
                    self.xmtp = Some(XmtpChatState::new(session));
                }
                if view == ViewMode::AiChat {
                    self.ai.remount();
                }
                self.welcome.select(view);
            }
        }

        self.view = view;
        true
    }

    fn teardown_messaging(&mut self) {
        if let Some(mut xmtp) = self.xmtp.take() {
            xmtp.disconnect();
        }
    }

    pub fn advance_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn spinner_frame(&self) -> char {
        SPINNER_FRAMES[self.tick % SPINNER_FRAMES.len()]
    }

    /// Whether something on screen is animating
    pub fn is_busy(&self) -> bool {
        match self.view {
            ViewMode::Welcome => false,
            ViewMode::AiChat => self.ai.transcript.is_pending(),
            ViewMode::XmtpChat => self.xmtp.as_ref().is_some_and(|x| {
                x.session.state().is_connecting()
                    || x.loading_conversations
                    || x.loading_messages
                    || x.transcript.is_pending()
            }),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("view", &self.view)
            .field("welcome", &self.welcome)
            .field("ai", &self.ai)
            .field("xmtp", &self.xmtp)
            .field("should_exit", &self.should_exit)
            .finish_non_exhaustive()
    }
}
