mod ai;
mod event_loop;
mod events;
mod keybinds;
mod rendering;
mod xmtp;

pub use events::AppEvent;

use crate::state::{AppState, ViewMode};

use duet_core::Config;
use duet_providers::{Provider, ProviderFactory, build_request, system_prompt};
use ratatui::{Terminal, backend::Backend};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Answer-service parameters applied to every question
#[derive(Debug, Clone)]
pub struct AnswerSettings {
    pub system_prompt: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl AnswerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            system_prompt: system_prompt(config.answer.system_prompt.as_deref()).to_string(),
            temperature: config.answer.temperature,
            timeout: Duration::from_secs(config.answer.timeout_secs),
        }
    }

    pub fn request(&self, question: &str) -> duet_providers::ChatRequest {
        build_request(&self.system_prompt, question, self.temperature)
    }
}

/// Main TUI application
///
/// Owns the page state, the answer provider and the channel through which
/// spawned collaborator calls report back to the event loop.
pub struct App {
    state: AppState,
    provider: Arc<dyn Provider>,
    answer: AnswerSettings,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    pub cancel_token: CancellationToken,
}

impl App {
    pub fn new(state: AppState, provider: Arc<dyn Provider>, answer: AnswerSettings) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self { state, provider, answer, event_tx, event_rx, cancel_token: CancellationToken::new() }
    }

    /// Build the provider and messaging collaborators described by `config`
    pub fn from_config(config: &Config) -> duet_core::Result<Self> {
        let answer = AnswerSettings::from_config(config);
        let provider = ProviderFactory::create_from_config(&config.answer.provider, answer.timeout)?;
        let (wallet, builder) = duet_messaging::loopback::from_config(&config.messaging);
        tracing::info!(provider = provider.name(), backend = config.messaging.backend.as_str(), "app configured");
        Ok(Self::new(AppState::new(wallet, builder), provider, answer))
    }

    /// Open on `view` instead of the welcome page
    pub fn with_view(mut self, view: ViewMode) -> Self {
        self.state.switch_view(view);
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn should_exit(&self) -> bool {
        self.state.should_exit
    }

    /// Run the TUI until the user quits
    pub async fn run(&mut self) -> std::io::Result<()> {
        event_loop::run(self).await
    }

    /// Handle one terminal event
    pub async fn handle_event(&mut self, event: crossterm::event::Event) {
        keybinds::handle_event(self, event).await;
    }

    /// Wait for the next collaborator event
    pub async fn next_app_event(&mut self) -> Option<AppEvent> {
        self.event_rx.recv().await
    }

    /// Draw the current state
    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> std::io::Result<()> {
        terminal
            .draw(|frame| rendering::render(frame, &mut self.state))
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        Ok(())
    }

    fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.event_tx.clone()
    }

    /// Switch page, logging the transition
    pub(crate) fn open_view(&mut self, view: ViewMode) {
        if self.state.switch_view(view) {
            tracing::info!(view = %view, "view opened");
        }
    }

    /// Stop every spawned task and leave the event loop
    pub fn quit(&mut self) {
        self.cancel_token.cancel();
        self.state.switch_view(ViewMode::Welcome);
        self.state.should_exit = true;
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("state", &self.state)
            .field("provider", &self.provider.name())
            .field("answer", &self.answer)
            .finish_non_exhaustive()
    }
}
