//! Terminal page shell for duet: welcome page, answer-service chat and
//! decentralized messaging chat.

pub mod app;
pub mod components;
pub mod event_handler;
pub mod layout;
pub mod state;
pub mod theme;

pub use app::{AnswerSettings, App, AppEvent};
pub use event_handler::{EventHandler, KeyAction};
pub use state::{AppState, ViewMode};
pub use theme::Theme;
