mod ai_chat;
mod app_state;
mod scroll;
mod view;
mod welcome;
mod xmtp_chat;

pub use ai_chat::AiChatState;
pub use app_state::{AppState, SPINNER_FRAMES};
pub use scroll::ScrollState;
pub use view::ViewMode;
pub use welcome::{CARDS, WelcomeState};
pub use xmtp_chat::{DM_CREATION_ERROR, XmtpChatState, XmtpFocus, to_incoming};
