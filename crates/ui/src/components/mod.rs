pub mod ai_chat;
pub mod input;
pub mod tabs;
pub mod transcript;
pub mod welcome;
pub mod xmtp_chat;

pub use ai_chat::AiChatView;
pub use input::InputBox;
pub use tabs::TabBar;
pub use transcript::{EmptyState, TranscriptView};
pub use welcome::WelcomeView;
pub use xmtp_chat::XmtpChatView;
