use std::fmt;
use std::str::FromStr;

/// Which page the shell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Welcome,
    AiChat,
    XmtpChat,
}

impl ViewMode {
    pub const VALUES: &[ViewMode] = &[ViewMode::Welcome, ViewMode::AiChat, ViewMode::XmtpChat];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Welcome => "welcome",
            ViewMode::AiChat => "ai-chat",
            ViewMode::XmtpChat => "xmtp-chat",
        }
    }

    /// Tab label in the chat views
    pub fn tab_label(&self) -> &'static str {
        match self {
            ViewMode::Welcome => "Home",
            ViewMode::AiChat => "AI Chat",
            ViewMode::XmtpChat => "XMTP Chat",
        }
    }

    pub fn is_chat(&self) -> bool {
        !matches!(self, ViewMode::Welcome)
    }

    /// The other chat tab
    pub fn toggled(&self) -> ViewMode {
        match self {
            ViewMode::AiChat => ViewMode::XmtpChat,
            ViewMode::XmtpChat => ViewMode::AiChat,
            ViewMode::Welcome => ViewMode::Welcome,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "welcome" | "home" => Ok(ViewMode::Welcome),
            "ai-chat" | "ai" => Ok(ViewMode::AiChat),
            "xmtp-chat" | "xmtp" => Ok(ViewMode::XmtpChat),
            other => Err(format!("unknown view '{}': expected welcome, ai-chat or xmtp-chat", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_round_trips() {
        for mode in ViewMode::VALUES {
            assert_eq!(mode.as_str().parse::<ViewMode>().unwrap(), *mode);
        }
    }

    #[test]
    fn test_aliases_and_errors() {
        assert_eq!("AI".parse::<ViewMode>().unwrap(), ViewMode::AiChat);
        assert_eq!("xmtp".parse::<ViewMode>().unwrap(), ViewMode::XmtpChat);
        assert!("settings".parse::<ViewMode>().is_err());
    }

    #[test]
    fn test_toggled() {
        assert_eq!(ViewMode::AiChat.toggled(), ViewMode::XmtpChat);
        assert_eq!(ViewMode::XmtpChat.toggled(), ViewMode::AiChat);
        assert_eq!(ViewMode::Welcome.toggled(), ViewMode::Welcome);
        assert!(!ViewMode::Welcome.is_chat());
    }
}
