use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

/// Iceberg-based color theme for the duet TUI
#[derive(Debug, Clone, Copy)]
pub struct Theme;

impl Theme {
    /// Primary background: deep blue-black (fills terminal)
    pub const BG: Color = Color::Rgb(22, 24, 33);

    /// Foreground: light blue-gray (primary text)
    pub const FG: Color = Color::Rgb(198, 200, 209);

    /// Secondary background: panels, cards, remote bubbles
    pub const PANEL_BG: Color = Color::Rgb(30, 33, 50);

    /// Selection and focused controls
    pub const ACTIVE: Color = Color::Rgb(39, 44, 66);

    /// Local bubbles
    pub const BLUE: Color = Color::Rgb(132, 160, 198);

    pub const CYAN: Color = Color::Rgb(137, 184, 194);

    pub const PURPLE: Color = Color::Rgb(160, 147, 199);

    /// Decentralized mode accent, success notices
    pub const GREEN: Color = Color::Rgb(180, 190, 130);

    /// AI mode accent
    pub const YELLOW: Color = Color::Rgb(226, 164, 120);

    /// Errors
    pub const RED: Color = Color::Rgb(226, 120, 120);

    /// Muted text: timestamps, hints, empty states
    pub const MUTED: Color = Color::Rgb(107, 112, 137);

    pub const BORDER: Color = Color::Rgb(60, 65, 90);

    /// Base style for all text
    pub fn base() -> Style {
        Style::default().fg(Self::FG).bg(Self::BG)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::GREEN).bg(Self::BG)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::RED).bg(Self::BG)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::MUTED).bg(Self::BG)
    }

    pub fn panel() -> Style {
        Style::default().fg(Self::FG).bg(Self::PANEL_BG)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Border of the focused control
    pub fn border_focused() -> Style {
        Style::default().fg(Self::BLUE)
    }

    pub fn active() -> Style {
        Style::default().fg(Self::FG).bg(Self::ACTIVE)
    }

    pub fn title() -> Style {
        Style::default().fg(Self::FG).add_modifier(Modifier::BOLD)
    }

    /// Bubble for entries written at this terminal
    pub fn local_bubble() -> Style {
        Style::default().fg(Self::BG).bg(Self::BLUE)
    }

    /// Bubble for answers and peer messages
    pub fn remote_bubble() -> Style {
        Self::panel()
    }

    /// Bubble for failure entries
    pub fn error_bubble() -> Style {
        Style::default().fg(Self::RED).bg(Self::PANEL_BG)
    }

    /// Accent color of a chat view (`ai-chat` or `xmtp-chat`)
    pub fn mode_color(mode: &str) -> Color {
        match mode {
            "ai-chat" => Self::YELLOW,
            "xmtp-chat" => Self::GREEN,
            _ => Self::BLUE,
        }
    }

    /// Pill-shaped label, e.g. `[ Uncensored ]`
    pub fn badge(label: &str, color: Color) -> Span<'static> {
        Span::styled(format!(" {} ", label), Style::default().fg(Self::BG).bg(color).add_modifier(Modifier::BOLD))
    }

    /// Outlined label for secondary badges
    pub fn outline_badge(label: &str) -> Span<'static> {
        Span::styled(format!("( {} )", label), Style::default().fg(Self::FG))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_values() {
        assert!(matches!(Theme::BG, Color::Rgb(_, _, _)));
        assert!(matches!(Theme::FG, Color::Rgb(_, _, _)));
        assert!(matches!(Theme::PANEL_BG, Color::Rgb(_, _, _)));
    }

    #[test]
    fn test_mode_colors() {
        assert_eq!(Theme::mode_color("ai-chat"), Theme::YELLOW);
        assert_eq!(Theme::mode_color("xmtp-chat"), Theme::GREEN);
        assert_eq!(Theme::mode_color("welcome"), Theme::BLUE);
    }

    #[test]
    fn test_styles() {
        let base = Theme::base();
        assert_eq!(base.fg, Some(Theme::FG));
        assert_eq!(base.bg, Some(Theme::BG));

        assert_eq!(Theme::local_bubble().bg, Some(Theme::BLUE));
        assert_eq!(Theme::error_bubble().fg, Some(Theme::RED));
    }

    #[test]
    fn test_badge_padding() {
        assert_eq!(Theme::badge("Uncensored", Theme::YELLOW).content, " Uncensored ");
        assert_eq!(Theme::outline_badge("Privacy").content, "( Privacy )");
    }
}
