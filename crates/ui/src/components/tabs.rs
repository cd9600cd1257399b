use crate::{state::ViewMode, theme::Theme};

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

/// Tab strip of the chat views with the back-to-home hint on the right
pub struct TabBar {
    active: ViewMode,
}

impl TabBar {
    pub fn new(active: ViewMode) -> Self {
        Self { active }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let mut line = self.line();
        let hint = vec![
            Span::styled("Esc", Style::default().fg(Theme::BLUE)),
            Span::styled(" Back to Home ", Theme::muted()),
        ];
        let left_width: usize = line.spans.iter().map(|s| s.content.width()).sum();
        let hint_width: usize = hint.iter().map(|s| s.content.width()).sum();
        let pad = (area.width as usize).saturating_sub(left_width + hint_width);
        if pad > 0 {
            line.spans.push(Span::styled(" ".repeat(pad), Theme::base()));
            line.spans.extend(hint);
        }

        frame.render_widget(Paragraph::new(line).style(Theme::base()), area);
    }

    fn line(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(" ", Theme::base())];
        for (index, mode) in [ViewMode::AiChat, ViewMode::XmtpChat].into_iter().enumerate() {
            let label = format!(" F{} {} ", index + 1, mode.tab_label());
            let span = if mode == self.active {
                Span::styled(
                    label,
                    Style::default()
                        .fg(Theme::BG)
                        .bg(Theme::mode_color(mode.as_str()))
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(label, Theme::muted())
            };
            spans.push(span);
            spans.push(Span::styled(" ", Theme::base()));
        }
        Line::from(spans)
    }
}
