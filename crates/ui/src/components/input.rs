use crate::theme::Theme;

use duet_core::Composer;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

/// Single-line compose box with placeholder text
///
/// Disabled boxes render dimmed and never show the cursor.
pub struct InputBox<'a> {
    composer: &'a Composer,
    placeholder: &'a str,
    title: Option<&'a str>,
    focused: bool,
    disabled: bool,
}

impl<'a> InputBox<'a> {
    pub fn new(composer: &'a Composer, placeholder: &'a str) -> Self {
        Self { composer, placeholder, title: None, focused: true, disabled: false }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let border = if self.focused && !self.disabled { Theme::border_focused() } else { Theme::border() };
        let mut block = Block::default().borders(Borders::ALL).border_style(border).style(Theme::base());
        if let Some(title) = self.title {
            block = block.title(Span::styled(format!(" {} ", title), Theme::muted()));
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.composer.is_empty() {
            let placeholder = Paragraph::new(Line::from(Span::styled(self.placeholder.to_string(), Theme::muted())));
            frame.render_widget(placeholder, inner);
        } else {
            let style = if self.disabled { Theme::muted() } else { Theme::base() };
            let text = self.composer.text().replace('\n', " ");
            let paragraph = Paragraph::new(Line::from(Span::styled(text, style)))
                .scroll((0, self.horizontal_offset(inner.width) as u16));
            frame.render_widget(paragraph, inner);
        }

        if self.focused && !self.disabled {
            let column = self.cursor_column().saturating_sub(self.horizontal_offset(inner.width));
            let x = inner.x + (column as u16).min(inner.width.saturating_sub(1));
            frame.set_cursor_position(Position::new(x, inner.y));
        }
    }

    fn cursor_column(&self) -> usize {
        let (before, _) = self.composer.split_at_cursor();
        before.width()
    }

    /// Columns skipped so the cursor stays inside a box `width` wide
    fn horizontal_offset(&self, width: u16) -> usize {
        self.cursor_column().saturating_sub(width.saturating_sub(1) as usize)
    }
}
