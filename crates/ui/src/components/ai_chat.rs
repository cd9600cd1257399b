use crate::{
    components::{EmptyState, InputBox, TranscriptView},
    layout::ChatLayout,
    state::AiChatState,
    theme::Theme,
};

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub const AI_TITLE: &str = "Free Speech AI Chat";
pub const AI_PLACEHOLDER: &str = "Ask anything... no limits, no censorship";
const AI_EMPTY_TITLE: &str = "Welcome to Free Speech AI";
const AI_EMPTY_BODY: &str = "Ask anything. No restrictions, no censorship. \
Just honest, open dialogue with an AI that believes in free expression.";
const AI_HINT: &str = "Press Enter to send • This AI believes in free speech and open dialogue";

/// Answer-service surface
pub struct AiChatView<'a> {
    state: &'a mut AiChatState,
    spinner: char,
}

impl<'a> AiChatView<'a> {
    pub fn new(state: &'a mut AiChatState, spinner: char) -> Self {
        Self { state, spinner }
    }

    pub fn render(self, frame: &mut Frame<'_>, area: Rect) {
        let layout = ChatLayout::calculate(area);
        render_header(frame, layout.header);

        self.state.scroll.observe(self.state.content_size());
        TranscriptView::new(&self.state.transcript, EmptyState::new(AI_EMPTY_TITLE).with_body(AI_EMPTY_BODY))
            .indicator(self.spinner, "Thinking...")
            .render(frame, layout.transcript, &mut self.state.scroll);

        InputBox::new(self.state.transcript.composer(), AI_PLACEHOLDER)
            .disabled(self.state.transcript.is_pending())
            .render(frame, layout.compose);

        let hint = Paragraph::new(Line::from(Span::styled(AI_HINT, Theme::muted()))).style(Theme::base());
        frame.render_widget(hint, layout.hint);
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect) {
    let accent = Theme::mode_color("ai-chat");
    let line = Line::from(vec![
        Span::styled(AI_TITLE, Style::default().fg(accent).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Theme::badge("Uncensored", accent),
    ]);
    let block = Block::default().borders(Borders::ALL).border_style(Theme::border()).style(Theme::base());
    frame.render_widget(Paragraph::new(line).block(block), area);
}
