use crate::{state::ScrollState, theme::Theme};

use duet_core::{Author, Transcript, TranscriptEntry};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

/// Text shown in place of an empty transcript
#[derive(Debug, Clone, Copy)]
pub struct EmptyState<'a> {
    pub title: &'a str,
    pub body: Option<&'a str>,
}

impl<'a> EmptyState<'a> {
    pub fn new(title: &'a str) -> Self {
        Self { title, body: None }
    }

    pub fn with_body(mut self, body: &'a str) -> Self {
        self.body = Some(body);
        self
    }
}

/// Transcript rendered as chat bubbles
///
/// Local entries hug the right edge, remote entries the left. Each bubble is
/// followed by its `HH:MM` time and, for answers, a numbered source list.
pub struct TranscriptView<'a> {
    transcript: &'a Transcript,
    empty: EmptyState<'a>,
    indicator: Option<(char, &'a str)>,
}

impl<'a> TranscriptView<'a> {
    pub fn new(transcript: &'a Transcript, empty: EmptyState<'a>) -> Self {
        Self { transcript, empty, indicator: None }
    }

    /// Show `label` behind a spinner frame while the transcript is pending
    pub fn indicator(mut self, frame: char, label: &'a str) -> Self {
        self.indicator = Some((frame, label));
        self
    }

    /// Render into `area`, clamping `scroll` to the rendered content
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, scroll: &mut ScrollState) {
        let block = Block::default().borders(Borders::ALL).border_style(Theme::border()).style(Theme::base());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.transcript.is_empty() && !self.transcript.is_pending() {
            render_empty_state(frame, inner, self.empty);
            return;
        }

        let lines = self.lines(inner.width as usize);
        let height = inner.height as usize;
        let start = scroll.window_start(lines.len(), height);
        let visible: Vec<Line<'static>> = lines.into_iter().skip(start).take(height).collect();

        frame.render_widget(Paragraph::new(Text::from(visible)).style(Theme::base()), inner);
    }

    /// All transcript lines for a viewport `width` columns wide
    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for entry in self.transcript.entries() {
            render_entry(entry, width, &mut lines);
        }

        if self.transcript.is_pending()
            && let Some((spinner, label)) = self.indicator
        {
            lines.push(Line::from(vec![
                Span::styled(format!(" {} ", spinner), Style::default().fg(Theme::YELLOW)),
                Span::styled(label.to_string(), Theme::muted()),
            ]));
        }
        lines
    }
}

/// Widest bubble text for a viewport: three quarters of it, minus padding
fn bubble_width(width: usize) -> usize {
    (width * 3 / 4).saturating_sub(2).max(1)
}

fn render_entry(entry: &TranscriptEntry, width: usize, lines: &mut Vec<Line<'static>>) {
    let alignment = match entry.author {
        Author::Local => Alignment::Right,
        Author::Remote => Alignment::Left,
    };
    let style = if entry.is_error {
        Theme::error_bubble()
    } else if entry.is_local() {
        Theme::local_bubble()
    } else {
        Theme::remote_bubble()
    };

    let wrapped = wrap(&entry.content, bubble_width(width));
    let inner_width = wrapped.iter().map(|l| l.width()).max().unwrap_or(0);

    lines.push(Line::default());
    for text in wrapped {
        let pad = inner_width.saturating_sub(text.width());
        let padded = format!(" {}{} ", text, " ".repeat(pad));
        lines.push(Line::from(Span::styled(padded, style)).alignment(alignment));
    }

    if let Some(citations) = entry.citations.as_deref().filter(|c| !c.is_empty()) {
        lines.push(Line::from(Span::styled(" Sources:", Theme::muted().add_modifier(Modifier::BOLD))).alignment(alignment));
        for (index, url) in citations.iter().enumerate() {
            lines.push(
                Line::from(vec![
                    Span::styled(
                        format!(" Source {}", index + 1),
                        Style::default().fg(Theme::CYAN).add_modifier(Modifier::UNDERLINED),
                    ),
                    Span::styled(format!(" {}", url), Theme::muted()),
                ])
                .alignment(alignment),
            );
        }
    }

    lines.push(Line::from(Span::styled(format!(" {} ", entry.time_label()), Theme::muted())).alignment(alignment));
}

/// Word-wrap `text`. Lines that fit, and whitespace-only lines, are kept
/// verbatim; only overlong lines go through the word wrapper.
fn wrap(text: &str, width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| {
            if line.width() <= width || line.trim().is_empty() {
                vec![line.to_string()]
            } else {
                textwrap::wrap(line, width).into_iter().map(|l| l.into_owned()).collect()
            }
        })
        .collect()
}

pub(crate) fn render_empty_state(frame: &mut Frame<'_>, area: Rect, empty: EmptyState<'_>) {
    let mut lines = Vec::new();
    let top = area.height.saturating_sub(3) / 2;
    for _ in 0..top {
        lines.push(Line::default());
    }
    lines.push(Line::from(Span::styled(empty.title.to_string(), Theme::title())));
    if let Some(body) = empty.body {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(body.to_string(), Theme::muted())));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .style(Theme::base())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
