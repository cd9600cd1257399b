use crate::{
    layout::{LayoutMode, WelcomeLayout},
    state::{CARDS, ViewMode, WelcomeState},
    theme::Theme,
};

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

const HERO_KICKER: &str = "Truly Uninhibited";
const HERO_TITLE: &str = "Free Speech AI";
const HERO_TEXT: &str = "Experience unrestricted dialogue with AI that believes in open expression. \
Plus, communicate through censorship-resistant decentralized messaging. \
No limits. No restrictions. Just pure, authentic conversation.";
const HERO_BADGES: [&str; 3] = ["Uncensored AI", "Decentralized", "Censorship Resistant"];

const PHILOSOPHY_TITLE: &str = "Our Philosophy";
const PHILOSOPHY_TEXT: &str = "We believe in the fundamental right to free expression and open dialogue. \
In a world of increasing censorship and content restrictions, we provide platforms for truly uninhibited \
conversation, whether with AI that doesn't judge or censor, or through decentralized networks that can't be \
controlled by any single authority.";
const PHILOSOPHY_BADGES: [&str; 4] = ["Free Speech", "Decentralization", "Privacy", "Uncensored"];

/// Copy of one feature card
struct Card {
    title: &'static str,
    summary: &'static str,
    bullets: [&'static str; 3],
    badge: &'static str,
}

fn card(mode: ViewMode) -> Card {
    match mode {
        ViewMode::XmtpChat => Card {
            title: "Decentralized Messaging",
            summary: "Truly censorship-resistant messaging powered by XMTP protocol.",
            bullets: [
                "End-to-end encrypted conversations",
                "Decentralized network storage",
                "Wallet-to-wallet communication",
            ],
            badge: "Censorship Resistant & Private",
        },
        _ => Card {
            title: "AI Free Speech Chat",
            summary: "Chat with an AI that believes in unrestricted dialogue and authentic responses.",
            bullets: [
                "No content restrictions or excessive warnings",
                "Honest, direct responses to any question",
                "Powered by Perplexity AI with citations",
            ],
            badge: "Uncensored & Authentic",
        },
    }
}

/// Landing page: hero, two selectable feature cards, philosophy card
pub struct WelcomeView<'a> {
    state: &'a WelcomeState,
    layout: WelcomeLayout,
}

impl<'a> WelcomeView<'a> {
    pub fn new(state: &'a WelcomeState, area: Rect) -> Self {
        let mode = LayoutMode::from(area.width);
        Self { state, layout: WelcomeLayout::calculate(area, mode) }
    }

    pub fn render(&self, frame: &mut Frame<'_>) {
        frame.render_widget(Block::default().style(Theme::base()), frame.area());

        self.render_hero(frame, self.layout.hero);
        for (index, mode) in CARDS.iter().enumerate() {
            if let Some(area) = self.layout.cards.get(index) {
                self.render_card(frame, *area, *mode, index + 1);
            }
        }
        self.render_philosophy(frame, self.layout.philosophy);
        self.render_hints(frame, self.layout.hints);
    }

    fn render_hero(&self, frame: &mut Frame<'_>, area: Rect) {
        let lines = vec![
            Line::default(),
            Line::from(Span::styled(HERO_KICKER, Style::default().fg(Theme::PURPLE).add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(HERO_TITLE, Style::default().fg(Theme::BLUE).add_modifier(Modifier::BOLD))),
            Line::default(),
            Line::from(Span::styled(HERO_TEXT, Theme::base())),
            Line::default(),
            badge_line(&HERO_BADGES, &[Theme::YELLOW, Theme::GREEN, Theme::PURPLE]),
        ];

        let paragraph = Paragraph::new(Text::from(lines))
            .style(Theme::base())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_card(&self, frame: &mut Frame<'_>, area: Rect, mode: ViewMode, number: usize) {
        let card = card(mode);
        let selected = self.state.is_selected(mode);
        let accent = Theme::mode_color(mode.as_str());

        let (border_style, border_type) = if selected {
            (Style::default().fg(accent), BorderType::Thick)
        } else {
            (Theme::border(), BorderType::Rounded)
        };
        let marker = if selected { "▸ " } else { "  " };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(border_style)
            .style(if selected { Theme::active() } else { Theme::base() })
            .title(Span::styled(
                format!(" {}{} ", marker, card.title),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ))
            .title_bottom(Line::from(Span::styled(format!(" {} to open ", number), Theme::muted())).right_aligned());

        let mut lines = vec![Line::from(Span::raw(card.summary)), Line::default()];
        for bullet in card.bullets {
            lines.push(Line::from(vec![
                Span::styled("• ", Style::default().fg(accent)),
                Span::raw(bullet),
            ]));
        }
        lines.push(Line::default());
        lines.push(Line::from(Theme::badge(card.badge, accent)));

        let paragraph = Paragraph::new(Text::from(lines)).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_philosophy(&self, frame: &mut Frame<'_>, area: Rect) {
        if area.height < 3 {
            return;
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border())
            .style(Theme::base())
            .title(Span::styled(format!(" {} ", PHILOSOPHY_TITLE), Theme::title()));

        let badges: Vec<Span<'static>> = PHILOSOPHY_BADGES.iter().map(|b| Theme::outline_badge(b)).collect();
        let lines = vec![
            Line::from(Span::raw(PHILOSOPHY_TEXT)),
            Line::default(),
            Line::from(join_spans(badges)),
        ];

        let paragraph = Paragraph::new(Text::from(lines))
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_hints(&self, frame: &mut Frame<'_>, area: Rect) {
        let key = Style::default().fg(Theme::BLUE);
        let line = Line::from(vec![
            Span::styled("←/→", key),
            Span::styled(" choose  ", Theme::muted()),
            Span::styled("Enter", key),
            Span::styled(" open  ", Theme::muted()),
            Span::styled("q", key),
            Span::styled(" quit", Theme::muted()),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center).style(Theme::base()), area);
    }
}

fn badge_line(labels: &[&str], colors: &[ratatui::style::Color]) -> Line<'static> {
    let badges = labels
        .iter()
        .zip(colors.iter().cycle())
        .map(|(label, color)| Theme::badge(label, *color))
        .collect();
    Line::from(join_spans(badges))
}

fn join_spans(spans: Vec<Span<'static>>) -> Vec<Span<'static>> {
    let mut joined = Vec::with_capacity(spans.len() * 2);
    for (index, span) in spans.into_iter().enumerate() {
        if index > 0 {
            joined.push(Span::raw("  "));
        }
        joined.push(span);
    }
    joined
}
