use crate::{
    components::{EmptyState, InputBox, TranscriptView, transcript::render_empty_state},
    layout::{ChatLayout, LayoutMode, SidebarSections, XmtpLayout, centered},
    state::{XmtpChatState, XmtpFocus},
    theme::Theme,
};

use duet_messaging::ConnectState;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

pub const XMTP_TITLE: &str = "Decentralized Chat";
pub const CONNECT_TITLE: &str = "Connect Your Wallet";
const CONNECT_BODY: &str = "To use decentralized messaging, connect your Ethereum wallet. \
Messages are encrypted and censorship-resistant.";
pub const PEER_PLACEHOLDER: &str = "0x... wallet address";
pub const COMPOSE_PLACEHOLDER: &str = "Type your message... decentralized and uncensorable";
const COMPOSE_FOOTER: &str = "Messages are encrypted and stored on XMTP's decentralized network";
const NO_CONVERSATIONS: &str = "No conversations yet";
const NO_MESSAGES: &str = "No messages yet. Start the conversation!";
const NO_SELECTION_TITLE: &str = "Select a conversation to start chatting";
const NO_SELECTION_BODY: &str = "Or start a new DM using the wallet address of a friend.";

/// Decentralized messaging surface
///
/// Shows the connect view until a client exists, then the conversation
/// sidebar beside the selected conversation.
pub struct XmtpChatView<'a> {
    state: &'a mut XmtpChatState,
    spinner: char,
    mode: LayoutMode,
}

impl<'a> XmtpChatView<'a> {
    pub fn new(state: &'a mut XmtpChatState, spinner: char, mode: LayoutMode) -> Self {
        Self { state, spinner, mode }
    }

    pub fn render(self, frame: &mut Frame<'_>, area: Rect) {
        if self.state.is_connected() {
            self.render_connected(frame, area);
        } else {
            self.render_connect(frame, area);
        }
    }

    fn render_connect(&self, frame: &mut Frame<'_>, area: Rect) {
        frame.render_widget(Block::default().style(Theme::base()), area);
        let card = centered(area, 64, 13);
        let accent = Theme::mode_color("xmtp-chat");

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(accent))
            .style(Theme::base());

        let state = self.state.session.state();
        let button = if state.is_connecting() {
            Line::from(vec![
                Span::styled(format!("{} ", self.spinner), Style::default().fg(accent)),
                Span::styled("Connecting...", Theme::muted()),
            ])
        } else {
            Line::from(Theme::badge("Connect Wallet", accent))
        };

        let mut lines = vec![
            Line::default(),
            Line::from(Span::styled(CONNECT_TITLE, Theme::title())),
            Line::default(),
            Line::from(Span::raw(CONNECT_BODY)),
            Line::default(),
            button,
            Line::default(),
        ];
        match state {
            ConnectState::Failed { message } => {
                lines.push(Line::from(Span::styled(format!("Error: {}", message), Theme::error())));
            }
            ConnectState::Connected { .. } => {
                if let Some(success) = self.state.session.success_message() {
                    lines.push(Line::from(Span::styled(format!("Success: {}", success), Theme::success())));
                }
            }
            ConnectState::Disconnected | ConnectState::Connecting => {}
        }
        if !state.is_connecting() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled("Press Enter to connect", Theme::muted())));
        }

        let paragraph = Paragraph::new(Text::from(lines))
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, card);
    }

    fn render_connected(self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);
        self.render_header(frame, chunks[0]);

        let layout = XmtpLayout::calculate(chunks[1], self.mode);
        self.render_sidebar(frame, layout.sidebar);
        self.render_chat(frame, layout.chat);
    }

    fn render_header(&self, frame: &mut Frame<'_>, area: Rect) {
        let accent = Theme::mode_color("xmtp-chat");
        let mut spans = vec![
            Span::styled(XMTP_TITLE, Style::default().fg(accent).add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Theme::badge("On-Chain", accent),
        ];
        if let Some(success) = self.state.session.success_message() {
            spans.push(Span::styled(format!("  {}", success), Theme::muted()));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border())
            .style(Theme::base())
            .title_top(
                Line::from(vec![
                    Span::styled(" Ctrl+D ", Style::default().fg(Theme::BLUE)),
                    Span::styled("Disconnect ", Theme::muted()),
                ])
                .right_aligned(),
            );
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn render_sidebar(&self, frame: &mut Frame<'_>, area: Rect) {
        let sections = SidebarSections::new(area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(3), Constraint::Length(1)])
            .split(sections.new_dm);
        frame.render_widget(
            Paragraph::new(Span::styled(" Start New Conversation:", Theme::muted())).style(Theme::base()),
            rows[0],
        );
        InputBox::new(&self.state.peer_input, PEER_PLACEHOLDER)
            .title("Enter: Start")
            .focused(self.state.focus == XmtpFocus::PeerInput)
            .render(frame, rows[1]);
        if let Some(error) = &self.state.dm_error {
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" {}", error), Theme::error())).style(Theme::base()),
                rows[2],
            );
        }

        let refresh = if self.state.loading_conversations {
            Line::from(vec![
                Span::styled(format!(" {} ", self.spinner), Style::default().fg(Theme::GREEN)),
                Span::styled("Syncing...", Theme::muted()),
            ])
        } else {
            Line::from(vec![
                Span::styled(" Ctrl+R ", Style::default().fg(Theme::BLUE)),
                Span::styled("Refresh Conversations", Theme::muted()),
            ])
        };
        frame.render_widget(Paragraph::new(refresh).style(Theme::base()), sections.refresh);

        self.render_conversation_list(frame, sections.list);
    }

    fn render_conversation_list(&self, frame: &mut Frame<'_>, area: Rect) {
        let focused = self.state.focus == XmtpFocus::Conversations;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if focused { Theme::border_focused() } else { Theme::border() })
            .style(Theme::base())
            .title(Span::styled(" Conversations ", Theme::title()));

        if self.state.conversations.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new(Span::styled(NO_CONVERSATIONS, Theme::muted()))
                    .alignment(Alignment::Center)
                    .style(Theme::base()),
                inner,
            );
            return;
        }

        let selected_id = self.state.selected_id();
        let items: Vec<ListItem<'static>> = self
            .state
            .conversations
            .iter()
            .map(|conversation| {
                let style = if Some(&conversation.id) == selected_id { Theme::active() } else { Theme::base() };
                ListItem::new(Line::from(Span::raw(conversation.label()))).style(style)
            })
            .collect();

        let highlight = if focused {
            Style::default().fg(Theme::GREEN).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let list = List::new(items).block(block).highlight_symbol("▸ ").highlight_style(highlight);

        let mut list_state = ListState::default().with_selected(Some(self.state.list_cursor));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_chat(self, frame: &mut Frame<'_>, area: Rect) {
        let layout = ChatLayout::calculate(area);
        let state = self.state;

        let title = state
            .selected
            .as_ref()
            .map(|c| c.title())
            .unwrap_or_else(|| "No conversation selected".to_string());
        let block = Block::default().borders(Borders::ALL).border_style(Theme::border()).style(Theme::base());
        frame.render_widget(Paragraph::new(Span::styled(title, Theme::title())).block(block), layout.header);

        if state.selected.is_none() {
            let block = Block::default().borders(Borders::ALL).border_style(Theme::border()).style(Theme::base());
            let inner = block.inner(layout.transcript);
            frame.render_widget(block, layout.transcript);
            render_empty_state(frame, inner, EmptyState::new(NO_SELECTION_TITLE).with_body(NO_SELECTION_BODY));
        } else if state.loading_messages {
            let block = Block::default().borders(Borders::ALL).border_style(Theme::border()).style(Theme::base());
            let inner = block.inner(layout.transcript);
            frame.render_widget(block, layout.transcript);
            let loading = Line::from(vec![
                Span::styled(format!("{} ", self.spinner), Style::default().fg(Theme::GREEN)),
                Span::styled("Loading messages...", Theme::muted()),
            ]);
            frame.render_widget(Paragraph::new(loading).alignment(Alignment::Center), inner);
        } else {
            state.scroll.observe(state.content_size());
            TranscriptView::new(&state.transcript, EmptyState::new(NO_MESSAGES))
                .indicator(self.spinner, "Sending...")
                .render(frame, layout.transcript, &mut state.scroll);
        }

        InputBox::new(state.transcript.composer(), COMPOSE_PLACEHOLDER)
            .focused(state.focus == XmtpFocus::Compose)
            .disabled(state.selected.is_none() || state.transcript.is_pending())
            .render(frame, layout.compose);

        frame.render_widget(
            Paragraph::new(Span::styled(COMPOSE_FOOTER, Theme::muted())).style(Theme::base()),
            layout.hint,
        );
    }
}
