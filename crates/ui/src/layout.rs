use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout breakpoints for responsive TUI
///
/// Based on terminal width, we render different layouts:
/// - >= 100 cols: wide sidebar, side-by-side welcome cards
/// - 80-99 cols: narrow sidebar, side-by-side welcome cards
/// - < 80 cols: sidebar stacked above the chat, cards stacked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Full,
    Medium,
    Compact,
}

impl From<u16> for LayoutMode {
    fn from(width: u16) -> Self {
        match width {
            w if w >= 100 => Self::Full,
            w if w >= 80 => Self::Medium,
            _ => Self::Compact,
        }
    }
}

impl LayoutMode {
    /// Width of the conversation sidebar when shown beside the chat
    pub fn sidebar_width(&self) -> Option<u16> {
        match self {
            Self::Full => Some(34),
            Self::Medium => Some(28),
            Self::Compact => None,
        }
    }

    pub fn cards_side_by_side(&self) -> bool {
        !matches!(self, Self::Compact)
    }
}

/// Page shell for the chat views: tab strip on top, active surface below
#[derive(Debug, Clone, Copy)]
pub struct ShellLayout {
    pub mode: LayoutMode,
    pub tabs: Rect,
    pub body: Rect,
}

impl ShellLayout {
    pub fn calculate(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        Self { mode: LayoutMode::from(area.width), tabs: chunks[0], body: chunks[1] }
    }
}

/// One chat column: header, scrolling transcript, compose box, hint line
#[derive(Debug, Clone, Copy)]
pub struct ChatLayout {
    pub header: Rect,
    pub transcript: Rect,
    pub compose: Rect,
    pub hint: Rect,
}

impl ChatLayout {
    pub fn calculate(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);

        Self { header: chunks[0], transcript: chunks[1], compose: chunks[2], hint: chunks[3] }
    }
}

/// Messaging surface once connected: sidebar plus chat column
#[derive(Debug, Clone, Copy)]
pub struct XmtpLayout {
    pub sidebar: Rect,
    pub chat: Rect,
}

impl XmtpLayout {
    pub fn calculate(area: Rect, mode: LayoutMode) -> Self {
        match mode.sidebar_width() {
            Some(width) => {
                let chunks = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Length(width.min(area.width / 2)), Constraint::Min(0)])
                    .split(area);
                Self { sidebar: chunks[0], chat: chunks[1] }
            }
            None => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(12.min(area.height / 2)), Constraint::Min(0)])
                    .split(area);
                Self { sidebar: chunks[0], chat: chunks[1] }
            }
        }
    }
}

/// Sidebar sections: new-DM input, refresh control, conversation list
#[derive(Debug, Clone, Copy)]
pub struct SidebarSections {
    pub new_dm: Rect,
    pub refresh: Rect,
    pub list: Rect,
}

impl SidebarSections {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        Self { new_dm: chunks[0], refresh: chunks[1], list: chunks[2] }
    }
}

/// Welcome page: hero block, feature cards, philosophy card, key hints
#[derive(Debug, Clone)]
pub struct WelcomeLayout {
    pub hero: Rect,
    pub cards: Vec<Rect>,
    pub philosophy: Rect,
    pub hints: Rect,
}

impl WelcomeLayout {
    pub fn calculate(area: Rect, mode: LayoutMode) -> Self {
        let card_height = if mode.cards_side_by_side() { 10 } else { 16 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8),
                Constraint::Length(card_height),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let direction = if mode.cards_side_by_side() { Direction::Horizontal } else { Direction::Vertical };
        let cards = Layout::default()
            .direction(direction)
            .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
            .split(chunks[1])
            .to_vec();

        Self { hero: chunks[0], cards, philosophy: chunks[2], hints: chunks[3] }
    }
}

/// Centered rectangle of at most `width` x `height` inside `area`
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
