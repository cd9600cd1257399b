use super::ViewMode;

/// Feature cards on the welcome page, in display order
pub const CARDS: [ViewMode; 2] = [ViewMode::AiChat, ViewMode::XmtpChat];

/// Card selection on the welcome page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WelcomeState {
    selected: usize,
}

impl WelcomeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> ViewMode {
        CARDS[self.selected]
    }

    pub fn is_selected(&self, mode: ViewMode) -> bool {
        self.selected() == mode
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % CARDS.len();
    }

    pub fn prev(&mut self) {
        self.selected = (self.selected + CARDS.len() - 1) % CARDS.len();
    }

    pub fn select(&mut self, mode: ViewMode) {
        if let Some(index) = CARDS.iter().position(|m| *m == mode) {
            self.selected = index;
        }
    }
}
