use crate::{
    components::{AiChatView, TabBar, WelcomeView, XmtpChatView},
    layout::ShellLayout,
    state::{AppState, ViewMode},
    theme::Theme,
};

use ratatui::{Frame, widgets::Block};

/// Render the page for the current view
pub fn render(frame: &mut Frame<'_>, state: &mut AppState) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Theme::base()), area);

    if state.view == ViewMode::Welcome {
        WelcomeView::new(&state.welcome, area).render(frame);
        return;
    }

    let layout = ShellLayout::calculate(area);
    TabBar::new(state.view).render(frame, layout.tabs);

    let spinner = state.spinner_frame();
    match state.view {
        ViewMode::AiChat => AiChatView::new(&mut state.ai, spinner).render(frame, layout.body),
        ViewMode::XmtpChat => {
            if let Some(xmtp) = state.xmtp.as_mut() {
                XmtpChatView::new(xmtp, spinner, layout.mode).render(frame, layout.body);
            }
        }
        ViewMode::Welcome => {}
    }
}
