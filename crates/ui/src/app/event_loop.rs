use super::App;
use crate::event_handler::EventHandler;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::Result;
use std::{panic, time::Duration};

pub async fn run(app: &mut App) -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let backend = CrosstermBackend::new(std::io::stdout());
        if let Ok(mut terminal) = Terminal::new(backend) {
            let _ = terminal.show_cursor();
        }
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    terminal.clear()?;
    app.draw(&mut terminal)?;

    while !app.should_exit() {
        let tui_poll = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            EventHandler::read()
        };

        tokio::select! {
            maybe_event = tui_poll => {
                if let Some(event) = maybe_event {
                    app.handle_event(event).await;
                    app.draw(&mut terminal)?;
                } else if app.state().is_busy() {
                    app.state_mut().advance_tick();
                    app.draw(&mut terminal)?;
                }
            }
            maybe_app_event = app.next_app_event() => {
                if let Some(event) = maybe_app_event {
                    tracing::debug!(?event, "app event");
                    app.handle_app_event(event);
                    app.draw(&mut terminal)?;
                }
            }
        }
    }

    app.cancel_token.cancel();

    terminal.show_cursor()?;
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;

    Ok(())
}
