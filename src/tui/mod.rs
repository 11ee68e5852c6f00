//! Terminal User Interface module using ratatui

pub mod app;
pub mod dialogs;
pub mod events;
pub mod snapshot;
pub mod theme;
pub mod tokens;

pub use app::App;
pub use events::{Event, EventHandler};

use crate::config::HostConfig;
use anyhow::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::time::Duration;
use tracing::info;

pub type Backend = CrosstermBackend<io::Stdout>;
pub type Frame<'a> = ratatui::Frame<'a>;

/// Initialize the terminal for TUI mode
pub fn init_terminal(mouse: bool) -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the interactive token screen until the user quits
pub async fn run(config: &HostConfig) -> Result<()> {
    info!("Starting interactive mode");

    let mut terminal = init_terminal(config.mouse)?;
    let mut app = App::new(config);
    let mut event_handler = EventHandler::new(Duration::from_millis(config.tick_rate_ms));

    let result = run_app(&mut terminal, &mut app, &mut event_handler).await;

    restore_terminal(&mut terminal)?;
    info!("Interactive mode finished");
    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    event_handler: &mut EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        let event = event_handler.next().await?;
        if app.handle_event(event)? {
            break; // Exit requested
        }
    }
    Ok(())
}
