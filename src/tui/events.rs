use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::time::Duration;

/// Application events
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Mouse input event
    Mouse(MouseEvent),

    /// Terminal resize event
    Resize(u16, u16),

    /// Periodic tick event
    Tick,
}

/// Event handler for terminal input
pub struct EventHandler {
    /// Tick interval for periodic events
    tick_interval: Duration,
}

impl EventHandler {
    pub fn new(tick_interval: Duration) -> Self {
        Self { tick_interval }
    }

    /// Wait for the next terminal event, or a tick when none arrives in time
    pub async fn next(&mut self) -> Result<Event> {
        let tick_interval = self.tick_interval;
        let polled = tokio::task::spawn_blocking(move || -> Result<Option<CrosstermEvent>> {
            if crossterm::event::poll(tick_interval)? {
                Ok(Some(crossterm::event::read()?))
            } else {
                Ok(None)
            }
        })
        .await??;

        Ok(polled
            .and_then(Self::convert_crossterm_event)
            .unwrap_or(Event::Tick))
    }

    /// Convert crossterm events to application events
    fn convert_crossterm_event(event: CrosstermEvent) -> Option<Event> {
        match event {
            // Windows reports releases too; only presses drive the UI
            CrosstermEvent::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                Some(Event::Key(key_event))
            }
            CrosstermEvent::Key(_) => None,
            CrosstermEvent::Mouse(mouse_event) => Some(Event::Mouse(mouse_event)),
            CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
            CrosstermEvent::FocusGained | CrosstermEvent::FocusLost | CrosstermEvent::Paste(_) => None,
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}
