use std::io;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};

/// Application events produced by the event loop.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}

/// Poll for the next event with a timeout. A quiet poll window becomes a
/// Tick, which drives the widget debounce. Key release/repeat events are
/// dropped so text input does not double on terminals that report them.
pub fn poll_event(tick_rate: Duration) -> io::Result<Option<AppEvent>> {
    if !event::poll(tick_rate)? {
        return Ok(Some(AppEvent::Tick));
    }
    match event::read()? {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
            Ok(Some(AppEvent::Key(key)))
        }
        CrosstermEvent::Key(_) => Ok(None),
        CrosstermEvent::Mouse(mouse) => Ok(Some(AppEvent::Mouse(mouse))),
        CrosstermEvent::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
        _ => Ok(None),
    }
}
