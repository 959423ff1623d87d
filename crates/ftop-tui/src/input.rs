//! Keyboard and resize input, polled by the dashboard loop.
//!
//! Nothing here blocks or runs on its own: each tick drains whatever the
//! terminal has queued and folds it into one [`InputPoll`]. Only the last
//! resize of a burst survives.

use std::time::Duration;

use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use tracing::{debug, warn};

/// Input that matters to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Terminal is now `cols` × `rows`.
    Resize { cols: u16, rows: u16 },
    Interrupt,
}

impl InputEvent {
    /// Map a terminal event; anything the dashboard ignores is `None`.
    pub fn from_terminal(event: &CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if is_interrupt(key) => Some(Self::Interrupt),
            CrosstermEvent::Resize(cols, rows) => Some(Self::Resize {
                cols: *cols,
                rows: *rows,
            }),
            _ => None,
        }
    }
}

/// Everything that arrived since the last poll, folded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputPoll {
    /// Latest size, if any resize happened. Earlier sizes are stale.
    pub resized: Option<(u16, u16)>,
    pub interrupt: bool,
}

impl InputPoll {
    pub fn fold(&mut self, event: InputEvent) {
        match event {
            InputEvent::Resize { cols, rows } => self.resized = Some((cols, rows)),
            InputEvent::Interrupt => self.interrupt = true,
        }
    }

    /// Fold a batch of raw terminal events in arrival order.
    pub fn from_terminal_events<'a>(
        events: impl IntoIterator<Item = &'a CrosstermEvent>,
    ) -> Self {
        let mut poll = Self::default();
        for event in events {
            if let Some(event) = InputEvent::from_terminal(event) {
                poll.fold(event);
            }
        }
        poll
    }
}

/// Non-blocking source of input for the scheduler.
pub trait InputSource: Send {
    fn poll(&mut self) -> InputPoll;
}

/// Whether a key press asks to quit. In raw mode Ctrl-C arrives as a key.
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && match key.code {
            KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
            KeyCode::Char('q') => true,
            _ => false,
        }
}

/// The real terminal. Reads only what is already queued.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl TerminalInput {
    fn drain() -> Vec<CrosstermEvent> {
        let mut events = Vec::new();
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    warn!(error = %err, "terminal event poll failed");
                    break;
                }
            }
            match event::read() {
                Ok(event) => events.push(event),
                Err(err) => {
                    warn!(error = %err, "terminal event read failed");
                    break;
                }
            }
        }
        events
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> InputPoll {
        let events = Self::drain();
        let poll = InputPoll::from_terminal_events(&events);
        if poll != InputPoll::default() {
            debug!(queued = events.len(), ?poll, "terminal input");
        }
        poll
    }
}
