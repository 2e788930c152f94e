//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. The relay connection is not
//! the driver's concern; it lives in the session's transport.

use std::io::{self, Stdout, stdout};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use roomchat_app::{App, AppEvent, Driver, KeyInput, TICK_INTERVAL};
use thiserror::Error;
use tokio::time::{Interval, MissedTickBehavior};

use crate::ui;

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal driver implementing the [`Driver`] trait.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    ticks: Interval,
    active: bool,
}

impl TerminalDriver {
    /// Enter raw mode and the alternate screen.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        let mut ticks = tokio::time::interval(TICK_INTERVAL);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Ok(Self { terminal, event_stream: EventStream::new(), ticks, active: true })
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Tab | KeyCode::BackTab => Some(KeyInput::Tab),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::PageUp => Some(KeyInput::PageUp),
            KeyCode::PageDown => Some(KeyInput::PageDown),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }

    /// Map a terminal event. `Err(())` means the user asked to quit.
    fn convert_event(event: Event) -> Result<Option<AppEvent>, ()> {
        match event {
            Event::Key(KeyEvent { kind: KeyEventKind::Press, code, modifiers, .. }) => {
                if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
                    return Err(());
                }
                Ok(Self::convert_key(code).map(AppEvent::Key))
            },
            Event::Resize(cols, rows) => Ok(Some(AppEvent::Resize(cols, rows))),
            _ => Ok(None),
        }
    }

    fn restore(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        loop {
            tokio::select! {
                biased;

                maybe_event = self.event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => match Self::convert_event(event) {
                            Ok(Some(event)) => return Ok(Some(event)),
                            Ok(None) => {},
                            Err(()) => return Ok(None),
                        },
                        Some(Err(e)) => return Err(TerminalError::Io(e)),
                        None => return Ok(None),
                    }
                }

                _ = self.ticks.tick() => return Ok(Some(AppEvent::Tick)),
            }
        }
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::render(frame, app))?;
        Ok(())
    }

    fn stop(&mut self) {
        self.restore();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.restore();
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn maps_navigation_keys() {
        assert_eq!(TerminalDriver::convert_key(KeyCode::PageUp), Some(KeyInput::PageUp));
        assert_eq!(TerminalDriver::convert_key(KeyCode::BackTab), Some(KeyInput::Tab));
        assert_eq!(TerminalDriver::convert_key(KeyCode::F(1)), None);
    }

    #[test]
    fn ctrl_c_ends_input() {
        assert_eq!(
            TerminalDriver::convert_event(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Err(())
        );
        assert_eq!(
            TerminalDriver::convert_event(press(KeyCode::Char('c'), KeyModifiers::NONE)),
            Ok(Some(AppEvent::Key(KeyInput::Char('c'))))
        );
    }

    #[test]
    fn release_events_are_ignored() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });

        assert_eq!(TerminalDriver::convert_event(release), Ok(None));
        assert_eq!(
            TerminalDriver::convert_event(Event::Resize(100, 40)),
            Ok(Some(AppEvent::Resize(100, 40)))
        );
    }
}
