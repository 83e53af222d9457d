//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering.

use std::io::{self, Stdout, stdout};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use deauther_app::{Driver, InterruptHub, KeyCombo, KeyEvent, KeyInput, Modifiers, Screen};
use deauther_core::StatusBoard;
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;

use crate::ui;

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Raw mode and the alternate screen are entered on construction and left
/// on drop.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    hub: InterruptHub,
    board: StatusBoard,
    last: Option<Screen>,
}

impl TerminalDriver {
    /// Take over the terminal.
    ///
    /// `hub` tells the driver whether a run is listening for the interrupt
    /// combination; when nobody is, Ctrl+C closes input and ends the shell.
    pub fn new(hub: InterruptHub, board: StatusBoard) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();

        Ok(Self { terminal, event_stream, hub, board, last: None })
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Tab => Some(KeyInput::Tab),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }

    fn convert_modifiers(modifiers: KeyModifiers) -> Modifiers {
        Modifiers {
            ctrl: modifiers.contains(KeyModifiers::CONTROL),
            alt: modifiers.contains(KeyModifiers::ALT),
            shift: modifiers.contains(KeyModifiers::SHIFT),
        }
    }

    fn draw(&mut self, screen: &Screen) -> Result<(), TerminalError> {
        let fast = self.board.fast_mode();
        let armed = self.hub.armed();
        self.terminal.draw(|frame| ui::render(frame, screen, ui::StatusView { fast, armed }))?;
        Ok(())
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_key(&mut self) -> Result<Option<KeyEvent>, Self::Error> {
        loop {
            match self.event_stream.next().await {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    let Some(input) = Self::convert_key(key.code) else {
                        continue;
                    };
                    let event =
                        KeyEvent { key: input, modifiers: Self::convert_modifiers(key.modifiers) };

                    // Default action of the terminal: Ctrl+C ends the host
                    // unless a run is listening for it.
                    if !self.hub.armed() && KeyCombo::ctrl('c').matches(&event) {
                        tracing::info!("ctrl+c with no listener, closing input");
                        return Ok(None);
                    }
                    return Ok(Some(event));
                },
                Some(Ok(Event::Resize(..))) => {
                    if let Some(screen) = self.last.take() {
                        let result = self.draw(&screen);
                        self.last = Some(screen);
                        result?;
                    }
                },
                Some(Ok(_)) => {},
                Some(Err(e)) => return Err(TerminalError::Io(e)),
                None => return Ok(None),
            }
        }
    }

    fn render(&mut self, screen: &Screen) -> Result<(), Self::Error> {
        self.draw(screen)?;
        self.last = Some(screen.clone());
        Ok(())
    }

    fn stop(&mut self) {
        let _ = self.terminal.show_cursor();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
