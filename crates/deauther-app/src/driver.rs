//! Driver trait for abstracting terminal I/O.
//!
//! The [`Driver`] trait decouples the engine from specific I/O
//! implementations. Each frontend implements it to provide platform key input
//! and rendering, while the generic [`crate::Console`] and
//! [`crate::Runtime`] handle all orchestration.

use std::future::Future;

use crate::{KeyEvent, Screen};

/// Abstracts terminal I/O for the engine.
///
/// # Implementations
///
/// - **TUI**: crossterm key events, ratatui rendering
/// - **Simulation**: scripted keys on virtual time, recorded renders
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Wait for the next key press.
    ///
    /// Returns `Ok(None)` once input is closed for good.
    ///
    /// # Cancel safety
    ///
    /// The engine races this future against timers and drops it when a
    /// timer wins. Implementations MUST NOT lose a key when dropped before
    /// completion.
    fn poll_key(&mut self) -> impl Future<Output = Result<Option<KeyEvent>, Self::Error>> + Send;

    /// Render the screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the output device fails.
    fn render(&mut self, screen: &Screen) -> Result<(), Self::Error>;

    /// Release platform resources.
    fn stop(&mut self);
}
