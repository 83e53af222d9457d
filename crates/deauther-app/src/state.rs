//! Per-application run state.

use crate::EngineError;

/// State owned by one running menu application.
///
/// Every suspending [`crate::Console`] call takes `&mut AppRunState`, so a
/// run cannot suspend without threading its stop flag through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppRunState {
    stop_requested: bool,
    booted: bool,
}

impl AppRunState {
    /// Fresh state: not stopped, not booted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new run. `booted` survives across runs.
    pub fn begin_run(&mut self) {
        self.stop_requested = false;
    }

    /// Ask the run to stop at its next check.
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    /// Whether a stop was requested.
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Whether the one-time boot sequence has been shown.
    pub fn booted(&self) -> bool {
        self.booted
    }

    /// Record that boot completed.
    pub fn mark_booted(&mut self) {
        self.booted = true;
    }

    /// `Err(Stopped)` once a stop was requested.
    pub fn ensure_running(&self) -> Result<(), EngineError> {
        if self.stop_requested { Err(EngineError::Stopped) } else { Ok(()) }
    }
}

/// States of the menu state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    /// One-time boot banners.
    Boot,
    /// Option banner, then pause.
    MainMenu,
    /// Prompt for an option.
    AwaitOption,
    /// Run the option at this zero-based index.
    RunningAction(usize),
    /// Report an invalid token and re-prompt.
    InvalidOption,
    /// Clear the screen and end the run.
    Exit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_run_clears_stop_but_keeps_boot() {
        let mut state = AppRunState::new();
        state.mark_booted();
        state.request_stop();
        assert!(state.ensure_running().is_err());

        state.begin_run();
        assert!(state.ensure_running().is_ok());
        assert!(state.booted());
    }
}
