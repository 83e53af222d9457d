//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but plays
//! a scripted key sequence on virtual time and records every render. It
//! implements [`Driver`] so the same [`deauther_app::Runtime`] and
//! [`deauther_app::Console`] code runs in both production and simulation.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use deauther_app::{Driver, KeyEvent, KeyInput, Screen};
use tokio::time::Instant;

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// One scripted input step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Deliver a key.
    Key(KeyEvent),
    /// Deliver nothing for this long (virtual time).
    Wait(Duration),
}

/// Scripted key input.
#[derive(Debug, Clone, Default)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    /// Empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Type `text` without pressing Enter.
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.steps.extend(text.chars().map(|c| Step::Key(KeyEvent::char(c))));
        self
    }

    /// Type `text` and press Enter.
    #[must_use]
    pub fn line(self, text: &str) -> Self {
        self.text(text).key(KeyEvent::plain(KeyInput::Enter))
    }

    /// Press one key.
    #[must_use]
    pub fn key(mut self, key: KeyEvent) -> Self {
        self.steps.push(Step::Key(key));
        self
    }

    /// Pause input for `duration`.
    #[must_use]
    pub fn wait(mut self, duration: Duration) -> Self {
        self.steps.push(Step::Wait(duration));
        self
    }

    /// Scripted steps.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// Screen contents between two clears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Clear count when this page was drawn.
    pub epoch: u64,
    /// Lines on the page at its last render.
    pub lines: Vec<String>,
}

/// Shared state for script playback and render capture.
#[derive(Default)]
struct SharedState {
    script: VecDeque<Step>,
    deadline: Option<Instant>,
    pages: Vec<Page>,
    renders: usize,
    last: Option<Screen>,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
}

impl SimDriver {
    /// Create a driver that plays `script`.
    pub fn new(script: Script) -> Self {
        let state = SharedState { script: script.steps.into(), ..SharedState::default() };
        Self { state: Arc::new(Mutex::new(state)) }
    }

    /// Observation handle that outlives the driver.
    pub fn handle(&self) -> SimHandle {
        SimHandle { state: Arc::clone(&self.state) }
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    /// Cancel-safe: a `Wait` step keeps its deadline when the future is
    /// dropped, and keys are only removed from the script when returned.
    async fn poll_key(&mut self) -> Result<Option<KeyEvent>, Self::Error> {
        loop {
            let deadline = {
                let mut state = self.lock();
                match state.script.front().copied() {
                    None => return Ok(None),
                    Some(Step::Key(event)) => {
                        state.script.pop_front();
                        return Ok(Some(event));
                    },
                    Some(Step::Wait(duration)) => {
                        *state.deadline.get_or_insert_with(|| Instant::now() + duration)
                    },
                }
            };

            tokio::time::sleep_until(deadline).await;

            let mut state = self.lock();
            state.script.pop_front();
            state.deadline = None;
        }
    }

    fn render(&mut self, screen: &Screen) -> Result<(), Self::Error> {
        let mut state = self.lock();
        if state.stopped {
            return Err(SimDriverError("render after stop".into()));
        }

        state.renders += 1;
        let epoch = screen.epoch();
        let lines = screen.lines().to_vec();
        match state.pages.last_mut() {
            Some(page) if page.epoch == epoch => page.lines = lines,
            Some(_) | None => state.pages.push(Page { epoch, lines }),
        }
        state.last = Some(screen.clone());
        Ok(())
    }

    fn stop(&mut self) {
        self.lock().stopped = true;
    }
}

/// Read-only view of a [`SimDriver`]'s recordings.
#[derive(Clone)]
pub struct SimHandle {
    state: Arc<Mutex<SharedState>>,
}

impl SimHandle {
    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every page, oldest first.
    pub fn pages(&self) -> Vec<Page> {
        self.lock().pages.clone()
    }

    /// Lines of the page drawn at `epoch`, if any.
    pub fn page(&self, epoch: u64) -> Option<Vec<String>> {
        self.lock().pages.iter().find(|page| page.epoch == epoch).map(|page| page.lines.clone())
    }

    /// Every line ever shown, page by page.
    pub fn transcript(&self) -> Vec<String> {
        self.lock().pages.iter().flat_map(|page| page.lines.iter().cloned()).collect()
    }

    /// How many transcript lines equal `line`.
    pub fn count(&self, line: &str) -> usize {
        self.transcript().iter().filter(|l| *l == line).count()
    }

    /// Whether any transcript line equals `line`.
    pub fn shows(&self, line: &str) -> bool {
        self.count(line) > 0
    }

    /// Last screen rendered.
    pub fn last_screen(&self) -> Option<Screen> {
        self.lock().last.clone()
    }

    /// Number of renders.
    pub fn render_count(&self) -> usize {
        self.lock().renders
    }

    /// Number of clears observed.
    pub fn clear_count(&self) -> u64 {
        self.lock().last.as_ref().map_or(0, Screen::epoch)
    }

    /// Scripted steps not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lock().script.len()
    }

    /// Whether the driver was stopped.
    pub fn stopped(&self) -> bool {
        self.lock().stopped
    }
}
