//! Suspension primitives.
//!
//! [`Console`] owns the screen, the driver and the bridge gateway, and offers
//! the only operations that can suspend a run: the typewriter
//! ([`Console::type_out`]), the pause gate ([`Console::pause`]), the prompt
//! ([`Console::prompt`]) and status-polling waits ([`Console::wait_phase`]).
//!
//! Every suspending call takes the run's [`AppRunState`]. It fails with
//! [`EngineError::Stopped`] before doing anything once a stop was requested,
//! and re-checks the flag after every resumption.
//!
//! # Interrupts
//!
//! While suspended, the console keeps reading keys. A key matching the armed
//! interrupt combination is consumed (it never reaches the host), the exit
//! line is rendered, the run is marked stopped and a `stop_attack` command is
//! sent. Any other key that arrives during a timed wait is buffered and
//! handed to the next prompt or pause.

use std::{collections::VecDeque, pin::pin, time::Duration};

use deauther_core::{CommandKind, Environment};

use crate::{
    AppRunState, BridgeGateway, Driver, EngineConfig, EngineError, InterruptGuard, InterruptHub,
    KeyEvent, KeyInput, Screen, TypingOptions, menu::WaitPhase,
};

/// Pause gate release condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// Wait for any key.
    AnyKey,
    /// Plain delay. Collapses to nothing in fast mode.
    Delay(Duration),
    /// Wait for a key, giving up after the duration.
    KeyOrTimeout(Duration),
}

/// Prompt echo style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Echo {
    /// Echo typed characters.
    #[default]
    Plain,
    /// Echo the mask character instead of each typed character.
    Masked,
}

/// Terminal console: screen, input and bridge access for one session.
pub struct Console<D: Driver, E: Environment> {
    driver: D,
    env: E,
    gateway: BridgeGateway,
    config: EngineConfig,
    screen: Screen,
    hub: InterruptHub,
    typeahead: VecDeque<KeyEvent>,
    input_closed: bool,
}

impl<D: Driver, E: Environment> Console<D, E> {
    /// Create a console with its own interrupt hub.
    pub fn new(driver: D, env: E, gateway: BridgeGateway, config: EngineConfig) -> Self {
        Self::with_hub(driver, env, gateway, config, InterruptHub::new())
    }

    /// Create a console sharing `hub` with the driver.
    pub fn with_hub(
        driver: D,
        env: E,
        gateway: BridgeGateway,
        config: EngineConfig,
        hub: InterruptHub,
    ) -> Self {
        let screen = Screen::new(config.scrollback);
        Self {
            driver,
            env,
            gateway,
            config,
            screen,
            hub,
            typeahead: VecDeque::new(),
            input_closed: false,
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current screen contents.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Whether fast mode is on. Read fresh on every call.
    pub fn fast_mode(&self) -> bool {
        self.gateway.fast_mode()
    }

    /// Claim the interrupt listener for a run.
    pub fn arm_interrupt(&self) -> Result<InterruptGuard, EngineError> {
        self.hub.register(self.config.interrupt)
    }

    /// Push the screen to the driver.
    pub fn render(&mut self) -> Result<(), EngineError> {
        self.driver.render(&self.screen).map_err(EngineError::driver)
    }

    /// Print one line immediately. Never suspends.
    pub fn print_line(&mut self, text: impl Into<String>) -> Result<(), EngineError> {
        self.screen.push_line(text);
        self.render()
    }

    /// Clear the screen.
    pub fn clear(&mut self) -> Result<(), EngineError> {
        self.screen.clear();
        self.render()
    }

    /// Release driver resources.
    pub fn stop(&mut self) {
        self.driver.stop();
    }

    /// Send a command to the bridge.
    ///
    /// Refused once the run is stopped, so nothing but the interrupt's own
    /// `stop_attack` can leave after a stop.
    pub fn send(&mut self, run: &AppRunState, kind: CommandKind) -> Result<(), EngineError> {
        run.ensure_running()?;
        self.gateway.send(kind)?;
        Ok(())
    }

    /// Render any `typeOut` text the bridge has queued. Returns lines shown.
    pub fn show_bridge_messages(&mut self) -> Result<usize, EngineError> {
        let mut shown = 0;
        for message in self.gateway.take_messages() {
            match message.text() {
                Some(text) => {
                    for line in text.lines() {
                        self.screen.push_line(line);
                        shown += 1;
                    }
                },
                None => tracing::debug!(kind = ?message.command, "ignoring bridge message"),
            }
        }
        if shown > 0 {
            self.render()?;
        }
        Ok(shown)
    }

    /// Typewriter: render `lines` in order with the given timing.
    ///
    /// In fast mode every line is placed at once and the call returns
    /// without suspending.
    pub async fn type_out(
        &mut self,
        run: &mut AppRunState,
        lines: &[String],
        options: &TypingOptions,
    ) -> Result<(), EngineError> {
        run.ensure_running()?;
        if lines.is_empty() {
            return Ok(());
        }

        if self.fast_mode() {
            for line in lines {
                self.place(line, options.use_container);
            }
            return self.render();
        }

        let was_busy = self.screen.is_busy();
        self.screen.set_busy(true);
        let result = self.type_lines(run, lines, options).await;
        self.screen.set_busy(was_busy);
        result?;
        self.render()
    }

    async fn type_lines(
        &mut self,
        run: &mut AppRunState,
        lines: &[String],
        options: &TypingOptions,
    ) -> Result<(), EngineError> {
        self.wait_timer(run, options.initial_wait, false).await?;

        for (index, line) in lines.iter().enumerate() {
            if index > 0 {
                self.wait_timer(run, options.line_wait, false).await?;
            }

            if options.wait.is_zero() || line.is_empty() {
                self.place(line, options.use_container);
                self.render()?;
                continue;
            }

            if !options.use_container {
                self.screen.push_line("");
            }
            let mut buf = [0u8; 4];
            for (n, ch) in line.chars().enumerate() {
                if n > 0 {
                    self.wait_timer(run, options.wait, false).await?;
                }
                self.screen.append(ch.encode_utf8(&mut buf));
                self.render()?;
            }
        }

        self.wait_timer(run, options.final_wait, false).await?;
        Ok(())
    }

    fn place(&mut self, line: &str, use_container: bool) {
        if use_container {
            self.screen.append(line);
        } else {
            self.screen.push_line(line);
        }
    }

    /// Pause gate.
    pub async fn pause(&mut self, run: &mut AppRunState, pause: Pause) -> Result<(), EngineError> {
        run.ensure_running()?;
        match pause {
            Pause::AnyKey => {
                self.next_key(run).await?;
            },
            Pause::Delay(duration) => {
                if !self.fast_mode() {
                    self.wait_timer(run, duration, false).await?;
                }
            },
            Pause::KeyOrTimeout(duration) => {
                if self.typeahead.is_empty() {
                    if !self.fast_mode() {
                        self.wait_timer(run, duration, true).await?;
                    }
                } else {
                    self.next_key(run).await?;
                }
            },
        }
        run.ensure_running()
    }

    /// Read one line of input. Returns it trimmed.
    ///
    /// Ctrl and Alt chords are ignored. A masked prompt echoes the mask
    /// character per keystroke but returns the literal text.
    pub async fn prompt(
        &mut self,
        run: &mut AppRunState,
        label: &str,
        echo: Echo,
    ) -> Result<String, EngineError> {
        run.ensure_running()?;
        self.screen.begin_input(label);
        self.render()?;

        let mut value = String::new();
        loop {
            let event = match self.next_key(run).await {
                Ok(event) => event,
                Err(err) => {
                    self.screen.cancel_input();
                    return Err(err);
                },
            };
            run.ensure_running()?;

            if event.modifiers.is_chord() {
                continue;
            }
            match event.key {
                KeyInput::Enter => break,
                KeyInput::Char(c) => value.push(c),
                KeyInput::Backspace => {
                    if value.pop().is_none() {
                        continue;
                    }
                },
                _ => continue,
            }

            let shown = match echo {
                Echo::Plain => value.clone(),
                Echo::Masked => std::iter::repeat_n(self.config.mask, value.chars().count()).collect(),
            };
            self.screen.set_echo(shown);
            self.render()?;
        }

        self.screen.commit_input();
        self.render()?;
        Ok(value.trim().to_string())
    }

    /// Status-polling wait for one phase.
    ///
    /// Types the phase message, then polls the flag every poll interval,
    /// appending the progress marker after each sleep, until the flag reads
    /// false. Returns `false` without output when the phase only runs on a
    /// raised flag and the flag is down.
    pub async fn wait_phase(
        &mut self,
        run: &mut AppRunState,
        phase: &WaitPhase,
    ) -> Result<bool, EngineError> {
        run.ensure_running()?;
        self.show_bridge_messages()?;
        if phase.only_if_raised && !self.gateway.poll_status(phase.flag) {
            tracing::debug!(flag = ?phase.flag, "phase skipped");
            return Ok(false);
        }

        let typing = self.config.typing;
        self.type_out(run, std::slice::from_ref(&phase.message), &typing).await?;

        let interval = self.config.poll_interval();
        let progress = [phase.progress.clone()];
        let dots = TypingOptions::INSTANT.contained();

        let started = self.env.now();
        self.screen.set_busy(true);
        let result = async {
            while self.gateway.poll_status(phase.flag) {
                self.wait_timer(run, interval, false).await?;
                self.type_out(run, &progress, &dots).await?;
            }
            Ok::<_, EngineError>(())
        }
        .await;
        self.screen.set_busy(false);
        result?;

        let elapsed = self.env.now() - started;
        tracing::debug!(flag = ?phase.flag, ?elapsed, "phase complete");
        self.show_bridge_messages()?;
        self.render()?;
        Ok(true)
    }

    /// Let `duration` pass after a stop, swallowing every key read meanwhile.
    ///
    /// Call while the interrupt listener is still held, so a repeated
    /// interrupt press is consumed here instead of reaching the shell.
    /// Skipped in fast mode.
    pub async fn linger(&mut self, duration: Duration) {
        if duration.is_zero() || self.fast_mode() {
            return;
        }

        let env = self.env.clone();
        let mut timer = pin!(env.sleep(duration));
        loop {
            tokio::select! {
                biased;

                () = &mut timer => return,

                key = self.driver.poll_key(), if !self.input_closed => {
                    match key {
                        Ok(Some(event)) => tracing::debug!(?event, "key discarded while lingering"),
                        Ok(None) => self.input_closed = true,
                        Err(err) => {
                            tracing::warn!(error = %EngineError::driver(err), "key read failed while lingering");
                            self.input_closed = true;
                        },
                    }
                }
            }
        }
    }

    /// Sleep for `duration` while still reading keys.
    ///
    /// Returns `Ok(true)` if `stop_on_key` is set and a key ended the wait.
    async fn wait_timer(
        &mut self,
        run: &mut AppRunState,
        duration: Duration,
        stop_on_key: bool,
    ) -> Result<bool, EngineError> {
        if duration.is_zero() {
            return Ok(false);
        }

        let env = self.env.clone();
        let mut timer = pin!(env.sleep(duration));
        loop {
            tokio::select! {
                biased;

                () = &mut timer => {
                    run.ensure_running()?;
                    return Ok(false);
                }

                key = self.driver.poll_key(), if !self.input_closed => {
                    match key.map_err(EngineError::driver)? {
                        None => self.input_closed = true,
                        Some(event) if self.hub.intercepts(&event) => {
                            return Err(self.trip_interrupt(run));
                        },
                        Some(_) if stop_on_key => return Ok(true),
                        Some(event) => self.typeahead.push_back(event),
                    }
                }
            }
        }
    }

    async fn next_key(&mut self, run: &mut AppRunState) -> Result<KeyEvent, EngineError> {
        let event = match self.typeahead.pop_front() {
            Some(event) => event,
            None if self.input_closed => return Err(EngineError::InputClosed),
            None => match self.driver.poll_key().await.map_err(EngineError::driver)? {
                Some(event) => event,
                None => {
                    self.input_closed = true;
                    return Err(EngineError::InputClosed);
                },
            },
        };

        if self.hub.intercepts(&event) {
            return Err(self.trip_interrupt(run));
        }
        Ok(event)
    }

    /// Stop the run: show the exit line, then send `stop_attack` once.
    ///
    /// The exit line is pushed whole, the same as typing it with
    /// [`TypingOptions::INSTANT`], because every typed line is a suspension
    /// point and this path must not suspend or read keys.
    fn trip_interrupt(&mut self, run: &mut AppRunState) -> EngineError {
        tracing::info!("interrupt received");
        run.request_stop();

        self.screen.set_busy(false);
        self.screen.cancel_input();
        self.screen.push_line(self.config.exit_line.clone());
        if let Err(err) = self.render() {
            tracing::warn!(error = %err, "failed to render exit line");
        }

        if let Err(err) = self.gateway.send(CommandKind::StopAttack) {
            tracing::warn!(error = %err, "failed to send stop command");
        }
        EngineError::Stopped
    }
}

impl<D: Driver, E: Environment> std::fmt::Debug for Console<D, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("screen", &self.screen)
            .field("typeahead", &self.typeahead)
            .field("input_closed", &self.input_closed)
            .finish_non_exhaustive()
    }
}
