//! Menu state machine.
//!
//! A [`MenuApp`] drives one application through
//! `Boot → MainMenu → AwaitOption → {RunningAction | InvalidOption} → MainMenu → … → Exit`
//! as an explicit loop over [`MenuState`]. Every step is a suspending
//! [`Console`] call, so a requested stop surfaces as
//! [`EngineError::Stopped`] at the next step and sends the loop to `Exit`.

use deauther_core::{CommandKind, Environment, StatusFlag};
use serde::{Deserialize, Serialize};

use crate::{
    AppRunState, Catalog, Console, Driver, EngineError, MenuState,
    console::{Echo, Pause},
};

fn default_progress() -> String {
    ".".to_string()
}

/// A status-polling wait chained after an action's command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitPhase {
    /// Flag to wait on.
    pub flag: StatusFlag,
    /// Line typed when the phase starts.
    pub message: String,
    /// Skip the phase entirely unless the flag is already raised.
    #[serde(default)]
    pub only_if_raised: bool,
    /// Marker appended to the message line on every poll.
    #[serde(default = "default_progress")]
    pub progress: String,
}

impl WaitPhase {
    /// Phase that always runs.
    pub fn new(flag: StatusFlag, message: impl Into<String>) -> Self {
        Self { flag, message: message.into(), only_if_raised: false, progress: default_progress() }
    }

    /// Only run this phase if the flag is raised when it is reached.
    #[must_use]
    pub fn if_raised(mut self) -> Self {
        self.only_if_raised = true;
        self
    }
}

/// One numbered menu option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOption {
    /// Label shown in the option banner.
    pub label: String,
    /// Command sent to the bridge.
    pub command: CommandKind,
    /// Lines typed before the command is sent.
    #[serde(default)]
    pub before: Vec<String>,
    /// Waits chained after the command, in order.
    #[serde(default)]
    pub phases: Vec<WaitPhase>,
    /// Command sent once every phase has finished, before `after`.
    #[serde(default)]
    pub then: Option<CommandKind>,
    /// Lines typed once every phase has finished.
    #[serde(default)]
    pub after: Vec<String>,
}

/// Static description of one menu application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSpec {
    /// Name used to launch the application.
    pub name: String,
    /// One-line summary for `apps`.
    #[serde(default)]
    pub description: String,
    /// Screen ids typed once on first boot.
    #[serde(default)]
    pub boot: Vec<String>,
    /// Line typed at the end of boot, fast mode included.
    #[serde(default)]
    pub boot_confirmation: String,
    /// Wait for a key after boot.
    #[serde(default)]
    pub boot_gate: bool,
    /// Screen id of the option banner header.
    pub banner: String,
    /// Options, numbered from 1.
    pub options: Vec<MenuOption>,
    /// Quit token, if this application offers one. Case-insensitive.
    #[serde(default)]
    pub quit_token: Option<String>,
}

impl MenuSpec {
    /// Generated option lines: `[1] label` … and `[Q] Quit`.
    pub fn option_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| format!("[{}] {}", i + 1, option.label))
            .collect();
        if let Some(token) = &self.quit_token {
            lines.push(format!("[{}] Quit", token.to_uppercase()));
        }
        lines
    }

    /// Classify a prompt token.
    pub fn choice(&self, token: &str) -> Choice {
        parse_choice(token, self.options.len(), self.quit_token.as_deref())
    }
}

/// Result of validating a menu token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Zero-based option index.
    Option(usize),
    /// The quit token.
    Quit,
    /// Anything else.
    Invalid,
}

/// Validate `token` against options `1..=option_count` and `quit`.
///
/// Every rejection is the same [`Choice::Invalid`], whatever the reason.
pub fn parse_choice(token: &str, option_count: usize, quit: Option<&str>) -> Choice {
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        return match token.parse::<usize>() {
            Ok(n) if (1..=option_count).contains(&n) => Choice::Option(n - 1),
            _ => Choice::Invalid,
        };
    }
    match quit {
        Some(quit) if token.eq_ignore_ascii_case(quit) => Choice::Quit,
        _ => Choice::Invalid,
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The user chose the quit token.
    Quit,
    /// The interrupt combination stopped the run.
    Interrupted,
}

/// A menu application and its run state.
#[derive(Debug, Clone)]
pub struct MenuApp {
    spec: MenuSpec,
    state: AppRunState,
}

impl MenuApp {
    /// Wrap a menu description. The application has not booted yet.
    pub fn new(spec: MenuSpec) -> Self {
        Self { spec, state: AppRunState::new() }
    }

    /// Application name.
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Static description.
    pub fn spec(&self) -> &MenuSpec {
        &self.spec
    }

    /// Run state.
    pub fn state(&self) -> &AppRunState {
        &self.state
    }

    /// Run the application until quit or interrupt.
    ///
    /// Holds the interrupt listener for the whole run. On exit the screen is
    /// cleared; after an interrupt the exit line lingers first.
    ///
    /// # Errors
    ///
    /// Anything but a user stop propagates: a missing screen, a bridge
    /// failure, closed input or a driver failure.
    pub async fn run<D: Driver, E: Environment>(
        &mut self,
        console: &mut Console<D, E>,
        catalog: &Catalog,
    ) -> Result<RunOutcome, EngineError> {
        let guard = console.arm_interrupt()?;
        self.state.begin_run();
        tracing::info!(app = %self.spec.name, booted = self.state.booted(), "run started");

        let outcome = match drive(&self.spec, &mut self.state, console, catalog).await {
            Ok(()) => RunOutcome::Quit,
            Err(EngineError::Stopped) => {
                let linger = console.config().exit_linger;
                console.linger(linger).await;
                RunOutcome::Interrupted
            },
            Err(err) => {
                tracing::warn!(app = %self.spec.name, error = %err, "run failed");
                return Err(err);
            },
        };

        console.clear()?;
        drop(guard);
        tracing::info!(app = %self.spec.name, ?outcome, "run finished");
        Ok(outcome)
    }
}

async fn drive<D: Driver, E: Environment>(
    spec: &MenuSpec,
    run: &mut AppRunState,
    console: &mut Console<D, E>,
    catalog: &Catalog,
) -> Result<(), EngineError> {
    let mut state = if run.booted() { MenuState::MainMenu } else { MenuState::Boot };
    let mut first_display = true;

    loop {
        run.ensure_running()?;
        tracing::trace!(?state, "menu step");

        state = match state {
            MenuState::Boot => {
                boot(spec, run, console, catalog).await?;
                run.mark_booted();
                MenuState::MainMenu
            },
            MenuState::MainMenu => {
                if first_display {
                    console.clear()?;
                    first_display = false;
                }
                show_menu(spec, run, console, catalog).await?;
                MenuState::AwaitOption
            },
            MenuState::AwaitOption => {
                let label = console.config().menu_prompt.clone();
                let token = console.prompt(run, &label, Echo::Plain).await?;
                match spec.choice(&token) {
                    Choice::Option(index) => MenuState::RunningAction(index),
                    Choice::Quit => MenuState::Exit,
                    Choice::Invalid => {
                        tracing::debug!(%token, "invalid option");
                        MenuState::InvalidOption
                    },
                }
            },
            MenuState::InvalidOption => {
                let message = [console.config().invalid_option.clone()];
                let typing = console.config().typing;
                console.type_out(run, &message, &typing).await?;
                MenuState::AwaitOption
            },
            MenuState::RunningAction(index) => match spec.options.get(index) {
                Some(option) => {
                    run_action(option, run, console).await?;
                    MenuState::MainMenu
                },
                None => MenuState::InvalidOption,
            },
            MenuState::Exit => return Ok(()),
        };
    }
}

async fn boot<D: Driver, E: Environment>(
    spec: &MenuSpec,
    run: &mut AppRunState,
    console: &mut Console<D, E>,
    catalog: &Catalog,
) -> Result<(), EngineError> {
    let typing = console.config().typing;
    let boot_typing = console.config().boot_typing;

    let segments =
        spec.boot.iter().map(|id| catalog.screen(id)).collect::<Result<Vec<_>, _>>()?;
    if !console.fast_mode() {
        for segment in segments {
            console.type_out(run, segment, &boot_typing).await?;
        }
    }

    if !spec.boot_confirmation.is_empty() {
        console.type_out(run, std::slice::from_ref(&spec.boot_confirmation), &typing).await?;
    }

    if spec.boot_gate && !console.fast_mode() {
        let gate = [console.config().boot_gate.clone()];
        console.type_out(run, &gate, &typing).await?;
        console.pause(run, Pause::AnyKey).await?;
    }
    Ok(())
}

async fn show_menu<D: Driver, E: Environment>(
    spec: &MenuSpec,
    run: &mut AppRunState,
    console: &mut Console<D, E>,
    catalog: &Catalog,
) -> Result<(), EngineError> {
    let mut lines = catalog.screen(&spec.banner)?.to_vec();
    lines.extend(spec.option_lines());

    let typing = console.config().typing;
    let pause = console.config().menu_pause;
    console.type_out(run, &lines, &typing).await?;
    console.pause(run, Pause::Delay(pause)).await
}

async fn run_action<D: Driver, E: Environment>(
    option: &MenuOption,
    run: &mut AppRunState,
    console: &mut Console<D, E>,
) -> Result<(), EngineError> {
    let typing = console.config().typing;

    console.type_out(run, &option.before, &typing).await?;
    console.send(run, option.command)?;
    for phase in &option.phases {
        console.wait_phase(run, phase).await?;
    }
    if let Some(kind) = option.then {
        console.send(run, kind)?;
    }
    console.type_out(run, &option.after, &typing).await
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn digits_select_only_in_range(n in 0usize..=12, count in 1usize..=9) {
            let expected = if (1..=count).contains(&n) { Choice::Option(n - 1) } else { Choice::Invalid };
            prop_assert_eq!(parse_choice(&n.to_string(), count, Some("q")), expected);
        }

        #[test]
        fn words_never_select(token in "[a-pr-z]{1,6}") {
            prop_assert_eq!(parse_choice(&token, 3, Some("q")), Choice::Invalid);
        }
    }

    #[test]
    fn numeric_range_is_inclusive() {
        assert_eq!(parse_choice("1", 3, Some("q")), Choice::Option(0));
        assert_eq!(parse_choice("3", 3, Some("q")), Choice::Option(2));
        assert_eq!(parse_choice("0", 3, Some("q")), Choice::Invalid);
        assert_eq!(parse_choice("4", 3, Some("q")), Choice::Invalid);
    }

    #[test]
    fn quit_token_ignores_case() {
        assert_eq!(parse_choice("q", 3, Some("q")), Choice::Quit);
        assert_eq!(parse_choice("Q", 3, Some("q")), Choice::Quit);
        assert_eq!(parse_choice("q", 2, None), Choice::Invalid);
    }

    #[test]
    fn junk_is_invalid() {
        for token in ["", "x", "-1", "+1", "1.0", "99999999999999999999999"] {
            assert_eq!(parse_choice(token, 3, Some("q")), Choice::Invalid, "token {token:?}");
        }
    }

    #[test]
    fn option_lines_include_quit() {
        let spec = MenuSpec {
            name: "demo".into(),
            description: String::new(),
            boot: Vec::new(),
            boot_confirmation: String::new(),
            boot_gate: false,
            banner: "menu".into(),
            options: vec![MenuOption {
                label: "Scan".into(),
                command: CommandKind::Scan,
                before: Vec::new(),
                phases: vec![WaitPhase::new(StatusFlag::Scanning, "Scanning")],
                then: None,
                after: Vec::new(),
            }],
            quit_token: Some("q".into()),
        };
        assert_eq!(spec.option_lines(), vec!["[1] Scan".to_string(), "[Q] Quit".to_string()]);
    }
}
