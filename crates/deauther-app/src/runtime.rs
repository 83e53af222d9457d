//! Generic runtime: the top-level shell loop.
//!
//! The [`Runtime`] owns the [`Console`], the [`Catalog`] and one [`MenuApp`]
//! per catalog entry. It reads shell lines, dispatches them and launches
//! applications. A failing command never ends the loop: its message is
//! rendered and the prompt comes back. Only closed input, a driver failure or
//! `exit` end it.

use deauther_core::Environment;

use crate::{
    AppRunState, Catalog, Console, Driver, EngineError, MenuApp, RunOutcome, ShellCommand,
    console::Echo,
};

/// Generic runtime that drives the shell over a console.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment providing timers
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    console: Console<D, E>,
    catalog: Catalog,
    apps: Vec<MenuApp>,
    shell: AppRunState,
    autostart: Option<String>,
}

impl<D, E> Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    /// Create a runtime with one application instance per catalog entry.
    pub fn new(console: Console<D, E>, catalog: Catalog) -> Self {
        let apps = catalog.apps().iter().cloned().map(MenuApp::new).collect();
        Self { console, catalog, apps, shell: AppRunState::new(), autostart: None }
    }

    /// Launch `name` before the first shell prompt.
    #[must_use]
    pub fn with_autostart(mut self, name: impl Into<String>) -> Self {
        self.autostart = Some(name.into());
        self
    }

    /// The console.
    pub fn console(&self) -> &Console<D, E> {
        &self.console
    }

    /// Run the shell until `exit` or closed input.
    ///
    /// # Errors
    ///
    /// Returns an error only if the driver fails.
    pub async fn run(mut self) -> Result<(), EngineError> {
        let result = self.shell_loop().await;
        self.console.stop();

        match result {
            Ok(()) | Err(EngineError::InputClosed) => Ok(()),
            Err(err) => Err(err),
        }
    }

    async fn shell_loop(&mut self) -> Result<(), EngineError> {
        self.greet().await?;

        if let Some(name) = self.autostart.take() {
            let result = self.launch(&name).await.map(|_| ());
            self.recover(result)?;
        }

        loop {
            if !self.process_cycle().await? {
                return Ok(());
            }
        }
    }

    /// One prompt and dispatch. Returns `false` when the shell should end.
    async fn process_cycle(&mut self) -> Result<bool, EngineError> {
        self.console.show_bridge_messages()?;

        let label = self.console.config().shell_prompt.clone();
        let line = self.console.prompt(&mut self.shell, &label, Echo::Plain).await?;

        match self.dispatch(&line).await {
            Ok(keep_going) => Ok(keep_going),
            Err(err) => {
                self.recover(Err(err))?;
                Ok(true)
            },
        }
    }

    /// Render a non-fatal error and carry on. Fatal errors pass through.
    fn recover(&mut self, result: Result<(), EngineError>) -> Result<(), EngineError> {
        match result {
            Ok(()) => Ok(()),
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                tracing::warn!(error = %err, "command failed");
                self.console.print_line(format!("ERROR: {err}"))
            },
        }
    }

    async fn greet(&mut self) -> Result<(), EngineError> {
        let Some(lines) = self.catalog.try_screen("shell").map(<[String]>::to_vec) else {
            return Ok(());
        };
        let typing = self.console.config().typing;
        self.console.type_out(&mut self.shell, &lines, &typing).await
    }

    /// Execute one shell line. Returns `false` on `exit`.
    ///
    /// # Errors
    ///
    /// Unknown commands and applications, and any error from a launched
    /// application.
    pub async fn dispatch(&mut self, line: &str) -> Result<bool, EngineError> {
        match ShellCommand::parse(line) {
            ShellCommand::Empty => {},
            ShellCommand::Help => {
                let lines = self.catalog.screen("help")?.to_vec();
                for line in lines {
                    self.console.print_line(line)?;
                }
            },
            ShellCommand::Apps => {
                let listing: Vec<String> = self
                    .catalog
                    .apps()
                    .iter()
                    .map(|app| format!("{:<10} {}", app.name, app.description))
                    .collect();
                for line in listing {
                    self.console.print_line(line)?;
                }
            },
            ShellCommand::Clear => self.console.clear()?,
            ShellCommand::Exit => return Ok(false),
            ShellCommand::Run(name) => {
                self.launch(&name).await?;
            },
            ShellCommand::Other(word) => {
                if self.catalog.app(&word).is_none() {
                    return Err(EngineError::UnknownCommand(word));
                }
                self.launch(&word).await?;
            },
        }
        Ok(true)
    }

    /// Run the named application.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownApp`] if no application has this name, or any
    /// error from the run itself.
    pub async fn launch(&mut self, name: &str) -> Result<RunOutcome, EngineError> {
        let Some(app) = self.apps.iter_mut().find(|app| app.name().eq_ignore_ascii_case(name))
        else {
            return Err(EngineError::UnknownApp(name.to_string()));
        };

        tracing::info!(app = %app.name(), "launching");
        app.run(&mut self.console, &self.catalog).await
    }
}
