//! Interaction engine for the deauther terminal
//!
//! Typewriter output, the pause gate, prompts, menu state machines and
//! cooperative cancellation, generic over the terminal [`Driver`] and the
//! time [`deauther_core::Environment`] so the same code runs in production
//! and in deterministic simulation.
//!
//! # Components
//!
//! - [`Console`]: suspension primitives (type out, pause, prompt, status waits)
//! - [`MenuApp`]: per-application menu state machine
//! - [`InterruptHub`]: scoped interrupt listener registration
//! - [`BridgeGateway`]: command sink plus read-only host context
//! - [`Runtime`]: top-level shell loop
//! - [`Driver`]: trait for platform-specific terminal I/O

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod catalog;
mod config;
mod console;
mod driver;
mod error;
mod gateway;
mod input;
mod interrupt;
mod menu;
mod runtime;
mod screen;
mod shell;
mod state;
mod typing;

pub use catalog::Catalog;
pub use config::{EngineConfig, MIN_POLL_INTERVAL};
pub use console::{Console, Echo, Pause};
pub use driver::Driver;
pub use error::{CatalogError, EngineError};
pub use gateway::{BridgeGateway, CommandSink, HostContext};
pub use input::{KeyCombo, KeyEvent, KeyInput, Modifiers, ParseComboError};
pub use interrupt::{InterruptGuard, InterruptHub};
pub use menu::{Choice, MenuApp, MenuOption, MenuSpec, RunOutcome, WaitPhase, parse_choice};
pub use runtime::Runtime;
pub use screen::{DEFAULT_SCROLLBACK, InputLine, Screen};
pub use shell::ShellCommand;
pub use state::{AppRunState, MenuState};
pub use typing::TypingOptions;
