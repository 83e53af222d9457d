//! Terminal UI for the deauther engine
//!
//! A thin shell over [`deauther_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`deauther_app::Runtime`].
//!
//! This crate handles terminal rendering, file logging and the in-process
//! bridge used when no external backend is attached.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod bridge;
pub mod logging;
pub mod terminal;
pub mod ui;

pub use bridge::{BridgeTimings, InProcessBridge};
pub use deauther_app::{Console, Driver, KeyInput, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
