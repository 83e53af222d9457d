//! Shared building blocks for the deauther terminal.
//!
//! - [`Environment`]: time abstraction so timing can be simulated
//! - [`Command`] / [`BridgeMessage`]: the JSON contract with the control bridge
//! - [`StatusBoard`]: bridge-owned status flags and fast-mode configuration

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod command;
pub mod env;
pub mod error;
pub mod status;

pub use command::{BridgeMessage, Command, CommandKind, InboundKind};
pub use env::{Environment, SystemEnv};
pub use error::BridgeError;
pub use status::{StatusBoard, StatusFlag};
