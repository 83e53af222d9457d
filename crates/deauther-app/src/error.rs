//! Engine error types.

use deauther_core::BridgeError;
use thiserror::Error;

/// Errors produced by the interaction engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The user interrupted the run.
    ///
    /// Not a failure: the menu loop maps it to its exit state.
    #[error("run stopped by user")]
    Stopped,

    /// Key input is closed; no further prompts can complete.
    #[error("input closed")]
    InputClosed,

    /// A screen id referenced by a menu does not exist in the catalog.
    #[error("screen not found: {0}")]
    MissingScreen(String),

    /// A top-level command named nothing the shell knows.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// `run <app>` named an application that is not in the catalog.
    #[error("unknown application: {0}")]
    UnknownApp(String),

    /// Another run already holds the interrupt listener.
    #[error("an interrupt listener is already registered")]
    InterruptBusy,

    /// The bridge rejected or could not take a message.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// The terminal driver failed.
    #[error("driver error: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl EngineError {
    /// Wrap a driver error.
    pub fn driver(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Driver(Box::new(err))
    }

    /// Whether the shell loop cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InputClosed | Self::Driver(_))
    }
}

/// Errors loading a menu catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// Path that failed.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The catalog is not valid JSON for the expected shape.
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog parsed but is inconsistent.
    #[error("invalid catalog: {0}")]
    Invalid(String),
}
